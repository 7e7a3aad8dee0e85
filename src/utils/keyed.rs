//! Read-only keyed collection view.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use crate::{Error, Result};

/// A read-only view over a collection, indexed by a key extracted from each
/// item.
///
/// Construction walks the items once, building a key index; afterwards the
/// view answers key lookups in constant time while preserving the original
/// item order for iteration. Keys must be unique.
///
/// # Examples
///
/// ```rust
/// use dotresolve::utils::KeyedView;
///
/// let view = KeyedView::new(vec!["a", "bb", "ccc"], |s| s.len())?;
/// assert_eq!(view.get(&2), Some(&"bb"));
/// assert!(view.contains_key(&3));
/// assert_eq!(view.len(), 3);
/// # Ok::<(), dotresolve::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct KeyedView<K, V> {
    items: Vec<V>,
    index: HashMap<K, usize>,
}

impl<K: Eq + Hash + Debug, V> KeyedView<K, V> {
    /// Builds a view over `items`, keying each through `key_of`.
    ///
    /// # Errors
    ///
    /// [`Error::Configuration`] when two items produce the same key.
    pub fn new(items: Vec<V>, key_of: impl Fn(&V) -> K) -> Result<Self> {
        let mut index = HashMap::with_capacity(items.len());
        for (position, item) in items.iter().enumerate() {
            let key = key_of(item);
            if index.contains_key(&key) {
                return Err(Error::Configuration(format!(
                    "duplicate key {key:?} at position {position}"
                )));
            }
            index.insert(key, position);
        }
        Ok(KeyedView { items, index })
    }

    /// Looks up an item by key.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&V> {
        self.index.get(key).map(|&position| &self.items[position])
    }

    /// Whether an item with the given key exists.
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Number of items in the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the view holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterates the items in their original order.
    pub fn iter(&self) -> std::slice::Iter<'_, V> {
        self.items.iter()
    }

    /// Iterates the keys (in arbitrary order).
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.index.keys()
    }
}

impl<'a, K, V> IntoIterator for &'a KeyedView<K, V> {
    type Item = &'a V;
    type IntoIter = std::slice::Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_and_order() {
        let view = KeyedView::new(vec![(1, "a"), (3, "b"), (2, "c")], |&(id, _)| id).unwrap();
        assert_eq!(view.get(&3), Some(&(3, "b")));
        assert_eq!(view.get(&9), None);

        let order: Vec<_> = view.iter().map(|&(id, _)| id).collect();
        assert_eq!(order, vec![1, 3, 2]);
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let err = KeyedView::new(vec![1, 2, 1], |&v| v).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_empty() {
        let view: KeyedView<u32, u32> = KeyedView::new(Vec::new(), |&v| v).unwrap();
        assert!(view.is_empty());
    }
}
