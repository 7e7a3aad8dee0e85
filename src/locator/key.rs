//! Abstraction keys: type identities used to request a resolution.

use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Identity of a requested abstraction.
///
/// Wraps the abstraction's `TypeId` together with its captured type name.
/// Equality and hashing consider the `TypeId` only; the name exists for
/// diagnostics.
#[derive(Debug, Clone, Copy)]
pub struct AbstractionKey {
    id: TypeId,
    name: &'static str,
}

impl AbstractionKey {
    /// The key for abstraction type `T`.
    #[must_use]
    pub fn of<T: Any>() -> Self {
        AbstractionKey {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    /// Captured name of the abstraction type.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The abstraction's `TypeId`.
    #[must_use]
    pub fn type_id(&self) -> TypeId {
        self.id
    }
}

impl PartialEq for AbstractionKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for AbstractionKey {}

impl Hash for AbstractionKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for AbstractionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_by_type() {
        assert_eq!(AbstractionKey::of::<String>(), AbstractionKey::of::<String>());
        assert_ne!(AbstractionKey::of::<String>(), AbstractionKey::of::<i32>());
    }

    #[test]
    fn test_name_captured() {
        assert!(AbstractionKey::of::<String>().name().contains("String"));
    }
}
