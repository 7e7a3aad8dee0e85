//! First-registration-wins strategy table.
//!
//! One [`RegistrationTable`] instance backs each strategy namespace of a
//! [`crate::Resolver`] (singletons and per-call factories are registered and
//! resolved independently). The table is a thin layer over a concurrent map:
//! registrations and lookups may run concurrently from any thread, and
//! concurrent registrations for the same key resolve to exactly one winner.

use dashmap::{mapref::entry::Entry, DashMap};

use crate::locator::AbstractionKey;

/// Concurrent mapping from abstraction keys to resolution strategies.
///
/// Registration follows first-wins semantics: the first strategy stored for a
/// key is permanent for the table's lifetime (or until [`RegistrationTable::clear`]).
/// A duplicate registration is a normal, expected outcome signaled through the
/// boolean result - never an error.
#[derive(Debug)]
pub(crate) struct RegistrationTable<S> {
    entries: DashMap<AbstractionKey, S>,
}

impl<S: Clone> RegistrationTable<S> {
    pub(crate) fn new() -> Self {
        RegistrationTable {
            entries: DashMap::new(),
        }
    }

    /// Stores `strategy` under `key` if the key is vacant.
    ///
    /// Returns `true` on success; `false` (and no mutation) when a strategy
    /// is already registered. The vacancy check and insertion are a single
    /// atomic step, so concurrent same-key registrations admit one winner.
    pub(crate) fn register(&self, key: AbstractionKey, strategy: S) -> bool {
        match self.entries.entry(key) {
            Entry::Vacant(vacant) => {
                vacant.insert(strategy);
                true
            }
            Entry::Occupied(_) => false,
        }
    }

    /// Read-only strategy lookup. Strategies clone cheaply (`Arc` internals).
    pub(crate) fn lookup(&self, key: &AbstractionKey) -> Option<S> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    pub(crate) fn contains(&self, key: &AbstractionKey) -> bool {
        self.entries.contains_key(key)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Removes every registration. Used by resolver reset.
    pub(crate) fn clear(&self) {
        self.entries.clear();
    }
}

impl<S: Clone> Default for RegistrationTable<S> {
    fn default() -> Self {
        Self::new()
    }
}
