//! Singleton strategies: fixed instances and lazily materialized slots.

use std::any::Any;
use std::sync::{Arc, RwLock};

use crate::{Error, Result, TargetError};

/// Type-erased shared instance held by the singleton namespace.
pub(crate) type Shared = Arc<dyn Any + Send + Sync>;

/// Factory producing a lazy singleton's value on first demand.
pub(crate) type SingletonFactory =
    Box<dyn Fn() -> std::result::Result<Shared, TargetError> + Send + Sync>;

/// How a singleton registration produces its value.
#[derive(Clone)]
pub(crate) enum SingletonStrategy {
    /// Instance supplied at registration time.
    Fixed(Shared),
    /// Factory invoked at most once on first successful resolution.
    Lazy(Arc<LazySlot>),
}

impl SingletonStrategy {
    pub(crate) fn get(&self) -> Result<Shared> {
        match self {
            SingletonStrategy::Fixed(shared) => Ok(shared.clone()),
            SingletonStrategy::Lazy(slot) => slot.get(),
        }
    }
}

impl std::fmt::Debug for SingletonStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SingletonStrategy::Fixed(_) => f.write_str("SingletonStrategy::Fixed"),
            SingletonStrategy::Lazy(_) => f.write_str("SingletonStrategy::Lazy"),
        }
    }
}

/// A lazily materialized singleton cell.
///
/// Materialization is exactly-once-on-success: concurrent first callers
/// serialize on the slot's write lock, so the factory runs once and every
/// caller receives the same shared instance. A factory failure leaves the
/// slot pending - the failed attempt does not consume the "at most once"
/// guarantee, and the next caller retries the factory.
pub(crate) struct LazySlot {
    factory: SingletonFactory,
    slot: RwLock<Option<Shared>>,
}

impl LazySlot {
    pub(crate) fn new(factory: SingletonFactory) -> Self {
        LazySlot {
            factory,
            slot: RwLock::new(None),
        }
    }

    /// Returns the materialized instance, running the factory if needed.
    ///
    /// Double-checked: the read-lock fast path serves the common case of an
    /// already materialized slot without contention.
    pub(crate) fn get(&self) -> Result<Shared> {
        if let Some(shared) = self.slot.read().map_err(|_| Error::LockError)?.as_ref() {
            return Ok(shared.clone());
        }

        let mut guard = self.slot.write().map_err(|_| Error::LockError)?;
        if let Some(shared) = guard.as_ref() {
            return Ok(shared.clone());
        }

        let produced = (self.factory)().map_err(Error::Target)?;
        *guard = Some(produced.clone());
        Ok(produced)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_factory(runs: Arc<AtomicUsize>) -> SingletonFactory {
        Box::new(move || {
            runs.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(String::from("made")) as Shared)
        })
    }

    #[test]
    fn test_materializes_once() {
        let runs = Arc::new(AtomicUsize::new(0));
        let slot = LazySlot::new(counting_factory(runs.clone()));

        let first = slot.get().unwrap();
        let second = slot.get().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failure_leaves_slot_pending() {
        let runs = Arc::new(AtomicUsize::new(0));
        let runs_inner = runs.clone();
        let slot = LazySlot::new(Box::new(move || {
            let attempt = runs_inner.fetch_add(1, Ordering::SeqCst);
            if attempt == 0 {
                Err("first attempt fails".into())
            } else {
                Ok(Arc::new(7u32) as Shared)
            }
        }));

        let err = slot.get().unwrap_err();
        assert!(err.is_target());
        assert_eq!(err.to_string(), "first attempt fails");

        // Retry succeeds and materializes.
        let shared = slot.get().unwrap();
        assert_eq!(*shared.downcast::<u32>().unwrap(), 7);
        assert_eq!(runs.load(Ordering::SeqCst), 2);

        // Materialized now; no further factory runs.
        slot.get().unwrap();
        assert_eq!(runs.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_concurrent_first_callers_share_one_run() {
        let runs = Arc::new(AtomicUsize::new(0));
        let slot = Arc::new(LazySlot::new(counting_factory(runs.clone())));

        let mut results = Vec::new();
        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    let slot = Arc::clone(&slot);
                    scope.spawn(move || slot.get().unwrap())
                })
                .collect();
            for handle in handles {
                results.push(handle.join().unwrap());
            }
        });

        assert_eq!(runs.load(Ordering::SeqCst), 1);
        for shared in &results[1..] {
            assert!(Arc::ptr_eq(&results[0], shared));
        }
    }
}
