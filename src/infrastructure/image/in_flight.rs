//! Per-key single flight for the fetch pipeline.
//!
//! The first request for a key takes its lock and runs the full pipeline;
//! concurrent requests for the same key wait on the lock and then find the
//! blob already stored.

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::trace;

use crate::domain::entities::CacheKey;

/// Registry of keys with a pipeline in flight.
#[derive(Default)]
pub struct InFlightRegistry {
    locks: Mutex<HashMap<CacheKey, Weak<AsyncMutex<()>>>>,
}

/// Exclusive right to run the pipeline for one key. Released on drop.
pub struct FlightGuard {
    _guard: OwnedMutexGuard<()>,
}

impl InFlightRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits until no other pipeline for `key` is running, then claims it.
    pub async fn acquire(&self, key: &CacheKey) -> FlightGuard {
        let lock = self.lock_for(key);
        if let Ok(guard) = lock.clone().try_lock_owned() {
            trace!(key = %key, "Leading flight");
            return FlightGuard { _guard: guard };
        }

        trace!(key = %key, "Waiting on in-flight request");
        FlightGuard {
            _guard: lock.lock_owned().await,
        }
    }

    /// Number of keys with a live lock.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.locks
            .lock()
            .values()
            .filter(|lock| lock.strong_count() > 0)
            .count()
    }

    fn lock_for(&self, key: &CacheKey) -> Arc<AsyncMutex<()>> {
        let mut locks = self.locks.lock();
        locks.retain(|_, lock| lock.strong_count() > 0);

        if let Some(lock) = locks.get(key).and_then(Weak::upgrade) {
            return lock;
        }

        let lock = Arc::new(AsyncMutex::new(()));
        locks.insert(key.clone(), Arc::downgrade(&lock));
        lock
    }
}

impl std::fmt::Debug for InFlightRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InFlightRegistry")
            .field("in_flight", &self.in_flight())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_key_is_serialized() {
        let registry = Arc::new(InFlightRegistry::new());
        let key = CacheKey::from_url("https://example.com/a.png");

        let first = registry.acquire(&key).await;
        assert_eq!(registry.in_flight(), 1);

        let waiter = {
            let registry = registry.clone();
            let key = key.clone();
            tokio::spawn(async move {
                let _guard = registry.acquire(&key).await;
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        drop(first);
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn test_distinct_keys_do_not_block() {
        let registry = InFlightRegistry::new();
        let a = registry.acquire(&CacheKey::from_url("a")).await;
        let b = tokio::time::timeout(
            Duration::from_millis(100),
            registry.acquire(&CacheKey::from_url("b")),
        )
        .await;
        assert!(b.is_ok());
        assert_eq!(registry.in_flight(), 2);
        drop(a);
    }

    #[tokio::test]
    async fn test_released_keys_are_forgotten() {
        let registry = InFlightRegistry::new();
        let guard = registry.acquire(&CacheKey::from_url("a")).await;
        drop(guard);
        assert_eq!(registry.in_flight(), 0);
    }
}
