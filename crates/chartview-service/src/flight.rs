//! Per-key in-flight population
//!
//! A cache miss is filled while holding the key's flight lock. Concurrent
//! misses on the same key queue on that lock and, once they get it, find
//! the entry already written by the first caller.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

type FlightLock = Arc<AsyncMutex<()>>;

/// Registry of keys currently being populated
#[derive(Debug, Default)]
pub struct SingleFlight {
    inflight: Mutex<HashMap<String, FlightLock>>,
}

impl SingleFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait until no other caller is populating `key`, then claim it
    ///
    /// The claim lasts until the returned guard is dropped.
    pub async fn acquire(&self, key: &str) -> FlightGuard<'_> {
        let lock = {
            let mut map = self.inflight.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(
                map.entry(key.to_string())
                    .or_insert_with(|| Arc::new(AsyncMutex::new(()))),
            )
        };

        let guard = Arc::clone(&lock).lock_owned().await;

        FlightGuard {
            flight: self,
            key: key.to_string(),
            lock,
            guard: Some(guard),
        }
    }

    /// Number of keys claimed or waited on
    pub fn in_flight(&self) -> usize {
        self.inflight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// Claim on one key; releases and forgets the key on drop
pub struct FlightGuard<'a> {
    flight: &'a SingleFlight,
    key: String,
    lock: FlightLock,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());

        let mut map = self
            .flight
            .inflight
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        // The map and this guard hold the only references: nobody is waiting
        if Arc::strong_count(&self.lock) == 2 {
            map.remove(&self.key);
        }
    }
}
