//! In-memory lookup cache with TTL expiry.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use lootscan_core::types::ItemPrice;

#[derive(Debug, Clone)]
struct CacheEntry {
    items: Vec<ItemPrice>,
    inserted_at: Instant,
}

/// Query string to lookup result, guarded by a single mutex.
///
/// An entry is served while its age is below the TTL and dropped on the
/// first read at or after expiry. There is no size bound and no persistence.
#[derive(Debug)]
pub struct PriceCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    ttl: Duration,
}

impl PriceCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Return a live entry, removing it if it has expired.
    pub fn get(&self, key: &str) -> Option<Vec<ItemPrice>> {
        let mut entries = self.lock();
        let age = entries.get(key)?.inserted_at.elapsed();
        if age < self.ttl {
            debug!(key, "Cache hit");
            entries.get(key).map(|e| e.items.clone())
        } else {
            debug!(key, age_ms = age.as_millis() as u64, "Cache expired");
            entries.remove(key);
            None
        }
    }

    /// Store `items` under `key`, stamped with the current time.
    pub fn insert(&self, key: impl Into<String>, items: Vec<ItemPrice>) {
        self.lock().insert(
            key.into(),
            CacheEntry {
                items,
                inserted_at: Instant::now(),
            },
        );
    }

    /// Number of stored entries, expired ones included until next read.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}
