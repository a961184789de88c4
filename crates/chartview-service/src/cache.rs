//! JSON cache-aside over a key-value store

use std::future::Future;
use std::sync::Arc;

use chartview_store::KeyValueStore;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{Result, ServiceError};
use crate::flight::SingleFlight;

/// Typed view of the store shared by every cache component
pub struct Cache {
    store: Arc<dyn KeyValueStore>,
    flights: SingleFlight,
}

impl Cache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            flights: SingleFlight::new(),
        }
    }

    /// The underlying store
    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    /// Read and decode an entry
    ///
    /// An absent key is `Ok(None)`; an entry that does not decode is an
    /// error, never a miss.
    pub async fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(raw) = self.store.get(key).await? else {
            return Ok(None);
        };

        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| ServiceError::CacheDecode {
                key: key.to_string(),
                source,
            })
    }

    /// Encode and write an entry in one `set`
    pub async fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.store.set(key, &raw).await?;
        Ok(())
    }

    /// Return the cached entry, populating it with `fetch` on a miss
    ///
    /// At most one caller runs `fetch` for a key at a time. Nothing is
    /// written when `fetch` fails.
    pub async fn get_or_populate<T, F, Fut>(&self, key: &str, fetch: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        if let Some(hit) = self.read(key).await? {
            tracing::debug!(key, "cache hit");
            return Ok(hit);
        }

        let _flight = self.flights.acquire(key).await;

        // Another caller may have filled the entry while we waited
        if let Some(hit) = self.read(key).await? {
            tracing::debug!(key, "cache filled by concurrent request");
            return Ok(hit);
        }

        tracing::debug!(key, "cache miss");
        let value = fetch().await?;
        self.write(key, &value).await?;
        Ok(value)
    }
}
