use std::{
    fmt,
    time::{Duration, Instant},
};

use async_trait::async_trait;
use lru::LruCache;
use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::Mutex;

pub use self::config::InMemoryResponseCacherConfig;
use super::ResponseCacher;
use crate::errors::error::VcxLedgerResult;

mod config;

pub struct InMemoryResponseCacher {
    cache: Mutex<LruCache<String, (String, Instant)>>,
    ttl: Duration,
}

impl InMemoryResponseCacher {
    pub fn new(config: InMemoryResponseCacherConfig) -> Self {
        Self {
            cache: Mutex::new(LruCache::new(config.capacity())),
            ttl: config.ttl(),
        }
    }
}

impl fmt::Debug for InMemoryResponseCacher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryResponseCacher")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ResponseCacher for InMemoryResponseCacher {
    async fn put<S, T>(&self, id: S, obj: &T) -> VcxLedgerResult<()>
    where
        S: ToString + Send,
        T: Serialize + Sync,
    {
        let serialized = serde_json::to_string(obj)?;
        let mut cache = self.cache.lock().await;
        cache.put(id.to_string(), (serialized, Instant::now()));
        Ok(())
    }

    async fn get<S, T>(&self, id: S) -> VcxLedgerResult<Option<T>>
    where
        S: ToString + Send,
        T: DeserializeOwned + Send,
    {
        let id = id.to_string();
        let mut cache = self.cache.lock().await;
        match cache.get(&id) {
            Some((obj, timestamp)) if timestamp.elapsed() <= self.ttl => {
                Ok(Some(serde_json::from_str(obj)?))
            }
            Some(_) => {
                trace!("ResponseCacher >>> evicting expired entry {}", id);
                cache.pop(&id);
                Ok(None)
            }
            None => Ok(None),
        }
    }
}
