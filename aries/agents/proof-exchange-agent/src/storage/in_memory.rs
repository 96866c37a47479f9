use std::{
    collections::HashMap,
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::error::*;

/// Lookup data of a stored object that never changes over the object's lifetime, so it can be
/// searched without taking the object's lock.
pub trait Keyed {
    type Key: Clone + Send + Sync;

    fn key(&self) -> Self::Key;
}

/// Outcome of [ObjectCache::find_or_insert].
#[derive(Debug, PartialEq, Eq)]
pub enum Lookup {
    /// Ids of the stored objects the predicate matched; nothing was inserted.
    Found(Vec<String>),
    Inserted(String),
}

struct CacheEntry<T: Keyed> {
    key: T::Key,
    object: Arc<Mutex<T>>,
}

/// In-memory object store. Every object sits behind its own async lock, held by callers for
/// the whole read-modify-write of one operation.
pub struct ObjectCache<T>
where
    T: Keyed + Clone,
{
    cache_name: String,
    store: RwLock<HashMap<String, CacheEntry<T>>>,
}

impl<T> ObjectCache<T>
where
    T: Keyed + Clone,
{
    pub fn new(cache_name: &str) -> ObjectCache<T> {
        ObjectCache {
            store: Default::default(),
            cache_name: cache_name.to_string(),
        }
    }

    fn lock_store_read(&self) -> AgentResult<RwLockReadGuard<'_, HashMap<String, CacheEntry<T>>>> {
        self.store.read().map_err(|err| {
            error!("Unable to read-lock Object Store: {:?}", err);
            AgentError::from_msg(
                AgentErrorKind::LockError,
                &format!(
                    "[ObjectCache: {}] Unable to lock Object Store: {:?}",
                    self.cache_name, err
                ),
            )
        })
    }

    fn lock_store_write(
        &self,
    ) -> AgentResult<RwLockWriteGuard<'_, HashMap<String, CacheEntry<T>>>> {
        self.store.write().map_err(|err| {
            error!("Unable to write-lock Object Store: {:?}", err);
            AgentError::from_msg(
                AgentErrorKind::LockError,
                &format!(
                    "[ObjectCache: {}] Unable to lock Object Store: {:?}",
                    self.cache_name, err
                ),
            )
        })
    }

    fn not_found(&self, id: &str) -> AgentError {
        AgentError::from_msg(
            AgentErrorKind::NotFound,
            &format!(
                "[ObjectCache: {}] Object not found for id: {}",
                self.cache_name, id
            ),
        )
    }

    fn entry_object(&self, id: &str) -> AgentResult<Arc<Mutex<T>>> {
        let store = self.lock_store_read()?;
        store
            .get(id)
            .map(|entry| entry.object.clone())
            .ok_or_else(|| self.not_found(id))
    }

    pub fn has_id(&self, id: &str) -> bool {
        self.lock_store_read()
            .map(|store| store.contains_key(id))
            .unwrap_or(false)
    }

    /// Adds a new object. An id that is already taken is refused.
    pub fn insert(&self, id: &str, obj: T) -> AgentResult<String> {
        let mut store = self.lock_store_write()?;
        if store.contains_key(id) {
            return Err(AgentError::from_msg(
                AgentErrorKind::InvalidArguments,
                &format!("[ObjectCache: {}] Id {} is already taken", self.cache_name, id),
            ));
        }
        store.insert(
            id.to_string(),
            CacheEntry {
                key: obj.key(),
                object: Arc::new(Mutex::new(obj)),
            },
        );
        Ok(id.to_string())
    }

    /// Looks up objects whose key satisfies `predicate` and, when there are none, inserts
    /// `obj` under `id` before the store lock is released.
    pub fn find_or_insert<F>(&self, predicate: F, id: &str, obj: T) -> AgentResult<Lookup>
    where
        F: Fn(&T::Key) -> bool,
    {
        let mut store = self.lock_store_write()?;
        let found: Vec<String> = store
            .iter()
            .filter(|(_, entry)| predicate(&entry.key))
            .map(|(id, _)| id.clone())
            .collect();
        if !found.is_empty() {
            return Ok(Lookup::Found(found));
        }
        if store.contains_key(id) {
            return Err(AgentError::from_msg(
                AgentErrorKind::InvalidArguments,
                &format!("[ObjectCache: {}] Id {} is already taken", self.cache_name, id),
            ));
        }
        store.insert(
            id.to_string(),
            CacheEntry {
                key: obj.key(),
                object: Arc::new(Mutex::new(obj)),
            },
        );
        Ok(Lookup::Inserted(id.to_string()))
    }

    /// Waits for exclusive access to the object. Fails with `NotFound` when the object was
    /// removed while waiting.
    pub async fn lock(&self, id: &str) -> AgentResult<OwnedMutexGuard<T>> {
        let object = self.entry_object(id)?;
        let guard = object.clone().lock_owned().await;

        let still_stored = self
            .lock_store_read()?
            .get(id)
            .is_some_and(|entry| Arc::ptr_eq(&entry.object, &object));
        if !still_stored {
            return Err(self.not_found(id));
        }
        Ok(guard)
    }

    pub async fn get_cloned(&self, id: &str) -> AgentResult<T> {
        let object = self.entry_object(id)?;
        let obj = object.lock().await;
        Ok(obj.clone())
    }

    pub fn remove(&self, id: &str) -> AgentResult<()> {
        let mut store = self.lock_store_write()?;
        store
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| self.not_found(id))
    }

    /// Ids of the objects whose key satisfies `predicate`.
    pub fn find_by<F>(&self, predicate: F) -> AgentResult<Vec<String>>
    where
        F: Fn(&T::Key) -> bool,
    {
        let store = self.lock_store_read()?;
        Ok(store
            .iter()
            .filter(|(_, entry)| predicate(&entry.key))
            .map(|(id, _)| id.clone())
            .collect())
    }

    pub async fn values_cloned(&self) -> AgentResult<Vec<T>> {
        let objects: Vec<_> = self
            .lock_store_read()?
            .values()
            .map(|entry| entry.object.clone())
            .collect();
        let mut values = Vec::with_capacity(objects.len());
        for object in objects {
            values.push(object.lock().await.clone());
        }
        Ok(values)
    }
}
