//! Per-request key/value store.
//!
//! Values are type-erased behind `Arc` so a detached context copy shares them
//! cheaply; accessors are typed at the call site and a type mismatch is an
//! explicit error, never a crash. Reads and writes go through a
//! reader/writer lock because a detached copy may touch the store from
//! another thread; single-owner use takes the lock but never contends.

use std::any::Any;
use std::error::Error;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::FastHashMap;

type Value = Arc<dyn Any + Send + Sync>;

#[derive(Default)]
pub struct Store {
    entries: RwLock<FastHashMap<String, Value>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No value under this key.
    Missing { key: String },
    /// A value exists but is not of the requested type.
    TypeMismatch {
        key: String,
        requested: &'static str,
    },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { key } => write!(f, "key '{key}' does not exist"),
            Self::TypeMismatch { key, requested } => {
                write!(f, "value under key '{key}' is not a {requested}")
            }
        }
    }
}

impl Error for StoreError {}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under `key`, replacing any previous value.
    pub fn set<T: Any + Send + Sync>(&self, key: impl Into<String>, value: T) {
        self.entries.write().insert(key.into(), Arc::new(value));
    }

    /// Typed read. Fails explicitly when the key is absent or holds a value
    /// of another type.
    pub fn get<T: Any + Send + Sync>(&self, key: &str) -> Result<Arc<T>, StoreError> {
        let entries = self.entries.read();
        let value = entries.get(key).ok_or_else(|| StoreError::Missing {
            key: key.to_string(),
        })?;
        value
            .clone()
            .downcast::<T>()
            .map_err(|_| StoreError::TypeMismatch {
                key: key.to_string(),
                requested: std::any::type_name::<T>(),
            })
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.read().contains_key(key)
    }

    pub fn remove(&self, key: &str) -> bool {
        self.entries.write().remove(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub(crate) fn clear(&self) {
        self.entries.write().clear();
    }

    /// Copy for a detached context: entries are cloned under the read lock,
    /// values stay shared through their `Arc`s.
    pub(crate) fn deep_copy(&self) -> Store {
        Store {
            entries: RwLock::new(self.entries.read().clone()),
        }
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = self.entries.read();
        f.debug_struct("Store").field("len", &entries.len()).finish()
    }
}
