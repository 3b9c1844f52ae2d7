use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to serialize {key}")]
    Serialize {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("Store rejected write to {key}: {reason}")]
    Rejected { key: String, reason: String },
    #[error("Storage I/O failed")]
    Io(#[from] std::io::Error),
}

/// String-keyed persistence collaborator.
///
/// Reads never fail: a missing or unreadable value is `None`.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &mut S {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        self.entries.insert(key.to_owned(), value);
        Ok(())
    }
}

/// Associates a type with the key its JSON form is stored under.
pub trait StorageKey {
    const KEY: &'static str;
}

pub trait StoredOrDefault: Sized {
    /// Loads the stored value, falling back to the default when it is missing or malformed.
    fn load_or_default(store: &impl KeyValueStore) -> Self;
}

impl<T: StorageKey + DeserializeOwned + Default> StoredOrDefault for T {
    fn load_or_default(store: &impl KeyValueStore) -> Self {
        let Some(raw) = store.get(T::KEY) else {
            log::debug!("nothing stored under {}", T::KEY);
            return T::default();
        };

        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(err) => {
                log::warn!("discarding malformed value under {}: {}", T::KEY, err);
                T::default()
            }
        }
    }
}

pub trait Stored {
    fn save(&self, store: &mut impl KeyValueStore) -> Result<(), StorageError>;
}

impl<T: StorageKey + Serialize> Stored for T {
    fn save(&self, store: &mut impl KeyValueStore) -> Result<(), StorageError> {
        let raw = serde_json::to_string(self).map_err(|source| StorageError::Serialize {
            key: T::KEY,
            source,
        })?;
        store.set(T::KEY, raw)
    }
}
