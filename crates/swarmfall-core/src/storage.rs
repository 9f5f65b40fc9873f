//! Opaque key-value save storage.
//!
//! The simulation owns no persisted state. It reads ability and upgrade
//! levels at stage start and writes accumulated statistics at stage end
//! through this interface; what sits behind it is the caller's business.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{ConfigError, Result};

/// Key-value blob store.
pub trait SaveStore: Send {
    fn get(&self, key: &str) -> Option<Vec<u8>>;
    fn set(&mut self, key: &str, blob: Vec<u8>);
}

/// In-memory store, used by tests and the headless runner.
#[derive(Debug, Clone, Default)]
pub struct MemorySaveStore {
    blobs: HashMap<String, Vec<u8>>,
}

impl MemorySaveStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }
}

impl SaveStore for MemorySaveStore {
    fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.blobs.get(key).cloned()
    }

    fn set(&mut self, key: &str, blob: Vec<u8>) {
        self.blobs.insert(key.to_owned(), blob);
    }
}

/// Decode a JSON blob, `Ok(None)` if the key is absent.
pub fn load_json<T: DeserializeOwned>(
    store: &dyn SaveStore,
    key: &'static str,
) -> Result<Option<T>> {
    match store.get(key) {
        Some(blob) => serde_json::from_slice(&blob)
            .map(Some)
            .map_err(|source| ConfigError::CorruptSave { key, source }),
        None => Ok(None),
    }
}

/// Encode a value as a JSON blob.
pub fn store_json<T: Serialize>(store: &mut dyn SaveStore, key: &str, value: &T) -> Result<()> {
    let blob = serde_json::to_vec(value)?;
    store.set(key, blob);
    Ok(())
}
