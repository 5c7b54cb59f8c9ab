//! Key-value defaults store backend.
//!
//! The primitive is an in-process key-value store that holds primitive
//! values but no structured records, so the backend serializes records
//! into a single opaque byte blob per key and deserializes on read.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::{debug, warn};

use crate::error::{StorageError, StorageResult};
use crate::record::Storable;
use crate::storage::Storage;

use super::{encode_many, into_many, into_one, Payload};

// ============================================================================
// Primitive
// ============================================================================

/// In-process key-value primitive with byte values.
///
/// The backend owns all encoding and decoding around this boundary;
/// implementations only move bytes.
pub trait DefaultsStore: Send + Sync {
    /// Read the bytes stored at a key, if any.
    fn get(&self, key: &str) -> Option<Vec<u8>>;

    /// Store bytes at a key, replacing any prior value.
    fn set(&self, key: &str, bytes: Vec<u8>);

    /// Remove the value at a key. No-op if absent.
    fn remove(&self, key: &str);
}

/// In-memory defaults store. One instance is one namespace.
///
/// Cheap to clone; clones share the same underlying entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryDefaults {
    entries: Arc<DashMap<String, Vec<u8>>>,
}

impl MemoryDefaults {
    /// Create an empty namespace.
    pub fn new() -> Self {
        Self::default()
    }
}

impl DefaultsStore for MemoryDefaults {
    fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    fn set(&self, key: &str, bytes: Vec<u8>) {
        self.entries.insert(key.to_string(), bytes);
    }

    fn remove(&self, key: &str) {
        self.entries.remove(key);
    }
}

// ============================================================================
// Backend
// ============================================================================

/// Storage backend over a key-value defaults store.
#[derive(Debug, Clone)]
pub struct DefaultsStorage<D> {
    defaults: D,
}

impl<D: DefaultsStore> DefaultsStorage<D> {
    /// Create a backend over the given defaults store.
    pub fn new(defaults: D) -> Self {
        Self { defaults }
    }

    fn write(&self, payload: &Payload, key: &str) -> StorageResult<()> {
        let bytes = serde_json::to_vec(payload).map_err(|e| StorageError::persist(key, e))?;
        self.defaults.set(key, bytes);
        Ok(())
    }

    fn read(&self, key: &str) -> StorageResult<Option<Payload>> {
        let Some(bytes) = self.defaults.get(key) else {
            return Ok(None);
        };
        match serde_json::from_slice(&bytes) {
            Ok(payload) => Ok(Some(payload)),
            Err(error) => {
                warn!(key = %key, error = %error, "stored blob is not a record payload");
                Err(StorageError::shape("a record payload", "an undecodable blob"))
            }
        }
    }
}

impl<T: Storable, D: DefaultsStore> Storage<T> for DefaultsStorage<D> {
    fn store(&self, value: &T, key: &str) -> StorageResult<()> {
        let record = value.to_record()?;
        self.write(&Payload::One(record), key)?;
        debug!(key = %key, "stored record");
        Ok(())
    }

    fn store_many(&self, values: &[T], key: &str) -> StorageResult<()> {
        let records = encode_many(values)?;
        self.write(&Payload::Many(records), key)?;
        debug!(key = %key, count = values.len(), "stored record list");
        Ok(())
    }

    fn retrieve(&self, key: &str) -> StorageResult<Option<T>> {
        self.read(key)?.map(into_one).transpose()
    }

    fn retrieve_many(&self, key: &str) -> StorageResult<Option<Vec<T>>> {
        self.read(key)?.map(into_many).transpose()
    }
}
