//! Secure credential store backend.
//!
//! The primitive stores one record per account behind platform access
//! control. Lists are wrapped in a single `"values"` field, since an
//! account holds exactly one record.

use std::sync::Arc;

use dashmap::DashMap;
use thiserror::Error;
use tracing::debug;

use crate::error::{StorageError, StorageResult};
use crate::record::{FieldValue, Record, Storable};
use crate::storage::Storage;

use super::{decode_many, decode_one, describe, encode_many};

/// Field under which a record list is wrapped in an account's record.
const LIST_FIELD: &str = "values";

// ============================================================================
// Primitive
// ============================================================================

/// Failure reported by a credential-store primitive.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct CredentialError {
    message: String,
}

impl CredentialError {
    /// Create an error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Access-controlled credential-store primitive.
///
/// Stores at most one record per account identifier. The backend maps
/// [`CredentialError`] onto the storage error set; it never reaches
/// callers of the storage interface directly.
pub trait CredentialStore: Send + Sync {
    /// Load the record stored for an account, if any.
    fn load_account(&self, account: &str) -> Result<Option<Record>, CredentialError>;

    /// Store a record for an account, replacing any prior record.
    fn save_account(&self, account: &str, record: Record) -> Result<(), CredentialError>;

    /// Remove an account's record. No-op if absent.
    fn delete_account(&self, account: &str) -> Result<(), CredentialError>;
}

/// In-memory credential store.
///
/// Cheap to clone; clones share the same underlying accounts.
#[derive(Debug, Clone, Default)]
pub struct MemoryCredentialStore {
    accounts: Arc<DashMap<String, Record>>,
}

impl MemoryCredentialStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load_account(&self, account: &str) -> Result<Option<Record>, CredentialError> {
        Ok(self.accounts.get(account).map(|entry| entry.value().clone()))
    }

    fn save_account(&self, account: &str, record: Record) -> Result<(), CredentialError> {
        self.accounts.insert(account.to_string(), record);
        Ok(())
    }

    fn delete_account(&self, account: &str) -> Result<(), CredentialError> {
        self.accounts.remove(account);
        Ok(())
    }
}

// ============================================================================
// Backend
// ============================================================================

/// Storage backend over a secure credential store.
///
/// The account identifier for key `k` is `<namespace>.<k>`.
///
/// The list wrapper is a backend-level convention: nothing validates
/// that a stored type does not itself declare a single `"values"` list
/// field, in which case a stored single record is indistinguishable
/// from a wrapped list.
#[derive(Debug, Clone)]
pub struct KeychainStorage<C> {
    store: C,
    namespace: String,
}

impl<C: CredentialStore> KeychainStorage<C> {
    /// Create a backend over the given store, scoped to a namespace.
    pub fn new(store: C, namespace: impl Into<String>) -> Self {
        Self {
            store,
            namespace: namespace.into(),
        }
    }

    fn account(&self, key: &str) -> String {
        format!("{}.{key}", self.namespace)
    }

    fn load(&self, account: &str) -> StorageResult<Option<Record>> {
        self.store
            .load_account(account)
            .map_err(|e| StorageError::read(account, e))
    }

    fn save(&self, account: &str, record: Record) -> StorageResult<()> {
        self.store
            .save_account(account, record)
            .map_err(|e| StorageError::persist(account, e))
    }
}

/// Whether a record looks like a wrapped record list.
fn is_wrapper(record: &Record) -> bool {
    record.len() == 1 && record.get_list(LIST_FIELD).is_some()
}

/// Wrap records under the list field.
fn wrap(records: Vec<Record>) -> Record {
    let values: Vec<FieldValue> = records.into_iter().map(FieldValue::Map).collect();
    Record::new().with(LIST_FIELD, values)
}

/// Unwrap a wrapped record list.
fn unwrap_list(record: &Record) -> StorageResult<Vec<Record>> {
    if !is_wrapper(record) {
        return Err(StorageError::shape("a wrapped record list", describe(record)));
    }
    let values = record.get_list(LIST_FIELD).unwrap_or_default();
    values
        .iter()
        .map(|value| {
            value
                .as_map()
                .cloned()
                .ok_or_else(|| StorageError::shape("a record", "a non-record list element"))
        })
        .collect()
}

impl<T: Storable, C: CredentialStore> Storage<T> for KeychainStorage<C> {
    fn store(&self, value: &T, key: &str) -> StorageResult<()> {
        let record = value.to_record()?;
        let account = self.account(key);
        self.save(&account, record)?;
        debug!(account = %account, "stored record");
        Ok(())
    }

    fn store_many(&self, values: &[T], key: &str) -> StorageResult<()> {
        let records = encode_many(values)?;
        let account = self.account(key);
        self.save(&account, wrap(records))?;
        debug!(account = %account, count = values.len(), "stored record list");
        Ok(())
    }

    fn retrieve(&self, key: &str) -> StorageResult<Option<T>> {
        match self.load(&self.account(key))? {
            None => Ok(None),
            Some(record) if is_wrapper(&record) => Err(StorageError::shape(
                "a single record",
                "a wrapped record list",
            )),
            Some(record) => decode_one(&record).map(Some),
        }
    }

    fn retrieve_many(&self, key: &str) -> StorageResult<Option<Vec<T>>> {
        match self.load(&self.account(key))? {
            None => Ok(None),
            Some(record) => {
                let records = unwrap_list(&record)?;
                decode_many(&records).map(Some)
            }
        }
    }
}
