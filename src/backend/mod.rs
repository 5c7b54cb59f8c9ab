//! Backend adapters over concrete persistence primitives.
//!
//! Each backend implements [`Storage`](crate::Storage) for every
//! storable type by translating the interface into calls against its
//! primitive:
//!
//! - [`DefaultsStorage`]: in-process key-value store; records are
//!   serialized into one opaque blob per key.
//! - [`FileStorage`]: one durable file per key under an owned
//!   directory root, written atomically.
//! - [`KeychainStorage`]: access-controlled credential store, one
//!   record per account.
//!
//! Backends share the codec in this module. Conversion is
//! all-or-nothing for lists, and a stored record that does not belong
//! to the requested type surfaces as
//! [`UnexpectedShape`](crate::StorageError::UnexpectedShape) rather
//! than a silent wrong-typed result.

mod defaults;
mod file;
mod keychain;

pub use defaults::{DefaultsStorage, DefaultsStore, MemoryDefaults};
pub use file::FileStorage;
pub use keychain::{CredentialError, CredentialStore, KeychainStorage, MemoryCredentialStore};

use std::any::type_name;

use serde::{Deserialize, Serialize};

use crate::error::{StorageError, StorageResult};
use crate::record::{Decoded, Record, Storable};

/// Blob layout used by blob-oriented primitives: a single record or an
/// ordered list of records. Untagged, so a serialized list can never
/// be mistaken for a single record or vice versa.
#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub(crate) enum Payload {
    One(Record),
    Many(Vec<Record>),
}

/// Convert a sequence of values into records.
///
/// Fails without partial results if any element cannot be converted.
pub(crate) fn encode_many<T: Storable>(values: &[T]) -> StorageResult<Vec<Record>> {
    values.iter().map(T::to_record).collect()
}

/// Decode a record into `T`, surfacing a structural mismatch as an
/// unexpected-shape error.
pub(crate) fn decode_one<T: Storable>(record: &Record) -> StorageResult<T> {
    match T::from_record(record)? {
        Decoded::Value(value) => Ok(value),
        Decoded::Mismatch => Err(StorageError::shape(type_name::<T>(), describe(record))),
    }
}

/// Decode a record list in stored order.
///
/// Fails entirely if any element cannot be decoded.
pub(crate) fn decode_many<T: Storable>(records: &[Record]) -> StorageResult<Vec<T>> {
    records.iter().map(decode_one).collect()
}

/// Interpret a payload as a single record and decode it.
pub(crate) fn into_one<T: Storable>(payload: Payload) -> StorageResult<T> {
    match payload {
        Payload::One(record) => decode_one(&record),
        Payload::Many(records) => Err(StorageError::shape(
            "a single record",
            format!("a list of {} records", records.len()),
        )),
    }
}

/// Interpret a payload as a record list and decode it in order.
pub(crate) fn into_many<T: Storable>(payload: Payload) -> StorageResult<Vec<T>> {
    match payload {
        Payload::Many(records) => decode_many(&records),
        Payload::One(record) => Err(StorageError::shape("a record list", describe(&record))),
    }
}

/// Short structural description of a record, used in shape errors.
pub(crate) fn describe(record: &Record) -> String {
    let names: Vec<&str> = record.field_names().collect();
    format!("a record with fields {{{}}}", names.join(", "))
}
