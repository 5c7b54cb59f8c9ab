//! Typed persistence over interchangeable storage backends.
//!
//! Values become storable by converting to and from a [`Record`], a
//! flat, string-keyed mapping of primitive-encodable fields. Any
//! backend implementing [`Storage`] can persist them, and
//! [`AnyStorage`] erases the backend's concrete type so a storage can
//! be handed around without naming the backend that produced it.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                        caller                           │
//! └───────────────────────────┬─────────────────────────────┘
//!                             │ AnyStorage<T> / impl Storage<T>
//!                             ▼
//! ┌─────────────────────────────────────────────────────────┐
//! │          backend (Storable::to_record /                 │
//! │                   Storable::from_record)                │
//! └───────────────────────────┬─────────────────────────────┘
//!                             │ bytes / records
//!                             ▼
//! ┌─────────────────────────────────────────────────────────┐
//! │  persistence primitive (defaults store, file archive,   │
//! │                 credential store)                       │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! # Retrieval outcomes
//!
//! Retrieval keeps three situations distinct: nothing stored at the
//! key (`Ok(None)`), a stored record that does not belong to the
//! requested type ([`StorageError::UnexpectedShape`]), and a record of
//! the right shape with malformed fields
//! ([`StorageError::DecodingFailed`]).

pub mod backend;

mod any;
mod error;
mod record;
mod storage;

#[cfg(test)]
pub(crate) mod testing;

pub use any::AnyStorage;
pub use backend::{
    CredentialError, CredentialStore, DefaultsStorage, DefaultsStore, FileStorage,
    KeychainStorage, MemoryCredentialStore, MemoryDefaults,
};
pub use error::{StorageError, StorageResult};
pub use record::{Decoded, FieldValue, Record, Storable};
pub use storage::{Bound, BoundStorage, Storage};
