//! Storage error types.

use thiserror::Error;

use crate::record::Record;

/// Boxed error from an underlying persistence primitive.
type Source = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur during storage operations.
///
/// Backends map their primitive's native failures onto these variants;
/// primitive-specific error types never cross the storage boundary.
/// A missing value is not an error: retrieval returns `Ok(None)`.
#[derive(Debug, Error)]
pub enum StorageError {
    /// A value could not be converted into a record.
    #[error("failed to encode {type_name}: {reason}")]
    EncodingFailed {
        type_name: &'static str,
        reason: String,
    },

    /// The underlying primitive rejected a write of a valid record.
    #[error("failed to persist record at {location}")]
    PersistFailed {
        location: String,
        #[source]
        source: Source,
    },

    /// The underlying primitive could not be read.
    #[error("failed to read record at {location}")]
    RetrieveFailed {
        location: String,
        #[source]
        source: Source,
    },

    /// Data read back does not have the shape the backend expects.
    ///
    /// Raised both for undecodable data and for structural mismatches,
    /// such as a record list where a single record was expected, or a
    /// record whose fields belong to a different type.
    #[error("unexpected shape: expected {expected}, found {found}")]
    UnexpectedShape {
        expected: &'static str,
        found: String,
    },

    /// A structurally plausible record could not be decoded into the
    /// target type.
    #[error("failed to decode record into {type_name}")]
    DecodingFailed {
        type_name: &'static str,
        record: Record,
    },
}

/// Result type for storage operations.
pub type StorageResult<T> = std::result::Result<T, StorageError>;

impl StorageError {
    /// Create an encoding error for type `T`.
    pub fn encoding<T>(reason: impl Into<String>) -> Self {
        Self::EncodingFailed {
            type_name: std::any::type_name::<T>(),
            reason: reason.into(),
        }
    }

    /// Create a persist error at the given location.
    pub fn persist(location: impl Into<String>, source: impl Into<Source>) -> Self {
        Self::PersistFailed {
            location: location.into(),
            source: source.into(),
        }
    }

    /// Create a read error at the given location.
    pub fn read(location: impl Into<String>, source: impl Into<Source>) -> Self {
        Self::RetrieveFailed {
            location: location.into(),
            source: source.into(),
        }
    }

    /// Create a shape error.
    pub fn shape(expected: &'static str, found: impl Into<String>) -> Self {
        Self::UnexpectedShape {
            expected,
            found: found.into(),
        }
    }

    /// Create a decoding error for type `T`.
    pub fn decoding<T>(record: Record) -> Self {
        Self::DecodingFailed {
            type_name: std::any::type_name::<T>(),
            record,
        }
    }
}
