//! File archive backend.
//!
//! One durable file per key under an owned directory root. Writes go
//! to a sibling temp file first and are renamed into place, so a
//! failed write never leaves a partially written archive behind.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{StorageError, StorageResult};
use crate::record::Storable;
use crate::storage::Storage;

use super::{encode_many, into_many, into_one, Payload};

/// Storage backend archiving records to files.
///
/// The backend owns a directory root; key `k` is archived at
/// `<root>/k.json`. Keys may contain `/` to nest below the root.
/// Parent directories are created on store.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    /// Create a backend rooted at the given directory.
    ///
    /// The directory does not need to exist yet.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn archive_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }

    fn write(&self, payload: &Payload, key: &str) -> StorageResult<()> {
        let path = self.archive_path(key);
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|e| StorageError::persist(location(dir), e))?;
        }

        let bytes =
            serde_json::to_vec(payload).map_err(|e| StorageError::persist(location(&path), e))?;

        let temp = path.with_extension("json.tmp");
        fs::write(&temp, &bytes).map_err(|e| StorageError::persist(location(&temp), e))?;
        fs::rename(&temp, &path).map_err(|e| StorageError::persist(location(&path), e))?;
        Ok(())
    }

    fn read(&self, key: &str) -> StorageResult<Option<Payload>> {
        let path = self.archive_path(key);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StorageError::read(location(&path), e)),
        };
        match serde_json::from_slice(&bytes) {
            Ok(payload) => Ok(Some(payload)),
            Err(error) => {
                warn!(path = %path.display(), error = %error, "archive is not a record payload");
                Err(StorageError::shape(
                    "a record payload",
                    "an undecodable archive",
                ))
            }
        }
    }
}

impl<T: Storable> Storage<T> for FileStorage {
    fn store(&self, value: &T, key: &str) -> StorageResult<()> {
        let record = value.to_record()?;
        self.write(&Payload::One(record), key)?;
        debug!(path = %self.archive_path(key).display(), "archived record");
        Ok(())
    }

    fn store_many(&self, values: &[T], key: &str) -> StorageResult<()> {
        let records = encode_many(values)?;
        self.write(&Payload::Many(records), key)?;
        debug!(
            path = %self.archive_path(key).display(),
            count = values.len(),
            "archived record list"
        );
        Ok(())
    }

    fn retrieve(&self, key: &str) -> StorageResult<Option<T>> {
        self.read(key)?.map(into_one).transpose()
    }

    fn retrieve_many(&self, key: &str) -> StorageResult<Option<Vec<T>>> {
        self.read(key)?.map(into_many).transpose()
    }
}

fn location(path: &Path) -> String {
    path.display().to_string()
}
