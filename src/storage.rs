//! Storage interface and the bound-key adapter.
//!
//! [`Storage`] is the canonical interface: the key travels with each
//! call and each backend owns its own key-to-location mapping.
//! [`BoundStorage`] is the second shape, for single-purpose stores
//! that always address the same location; [`Bound`] adapts any
//! per-call-key storage into it by fixing the key at construction.

use crate::error::StorageResult;
use crate::record::Storable;

/// Storage interface over one persistence primitive.
///
/// Implementations convert values to records, write them through their
/// primitive, and reconstruct values on retrieval. Overwriting via
/// [`store`](Storage::store) / [`store_many`](Storage::store_many) is
/// the only update mechanism; there is no partial or merge update.
///
/// Operations are synchronous and run to completion in the caller's
/// thread. The interface provides no locking: callers that share one
/// backend instance across threads must serialize access themselves.
pub trait Storage<T: Storable>: Send + Sync {
    /// Convert and persist one record, overwriting any prior value at
    /// the key.
    fn store(&self, value: &T, key: &str) -> StorageResult<()>;

    /// Convert and persist a sequence as a single write.
    ///
    /// Every element is converted before anything is written: if any
    /// element fails to convert, the prior state at the key is left
    /// untouched.
    fn store_many(&self, values: &[T], key: &str) -> StorageResult<()>;

    /// Retrieve the record stored at the key.
    ///
    /// Returns `Ok(None)` when nothing is stored at the key, and a
    /// typed error when something is stored but unreadable or does not
    /// decode into `T`.
    fn retrieve(&self, key: &str) -> StorageResult<Option<T>>;

    /// Retrieve the record list stored at the key.
    ///
    /// Elements come back in the order they were stored. Absence and
    /// error semantics match [`retrieve`](Storage::retrieve); a list
    /// either decodes fully or fails entirely.
    fn retrieve_many(&self, key: &str) -> StorageResult<Option<Vec<T>>>;
}

/// Storage with the key fixed at construction.
///
/// Same capability set as [`Storage`], unparameterized by key.
pub trait BoundStorage<T: Storable>: Send + Sync {
    /// Convert and persist one record at the bound key.
    fn store(&self, value: &T) -> StorageResult<()>;

    /// Convert and persist a sequence at the bound key.
    fn store_many(&self, values: &[T]) -> StorageResult<()>;

    /// Retrieve the record stored at the bound key.
    fn retrieve(&self) -> StorageResult<Option<T>>;

    /// Retrieve the record list stored at the bound key.
    fn retrieve_many(&self) -> StorageResult<Option<Vec<T>>>;
}

/// Adapter fixing a key over a per-call-key storage.
///
/// Works over any [`Storage`] implementation, including the type-erased
/// [`AnyStorage`](crate::AnyStorage).
#[derive(Debug, Clone)]
pub struct Bound<S> {
    inner: S,
    key: String,
}

impl<S> Bound<S> {
    /// Bind `key` to `inner`.
    pub fn new(inner: S, key: impl Into<String>) -> Self {
        Self {
            inner,
            key: key.into(),
        }
    }

    /// The bound key.
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl<T: Storable, S: Storage<T>> BoundStorage<T> for Bound<S> {
    fn store(&self, value: &T) -> StorageResult<()> {
        self.inner.store(value, &self.key)
    }

    fn store_many(&self, values: &[T]) -> StorageResult<()> {
        self.inner.store_many(values, &self.key)
    }

    fn retrieve(&self) -> StorageResult<Option<T>> {
        self.inner.retrieve(&self.key)
    }

    fn retrieve_many(&self) -> StorageResult<Option<Vec<T>>> {
        self.inner.retrieve_many(&self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{DefaultsStorage, MemoryDefaults};
    use crate::testing::Person;

    #[test]
    fn bound_storage_addresses_its_fixed_key() {
        let defaults = MemoryDefaults::new();
        let storage = DefaultsStorage::new(defaults.clone());
        let bound = Bound::new(DefaultsStorage::new(defaults), "profile");

        let person = Person::new("Alice", 30);
        bound.store(&person).unwrap();

        // Visible through the per-call-key shape at the same key.
        assert_eq!(storage.retrieve("profile").unwrap(), Some(person));
        assert_eq!(bound.key(), "profile");
    }

    #[test]
    fn bound_storage_round_trips_lists() {
        let bound = Bound::new(DefaultsStorage::new(MemoryDefaults::new()), "people");

        let people = vec![Person::new("Alice", 30), Person::new("Bob", 99)];
        assert_eq!(BoundStorage::<Person>::retrieve_many(&bound).unwrap(), None);

        bound.store_many(&people).unwrap();
        assert_eq!(bound.retrieve_many().unwrap(), Some(people));
    }
}
