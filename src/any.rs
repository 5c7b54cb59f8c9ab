//! Type-erased storage handle.

use std::fmt;

use crate::error::StorageResult;
use crate::record::Storable;
use crate::storage::Storage;

/// A storage handle that hides which backend it wraps.
///
/// Wraps exactly one backend for a fixed record type `T`, discarding
/// the backend's concrete type. The handle moves around like any other
/// value; at the call site it is indistinguishable from a handle over
/// any other backend for the same `T`.
///
/// The handle is a pure forwarding facade: it never re-binds to a
/// different backend, performs no conversion or validation of its own,
/// and holds no state beyond the wrapped backend. Calling an operation
/// on the handle is observably identical to calling it on the backend
/// directly.
pub struct AnyStorage<T: Storable> {
    inner: Box<dyn Storage<T>>,
}

impl<T: Storable> AnyStorage<T> {
    /// Wrap a concrete backend, erasing its type.
    pub fn new(storage: impl Storage<T> + 'static) -> Self {
        Self {
            inner: Box::new(storage),
        }
    }
}

impl<T: Storable> Storage<T> for AnyStorage<T> {
    fn store(&self, value: &T, key: &str) -> StorageResult<()> {
        self.inner.store(value, key)
    }

    fn store_many(&self, values: &[T], key: &str) -> StorageResult<()> {
        self.inner.store_many(values, key)
    }

    fn retrieve(&self, key: &str) -> StorageResult<Option<T>> {
        self.inner.retrieve(key)
    }

    fn retrieve_many(&self, key: &str) -> StorageResult<Option<Vec<T>>> {
        self.inner.retrieve_many(key)
    }
}

impl<T: Storable> fmt::Debug for AnyStorage<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnyStorage").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{DefaultsStorage, MemoryDefaults};
    use crate::testing::Person;

    fn load_example(storage: &AnyStorage<Person>) -> Option<Person> {
        storage.retrieve("example").unwrap()
    }

    #[test]
    fn handle_matches_direct_backend_calls() {
        let defaults = MemoryDefaults::new();
        let direct = DefaultsStorage::new(defaults.clone());
        let erased = AnyStorage::new(DefaultsStorage::new(defaults));

        let person = Person::new("Bob", 99);
        erased.store(&person, "example").unwrap();

        // Same primitive, so the direct backend observes the write.
        assert_eq!(direct.retrieve("example").unwrap(), Some(person.clone()));
        assert_eq!(erased.retrieve("example").unwrap(), Some(person));
        assert_eq!(
            Storage::<Person>::retrieve(&erased, "missing").unwrap(),
            None
        );
    }

    #[test]
    fn handle_can_be_passed_as_a_parameter() {
        let storage = AnyStorage::new(DefaultsStorage::new(MemoryDefaults::new()));

        let person = Person::new("Alice", 30);
        storage.store(&person, "example").unwrap();

        assert_eq!(load_example(&storage), Some(person));
    }

    #[test]
    fn handle_wraps_another_handle() {
        let storage = AnyStorage::new(AnyStorage::new(DefaultsStorage::new(
            MemoryDefaults::new(),
        )));

        let person = Person::new("Bob", 99);
        storage.store(&person, "example").unwrap();
        assert_eq!(storage.retrieve("example").unwrap(), Some(person));
    }
}
