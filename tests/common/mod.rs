//! Common test fixtures.

use anystore::{Decoded, Record, Storable, StorageResult};

/// Simple two-field value stored by the integration tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Person {
    pub name: String,
    pub age: i64,
}

impl Person {
    pub fn new(name: &str, age: i64) -> Self {
        Self {
            name: name.to_string(),
            age,
        }
    }
}

impl Storable for Person {
    fn to_record(&self) -> StorageResult<Record> {
        Ok(Record::new()
            .with("name", self.name.as_str())
            .with("age", self.age))
    }

    fn from_record(record: &Record) -> StorageResult<Decoded<Self>> {
        let (Some(name), Some(age)) = (record.get_str("name"), record.get_i64("age")) else {
            return Ok(Decoded::Mismatch);
        };
        Ok(Decoded::Value(Self {
            name: name.to_string(),
            age,
        }))
    }
}
