//! Shared unit-test fixtures.

use crate::error::{StorageError, StorageResult};
use crate::record::{Decoded, Record, Storable};

/// Simple two-field value used across storage tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Person {
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
        // Fields present but malformed: a decoding error, not a mismatch.
        if age < 0 {
            return Err(StorageError::decoding::<Self>(record.clone()));
        }
        Ok(Decoded::Value(Self {
            name: name.to_string(),
            age,
        }))
    }
}

/// Single-field value with a shape disjoint from [`Person`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Token {
    pub secret: String,
}

impl Token {
    pub fn new(secret: &str) -> Self {
        Self {
            secret: secret.to_string(),
        }
    }
}

impl Storable for Token {
    fn to_record(&self) -> StorageResult<Record> {
        Ok(Record::new().with("secret", self.secret.as_str()))
    }

    fn from_record(record: &Record) -> StorageResult<Decoded<Self>> {
        let Some(secret) = record.get_str("secret") else {
            return Ok(Decoded::Mismatch);
        };
        Ok(Decoded::Value(Self {
            secret: secret.to_string(),
        }))
    }
}

/// Value whose encoding always fails.
#[derive(Debug, Clone)]
pub(crate) struct Unencodable;

impl Storable for Unencodable {
    fn to_record(&self) -> StorageResult<Record> {
        Err(StorageError::encoding::<Self>("field cannot be represented"))
    }

    fn from_record(_record: &Record) -> StorageResult<Decoded<Self>> {
        Ok(Decoded::Mismatch)
    }
}
