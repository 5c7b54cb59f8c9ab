//! Conversion between domain values and their stored records.
//!
//! A [`Record`] is a flat, string-keyed mapping of primitive-encodable
//! field values. It is the serialization boundary of the crate: nothing
//! above it inspects a domain type directly, nothing below it inspects
//! a domain type's shape. Types opt into storage by implementing
//! [`Storable`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::StorageResult;

// ============================================================================
// Field Values
// ============================================================================

/// A primitive-encodable field value.
///
/// Variants are tagged in serialized form so that values round-trip
/// exactly: an `Integer` never comes back as a `Float`, and `Bytes`
/// never come back as a `List`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Bytes(Vec<u8>),
    /// A nested record.
    Map(Record),
    List(Vec<FieldValue>),
}

impl FieldValue {
    /// Borrow the string, if this is a `String` value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// The integer, if this is an `Integer` value.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// The float, if this is a `Float` value.
    ///
    /// Integers are not coerced; a field written as `Integer` reads
    /// back as `Integer`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// The boolean, if this is a `Bool` value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Borrow the bytes, if this is a `Bytes` value.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            FieldValue::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Borrow the nested record, if this is a `Map` value.
    pub fn as_map(&self) -> Option<&Record> {
        match self {
            FieldValue::Map(record) => Some(record),
            _ => None,
        }
    }

    /// Borrow the elements, if this is a `List` value.
    pub fn as_list(&self) -> Option<&[FieldValue]> {
        match self {
            FieldValue::List(values) => Some(values),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::String(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Integer(i64::from(value))
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<Vec<u8>> for FieldValue {
    fn from(value: Vec<u8>) -> Self {
        FieldValue::Bytes(value)
    }
}

impl From<&[u8]> for FieldValue {
    fn from(value: &[u8]) -> Self {
        FieldValue::Bytes(value.to_vec())
    }
}

impl From<Record> for FieldValue {
    fn from(value: Record) -> Self {
        FieldValue::Map(value)
    }
}

impl From<Vec<FieldValue>> for FieldValue {
    fn from(value: Vec<FieldValue>) -> Self {
        FieldValue::List(value)
    }
}

// ============================================================================
// Records
// ============================================================================

/// A flat, string-keyed mapping of primitive-encodable values.
///
/// Field order is irrelevant: two records with the same fields compare
/// equal regardless of insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: BTreeMap<String, FieldValue>,
}

impl Record {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field, builder-style.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Add or replace a field.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Look up a field by name.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Look up a string field.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name)?.as_str()
    }

    /// Look up an integer field.
    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.get(name)?.as_i64()
    }

    /// Look up a float field.
    pub fn get_f64(&self, name: &str) -> Option<f64> {
        self.get(name)?.as_f64()
    }

    /// Look up a boolean field.
    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name)?.as_bool()
    }

    /// Look up a bytes field.
    pub fn get_bytes(&self, name: &str) -> Option<&[u8]> {
        self.get(name)?.as_bytes()
    }

    /// Look up a nested record field.
    pub fn get_map(&self, name: &str) -> Option<&Record> {
        self.get(name)?.as_map()
    }

    /// Look up a list field.
    pub fn get_list(&self, name: &str) -> Option<&[FieldValue]> {
        self.get(name)?.as_list()
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate over field names.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Iterate over fields.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }
}

// ============================================================================
// Conversion Contract
// ============================================================================

/// Outcome of decoding a record back into a domain value.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded<T> {
    /// The record belongs to this type and was reconstructed.
    Value(T),
    /// The record's structure cannot belong to this type.
    ///
    /// Distinct from a decoding failure: the fields this type declares
    /// are absent or of the wrong kind entirely, rather than present
    /// but malformed. Backends use the distinction to tell "a record
    /// of a different type is stored here" apart from "corrupt data".
    Mismatch,
}

impl<T> Decoded<T> {
    /// The reconstructed value, if any.
    pub fn into_value(self) -> Option<T> {
        match self {
            Decoded::Value(value) => Some(value),
            Decoded::Mismatch => None,
        }
    }

    /// Whether this is a structural mismatch.
    pub fn is_mismatch(&self) -> bool {
        matches!(self, Decoded::Mismatch)
    }
}

/// Implemented by types that can be stored.
///
/// Both directions are pure and total over the declared field set.
/// Converting a value to a record and back must reconstruct a value
/// equal to the original in every stored field.
pub trait Storable: Sized {
    /// Convert this value into its stored record.
    ///
    /// Fails with [`EncodingFailed`](crate::StorageError::EncodingFailed)
    /// if a field cannot be represented.
    fn to_record(&self) -> StorageResult<Record>;

    /// Reconstruct a value from a stored record.
    ///
    /// Returns [`Decoded::Mismatch`] when the record structurally
    /// cannot belong to this type, and an error when its fields are
    /// present but malformed.
    fn from_record(record: &Record) -> StorageResult<Decoded<Self>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;
    use crate::testing::Person;

    #[test]
    fn person_round_trips() {
        let person = Person::new("Bob", 99);
        let record = person.to_record().unwrap();

        let decoded = Person::from_record(&record).unwrap();
        assert_eq!(decoded, Decoded::Value(person));
    }

    #[test]
    fn missing_field_is_a_mismatch() {
        let record = Record::new().with("name", "Bob");
        assert!(Person::from_record(&record).unwrap().is_mismatch());
    }

    #[test]
    fn wrong_field_kind_is_a_mismatch() {
        let record = Record::new().with("name", "Bob").with("age", "ninety-nine");
        assert!(Person::from_record(&record).unwrap().is_mismatch());
    }

    #[test]
    fn malformed_field_is_a_decoding_error() {
        let record = Record::new().with("name", "Bob").with("age", -1);
        assert!(matches!(
            Person::from_record(&record),
            Err(StorageError::DecodingFailed { .. })
        ));
    }

    #[test]
    fn field_order_does_not_affect_equality() {
        let a = Record::new().with("name", "Bob").with("age", 99);
        let b = Record::new().with("age", 99).with("name", "Bob");
        assert_eq!(a, b);
    }

    #[test]
    fn accessors_do_not_coerce() {
        let record = Record::new()
            .with("count", 3)
            .with("ratio", 0.5)
            .with("label", "x");

        assert_eq!(record.get_i64("count"), Some(3));
        assert_eq!(record.get_f64("count"), None);
        assert_eq!(record.get_f64("ratio"), Some(0.5));
        assert_eq!(record.get_i64("ratio"), None);
        assert_eq!(record.get_str("label"), Some("x"));
        assert_eq!(record.get_bool("label"), None);
    }

    #[test]
    fn every_value_kind_survives_serialization() {
        let record = Record::new()
            .with("string", "text")
            .with("integer", 7)
            .with("float", 1.0)
            .with("bool", true)
            .with("bytes", vec![0u8, 159, 146, 150])
            .with("map", Record::new().with("inner", 1))
            .with(
                "list",
                vec![FieldValue::Integer(1), FieldValue::String("two".into())],
            );

        let bytes = serde_json::to_vec(&record).unwrap();
        let parsed: Record = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(parsed, record);
        // The tagged encoding keeps 1.0 a float and 7 an integer.
        assert_eq!(parsed.get_f64("float"), Some(1.0));
        assert_eq!(parsed.get_i64("integer"), Some(7));
    }

    #[test]
    fn nested_records_are_reachable() {
        let record = Record::new().with("inner", Record::new().with("deep", true));
        let inner = record.get_map("inner").unwrap();
        assert_eq!(inner.get_bool("deep"), Some(true));
    }
}
