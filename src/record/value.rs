//! Typed values crossing the repository boundary

use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// Date format used for storage and JSON output
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A validated, typed field value
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Field omitted and not required; stored as NULL
    Null,
    Int(i64),
    Float(f64),
    Date(NaiveDate),
    Text(String),
}

impl FieldValue {
    /// Returns true for the explicit null marker
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Returns the value as it would be read back from storage
    pub fn to_storage_string(&self) -> Option<String> {
        match self {
            FieldValue::Null => None,
            FieldValue::Int(v) => Some(v.to_string()),
            FieldValue::Float(v) => Some(v.to_string()),
            FieldValue::Date(d) => Some(d.format(DATE_FORMAT).to_string()),
            FieldValue::Text(s) => Some(s.clone()),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_storage_string() {
            Some(s) => write!(f, "{}", s),
            None => write!(f, "NULL"),
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Null => serializer.serialize_none(),
            FieldValue::Int(v) => serializer.serialize_i64(*v),
            FieldValue::Float(v) => serializer.serialize_f64(*v),
            FieldValue::Date(d) => serializer.collect_str(&d.format(DATE_FORMAT)),
            FieldValue::Text(s) => serializer.serialize_str(s),
        }
    }
}

/// Validation pipeline output: field name to typed value
pub type CleanData = HashMap<String, FieldValue>;

/// A stored row: column name to string value, `None` for NULL
pub type Record = HashMap<String, Option<String>>;
