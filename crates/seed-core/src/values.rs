//! Column values handed to a persistence backend.
//!
//! A [`crate::Record`] flattens into an ordered `Vec<FieldValue>` matching
//! [`crate::EntityKind::columns`]. Backends convert each variant into their
//! native parameter type.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

/// A single column value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// 32-bit signed integer
    Int32(i32),

    /// 64-bit signed integer (ids and foreign keys)
    Int64(i64),

    /// Exact decimal (money columns)
    Decimal(Decimal),

    /// Text value
    Text(String),

    /// Timestamp with timezone
    Timestamp(DateTime<Utc>),

    /// Binary payload
    Bytes(Vec<u8>),

    /// SQL NULL
    Null,
}

impl FieldValue {
    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Try to get this value as an i64.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int64(i) => Some(*i),
            Self::Int32(i) => Some(i64::from(*i)),
            _ => None,
        }
    }

    /// Try to get this value as a string reference.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Number of payload bytes, for blob accounting.
    pub fn byte_len(&self) -> usize {
        match self {
            Self::Bytes(b) => b.len(),
            _ => 0,
        }
    }
}

impl From<Option<u64>> for FieldValue {
    fn from(id: Option<u64>) -> Self {
        match id {
            Some(id) => FieldValue::Int64(id as i64),
            None => FieldValue::Null,
        }
    }
}

impl From<Option<Vec<u8>>> for FieldValue {
    fn from(bytes: Option<Vec<u8>>) -> Self {
        match bytes {
            Some(bytes) => FieldValue::Bytes(bytes),
            None => FieldValue::Null,
        }
    }
}
