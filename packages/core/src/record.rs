//! The Record type - file content either as raw bytes or as a parsed value.

use bytes::Bytes;

use crate::{Error, Result, Serializer, Value};

/// What a file holds, as seen by the caller.
///
/// A file with no bound serializer reads back as `Raw`; one with a serializer
/// reads back as `Parsed`. Writes accept either form.
///
/// ```rust
/// use fsstore_core::{Record, Value};
///
/// let raw = Record::raw(&b"plain text"[..]);
/// assert!(raw.is_raw());
///
/// let parsed = Record::from(Value::from("hello"));
/// assert_eq!(parsed.as_value(), Some(&Value::from("hello")));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Record {
    /// Uninterpreted bytes.
    Raw(Bytes),
    /// A decoded value tree.
    Parsed(Value),
}

impl Record {
    pub fn raw(bytes: impl Into<Bytes>) -> Self {
        Record::Raw(bytes.into())
    }

    pub fn parsed(value: Value) -> Self {
        Record::Parsed(value)
    }

    pub fn is_raw(&self) -> bool {
        matches!(self, Record::Raw(_))
    }

    pub fn is_parsed(&self) -> bool {
        matches!(self, Record::Parsed(_))
    }

    /// Raw bytes, if available without serialization.
    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            Record::Raw(bytes) => Some(bytes),
            Record::Parsed(_) => None,
        }
    }

    /// Parsed value, if available without decoding.
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Record::Raw(_) => None,
            Record::Parsed(value) => Some(value),
        }
    }

    /// Convert to a value, decoding raw bytes with `serializer`.
    pub fn into_value(self, serializer: &dyn Serializer) -> Result<Value> {
        match self {
            Record::Raw(bytes) => serializer.deserialize(&bytes),
            Record::Parsed(value) => Ok(value),
        }
    }

    /// Convert to bytes.
    ///
    /// Raw records pass through untouched. Parsed records need a serializer;
    /// without one this fails with a serialization error.
    pub fn into_bytes(self, serializer: Option<&dyn Serializer>) -> Result<Bytes> {
        match (self, serializer) {
            (Record::Raw(bytes), _) => Ok(bytes),
            (Record::Parsed(value), Some(serializer)) => serializer.serialize(&value),
            (Record::Parsed(value), None) => Err(Error::serialization(
                "raw",
                format!(
                    "cannot write a parsed {} without a serializer",
                    value.type_name()
                ),
            )),
        }
    }
}

impl From<Value> for Record {
    fn from(value: Value) -> Self {
        Record::Parsed(value)
    }
}

impl From<Bytes> for Record {
    fn from(bytes: Bytes) -> Self {
        Record::Raw(bytes)
    }
}

impl From<Vec<u8>> for Record {
    fn from(bytes: Vec<u8>) -> Self {
        Record::Raw(Bytes::from(bytes))
    }
}
