//! The serializer capability.

use std::fmt::Debug;
use std::sync::Arc;

use bytes::Bytes;

use crate::{Result, Value};

/// Converts between [`Value`] and bytes, and names the file extension used
/// for the bytes it produces.
///
/// The extension is the only type discriminator a key-value namespace has:
/// its key listing shows exactly the files ending in `.{extension}`.
///
/// # Implementing Custom Serializers
///
/// ```rust
/// use bytes::Bytes;
/// use fsstore_core::{Error, Result, Serializer, Value};
///
/// #[derive(Debug)]
/// struct PlainText;
///
/// impl Serializer for PlainText {
///     fn serialize(&self, value: &Value) -> Result<Bytes> {
///         value
///             .as_str()
///             .map(|s| Bytes::from(s.to_string()))
///             .ok_or_else(|| Error::serialization("txt", "only strings are supported"))
///     }
///
///     fn deserialize(&self, bytes: &[u8]) -> Result<Value> {
///         String::from_utf8(bytes.to_vec())
///             .map(Value::String)
///             .map_err(|e| Error::serialization("txt", e.to_string()))
///     }
///
///     fn extension(&self) -> &str {
///         "txt"
///     }
/// }
/// ```
pub trait Serializer: Debug + Send + Sync {
    /// Encode a value. Fails with `Error::Serialization`.
    fn serialize(&self, value: &Value) -> Result<Bytes>;

    /// Decode bytes produced by `serialize`. Fails with `Error::Serialization`.
    fn deserialize(&self, bytes: &[u8]) -> Result<Value>;

    /// File extension without the leading dot, e.g. `json`.
    fn extension(&self) -> &str;
}

impl<T: Serializer + ?Sized> Serializer for Arc<T> {
    fn serialize(&self, value: &Value) -> Result<Bytes> {
        self.as_ref().serialize(value)
    }

    fn deserialize(&self, bytes: &[u8]) -> Result<Value> {
        self.as_ref().deserialize(bytes)
    }

    fn extension(&self) -> &str {
        self.as_ref().extension()
    }
}

impl<T: Serializer + ?Sized> Serializer for Box<T> {
    fn serialize(&self, value: &Value) -> Result<Bytes> {
        self.as_ref().serialize(value)
    }

    fn deserialize(&self, bytes: &[u8]) -> Result<Value> {
        self.as_ref().deserialize(bytes)
    }

    fn extension(&self) -> &str {
        self.as_ref().extension()
    }
}
