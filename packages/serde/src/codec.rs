//! Serializer implementations.

use bincode::Options;
use bytes::Bytes;

use fsstore_core::{Error, Result, Serializer, Value};

use crate::convert::{json_to_value, try_value_to_json};

/// Upper bound on a single native payload; guards length prefixes in
/// corrupted files from triggering huge allocations.
const NATIVE_SIZE_LIMIT: u64 = 256 * 1024 * 1024;

/// Files that were created or touched but never written hold no bytes.
/// Both serializers read them back as `Value::Null`.
fn is_blank(bytes: &[u8]) -> bool {
    bytes.iter().all(u8::is_ascii_whitespace)
}

/// A serializer that stores values as JSON text.
///
/// Compact output by default; [`JsonSerializer::pretty`] indents it.
///
/// # Example
///
/// ```rust
/// use fsstore_core::{Serializer, Value};
/// use fsstore_serde::JsonSerializer;
///
/// let serializer = JsonSerializer::new();
/// let bytes = serializer.serialize(&Value::from("hello")).unwrap();
/// assert_eq!(&bytes[..], b"\"hello\"");
/// assert_eq!(serializer.deserialize(&bytes).unwrap(), Value::from("hello"));
/// assert_eq!(serializer.extension(), "json");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSerializer {
    pretty: bool,
}

impl JsonSerializer {
    pub const EXTENSION: &'static str = "json";

    pub fn new() -> Self {
        Self { pretty: false }
    }

    pub fn pretty() -> Self {
        Self { pretty: true }
    }

    pub fn is_pretty(&self) -> bool {
        self.pretty
    }
}

impl Serializer for JsonSerializer {
    fn serialize(&self, value: &Value) -> Result<Bytes> {
        let json = try_value_to_json(value)?;
        let encoded = if self.pretty {
            serde_json::to_vec_pretty(&json)
        } else {
            serde_json::to_vec(&json)
        };

        encoded
            .map(Bytes::from)
            .map_err(|e| Error::serialization(Self::EXTENSION, e.to_string()))
    }

    fn deserialize(&self, bytes: &[u8]) -> Result<Value> {
        if is_blank(bytes) {
            return Ok(Value::Null);
        }

        serde_json::from_slice(bytes)
            .map(json_to_value)
            .map_err(|e| Error::serialization(Self::EXTENSION, e.to_string()))
    }

    fn extension(&self) -> &str {
        Self::EXTENSION
    }
}

/// A compact binary serializer for trusted in-process round-tripping.
///
/// Encodes the `Value` tree itself, so it preserves what JSON cannot
/// (byte strings, non-finite floats). Decoding can only ever produce a
/// `Value`: primitives and collections, never an arbitrary host type.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeSerializer;

impl NativeSerializer {
    pub const EXTENSION: &'static str = "bin";

    fn options() -> impl Options {
        bincode::DefaultOptions::new()
            .with_limit(NATIVE_SIZE_LIMIT)
            .reject_trailing_bytes()
    }
}

impl Serializer for NativeSerializer {
    fn serialize(&self, value: &Value) -> Result<Bytes> {
        Self::options()
            .serialize(value)
            .map(Bytes::from)
            .map_err(|e| Error::serialization(Self::EXTENSION, e.to_string()))
    }

    fn deserialize(&self, bytes: &[u8]) -> Result<Value> {
        if bytes.is_empty() {
            return Ok(Value::Null);
        }

        Self::options()
            .deserialize(bytes)
            .map_err(|e| Error::serialization(Self::EXTENSION, e.to_string()))
    }

    fn extension(&self) -> &str {
        Self::EXTENSION
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use collection_literals::btree;
    use fsstore_core::ErrorKind;

    fn person() -> Value {
        Value::Map(btree! {
            "name".to_string() => Value::from("John"),
            "age".to_string() => Value::from(30i64),
        })
    }

    #[test]
    fn json_compact_output() {
        let bytes = JsonSerializer::new().serialize(&person()).unwrap();
        assert_eq!(&bytes[..], br#"{"age":30,"name":"John"}"#);
    }

    #[test]
    fn json_pretty_output() {
        let bytes = JsonSerializer::pretty().serialize(&person()).unwrap();
        let text = std::str::from_utf8(&bytes).unwrap();
        assert!(text.contains('\n'));
        assert!(text.contains("  \"age\": 30"));
    }

    #[test]
    fn json_refuses_non_finite_floats() {
        for f in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = JsonSerializer::new().serialize(&Value::Float(f)).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Serialization);
        }
    }

    #[test]
    fn json_decodes_objects() {
        let value = JsonSerializer::new()
            .deserialize(br#"{"name":"John","age":30}"#)
            .unwrap();
        assert_eq!(value, person());
    }

    #[test]
    fn json_rejects_garbage() {
        let err = JsonSerializer::new().deserialize(b"{not json").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Serialization);
        assert!(err.to_string().contains("json"));
    }

    #[test]
    fn json_blank_file_reads_as_null() {
        assert_eq!(JsonSerializer::new().deserialize(b"").unwrap(), Value::Null);
        assert_eq!(JsonSerializer::new().deserialize(b" \n").unwrap(), Value::Null);
    }

    #[test]
    fn native_keeps_bytes_and_floats() {
        let value = Value::Array(vec![
            Value::Bytes(vec![0, 159, 146, 150]),
            Value::Float(f64::INFINITY),
            person(),
        ]);
        let serializer = NativeSerializer;
        let bytes = serializer.serialize(&value).unwrap();
        assert_eq!(serializer.deserialize(&bytes).unwrap(), value);
    }

    #[test]
    fn native_rejects_trailing_bytes() {
        let serializer = NativeSerializer;
        let mut bytes = serializer.serialize(&Value::from(7i64)).unwrap().to_vec();
        bytes.extend_from_slice(b"junk");
        let err = serializer.deserialize(&bytes).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Serialization);
    }

    #[test]
    fn native_rejects_unknown_variants() {
        // Variant index 200 does not exist on Value.
        let err = NativeSerializer.deserialize(&[200]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Serialization);
    }

    #[test]
    fn extensions() {
        assert_eq!(JsonSerializer::new().extension(), "json");
        assert_eq!(NativeSerializer.extension(), "bin");
    }
}
