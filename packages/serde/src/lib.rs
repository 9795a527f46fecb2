//! Serializers for fsstore.
//!
//! - `JsonSerializer`: JSON text, compact or pretty, extension `json`
//! - `NativeSerializer`: binary `Value` encoding, extension `bin`
//! - `to_value` / `from_value`: move between `Value` and serde types
//!
//! Further serializers only need to implement [`Serializer`]; the storage
//! layers never look past that trait.

mod codec;
mod convert;

pub use codec::{JsonSerializer, NativeSerializer};
pub use convert::{from_value, json_to_value, to_value, try_value_to_json, value_to_json};

pub use fsstore_core::{Serializer, Value};
