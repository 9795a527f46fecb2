//! Typed get/set on top of [`KeyValueStorage`].

use serde::de::DeserializeOwned;
use serde::Serialize;

use fsstore_core::Result;
use fsstore_serde::{from_value, to_value};

use crate::storage::KeyValueStorage;

/// Extension trait reading and writing Rust types through serde.
///
/// Values pass through [`Value`](fsstore_core::Value) first, so whatever a
/// type serializes to must be representable there.
///
/// # Example
///
/// ```rust,ignore
/// use fsstore_kv::TypedKeyValue;
///
/// #[derive(Serialize, Deserialize)]
/// struct Settings {
///     theme: String,
/// }
///
/// storage.set_as("settings", &Settings { theme: "dark".into() })?;
/// let settings: Settings = storage.get_as("settings")?;
/// ```
pub trait TypedKeyValue {
    /// Reads `key` and deserializes it into `T`.
    fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<T>;

    /// Serializes `value` and stores it under `key`.
    fn set_as<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()>;
}

impl TypedKeyValue for KeyValueStorage {
    fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        from_value(self.get(key)?)
    }

    fn set_as<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        self.set(key, to_value(value)?)
    }
}
