//! Filesystem-backed persistence in three layers.
//!
//! ```text
//! ┌────────────────────────────────────────┐
//! │ CollectionStorage  (fsstore-collection) │  keys derived from records
//! ├────────────────────────────────────────┤
//! │ KeyValueStorage    (fsstore-kv)         │  {namespace}/{key}.{ext}
//! ├────────────────────────────────────────┤
//! │ BlobStorage / File (fsstore-blob)       │  locked reads and writes
//! └────────────────────────────────────────┘
//! ```
//!
//! This crate re-exports the layers and adds [`StoreConfig`] for opening a
//! store from a JSON file.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use fsstore::{JsonSerializer, KeyValueStorage, Value};
//!
//! let storage = KeyValueStorage::new(".storage", "kv", Arc::new(JsonSerializer::new()))?;
//! storage.set("greeting", "hello")?;
//! assert_eq!(storage.get("greeting")?, Value::from("hello"));
//! # Ok::<(), fsstore::Error>(())
//! ```

mod config;

pub use config::{SerializerKind, StoreConfig};

pub use fsstore_blob::{BlobStorage, Directory, File, ListOrder, IGNORED_ENTRIES};
pub use fsstore_collection::{
    date_defaults, Clock, CollectionStorage, Entry, FixedClock, Identifier, Lookup, Parser,
    SystemClock,
};
pub use fsstore_core::{
    Bytes, EntryType, Error, ErrorKind, Fields, IoOperation, Record, Result, Serializer, Value,
};
pub use fsstore_kv::{KeyValueStorage, TypedKeyValue};
pub use fsstore_serde::{
    from_value, json_to_value, to_value, try_value_to_json, value_to_json, JsonSerializer,
    NativeSerializer,
};
