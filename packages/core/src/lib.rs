//! Core fsstore: the types every storage layer shares.
//!
//! - `Error`: one taxonomy for the whole stack, with an `ErrorKind` to branch on
//! - `Value`: the closed tree structure serializers encode
//! - `Record`: file content as raw bytes or as a parsed `Value`
//! - `Serializer`: the pluggable value <-> bytes capability
//!
//! The layers above build on these:
//!
//! ```text
//! fsstore-collection   Identifier + CollectionStorage
//!        |
//! fsstore-kv           KeyValueStorage
//!        |
//! fsstore-blob         BlobStorage, File, Directory
//!        |
//! fsstore-core         Error, Value, Record, Serializer
//! ```

pub use bytes::Bytes;

mod error;
mod record;
mod serializer;
mod value;

pub use error::{EntryType, Error, ErrorKind, IoOperation, Result};
pub use record::Record;
pub use serializer::Serializer;
pub use value::{Fields, Value};
