//! Namespaced key-value storage for fsstore.
//!
//! A [`KeyValueStorage`] owns one [`BlobStorage`](fsstore_blob::BlobStorage)
//! rooted at `{dir}/{namespace}` and one serializer. Each key is stored as
//! `{key}.{extension}`:
//!
//! ```text
//! .storage/kv/key1.json
//! .storage/kv/sub/key2.json      <- key "sub/key2"
//! ```
//!
//! Deleting a key removes the directories it leaves empty, up to but never
//! including the namespace root.

mod storage;
mod typed;

pub use storage::KeyValueStorage;
pub use typed::TypedKeyValue;
