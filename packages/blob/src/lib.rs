//! Filesystem primitives for fsstore.
//!
//! The bottom layer of the stack. It knows about paths and bytes only; the
//! optional [`Serializer`](fsstore_core::Serializer) bound to a [`File`] is
//! applied on the way in and out but never interpreted here.
//!
//! - [`Directory`]: existence, idempotent creation, recursive listing and deletion
//! - [`File`]: idempotent creation, touch, advisory-locked read/write, deletion
//! - [`BlobStorage`]: a rooted tree of files with empty-ancestor cleanup
//!
//! # Locking
//!
//! Reads hold a shared and writes an exclusive OS advisory lock for the
//! duration of that one call. There is no cross-file or cross-call locking;
//! directory operations are unlocked and tolerate concurrent changes.

mod directory;
mod file;
mod storage;

pub use directory::{Directory, ListOrder};
pub use file::File;
pub use storage::{BlobStorage, IGNORED_ENTRIES};
