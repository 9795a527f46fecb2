//! Pattern-keyed collections for fsstore.
//!
//! An [`Identifier`] compiles a key pattern such as
//! `posts/{year}/{month}/{slug}-{id}` together with a parser that fills in
//! the fields the pattern needs. A [`CollectionStorage`] uses it to store
//! records in a shared [`KeyValueStorage`](fsstore_kv::KeyValueStorage)
//! under keys derived from the records themselves:
//!
//! ```rust,ignore
//! let posts = CollectionStorage::new(
//!     "posts/{year}/{month}/{slug}",
//!     date_defaults(SystemClock, Ok),
//!     storage,
//! )?;
//! let key = posts.store(btree! { "slug".into() => Value::from("hello") })?;
//! ```

mod clock;
mod entry;
mod identifier;
mod storage;

pub use clock::{date_defaults, Clock, FixedClock, SystemClock};
pub use entry::Entry;
pub use identifier::{Identifier, Parser};
pub use storage::{CollectionStorage, Lookup};
