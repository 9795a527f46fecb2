use std::sync::Arc;

use tracing::debug;

use fsstore_core::{Fields, Result, Value};
use fsstore_kv::KeyValueStorage;

use crate::identifier::{Identifier, Parser};

/// How a caller addresses a stored record: by its key, or by a record the
/// key is derived from.
#[derive(Clone, Debug, PartialEq)]
pub enum Lookup {
    Key(String),
    Record(Fields),
}

impl From<&str> for Lookup {
    fn from(key: &str) -> Self {
        Lookup::Key(key.to_string())
    }
}

impl From<String> for Lookup {
    fn from(key: String) -> Self {
        Lookup::Key(key)
    }
}

impl From<&String> for Lookup {
    fn from(key: &String) -> Self {
        Lookup::Key(key.clone())
    }
}

impl From<Fields> for Lookup {
    fn from(record: Fields) -> Self {
        Lookup::Record(record)
    }
}

/// Records stored under keys derived from their own fields.
///
/// The underlying [`KeyValueStorage`] is shared, so several collections
/// (and direct key-value access) can work on the same namespace.
#[derive(Clone, Debug)]
pub struct CollectionStorage {
    identifier: Identifier,
    storage: Arc<KeyValueStorage>,
}

impl CollectionStorage {
    /// Fails with `InvalidPattern` if `pattern` has no placeholder.
    pub fn new<F>(pattern: &str, parser: F, storage: Arc<KeyValueStorage>) -> Result<Self>
    where
        F: Fn(Fields) -> Result<Fields> + Send + Sync + 'static,
    {
        Ok(Self::with_identifier(Identifier::new(pattern, parser)?, storage))
    }

    pub fn with_parser(pattern: &str, parser: Parser, storage: Arc<KeyValueStorage>) -> Result<Self> {
        Ok(Self::with_identifier(Identifier::with_parser(pattern, parser)?, storage))
    }

    pub fn with_identifier(identifier: Identifier, storage: Arc<KeyValueStorage>) -> Self {
        Self {
            identifier,
            storage,
        }
    }

    pub fn identifier(&self) -> &Identifier {
        &self.identifier
    }

    pub fn storage(&self) -> &Arc<KeyValueStorage> {
        &self.storage
    }

    fn resolve(&self, lookup: Lookup) -> Result<String> {
        match lookup {
            Lookup::Key(key) => Ok(key),
            Lookup::Record(record) => Ok(self.identifier.parse(record)?.into_parts().0),
        }
    }

    /// Stores the parsed fields of `record` and returns the derived key.
    pub fn store(&self, record: Fields) -> Result<String> {
        let (key, fields) = self.identifier.parse(record)?.into_parts();
        self.storage.set(&key, fields)?;
        debug!(key = %key, pattern = self.identifier.pattern(), "stored record");

        Ok(key)
    }

    pub fn get(&self, lookup: impl Into<Lookup>) -> Result<Value> {
        let key = self.resolve(lookup.into())?;
        self.storage.get(&key)
    }

    pub fn has(&self, lookup: impl Into<Lookup>) -> Result<bool> {
        let key = self.resolve(lookup.into())?;
        self.storage.has(&key)
    }

    pub fn delete(&self, lookup: impl Into<Lookup>) -> Result<()> {
        let key = self.resolve(lookup.into())?;
        self.storage.delete(&key)
    }

    /// Every key in the underlying namespace.
    pub fn all(&self) -> Result<Vec<String>> {
        self.storage.keys()
    }

    pub fn purge(&self) -> Result<()> {
        self.storage.purge()
    }
}
