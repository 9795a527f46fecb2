//! Store configuration.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use fsstore_core::{Error, IoOperation, Result, Serializer};
use fsstore_kv::KeyValueStorage;
use fsstore_serde::{JsonSerializer, NativeSerializer};

/// Which serializer a store uses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SerializerKind {
    #[default]
    Json,
    Native,
}

impl SerializerKind {
    /// `pretty` only affects JSON.
    pub fn build(self, pretty: bool) -> Arc<dyn Serializer> {
        match self {
            SerializerKind::Json if pretty => Arc::new(JsonSerializer::pretty()),
            SerializerKind::Json => Arc::new(JsonSerializer::new()),
            SerializerKind::Native => Arc::new(NativeSerializer),
        }
    }
}

impl fmt::Display for SerializerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SerializerKind::Json => write!(f, "json"),
            SerializerKind::Native => write!(f, "native"),
        }
    }
}

impl FromStr for SerializerKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "json" => Ok(SerializerKind::Json),
            "native" => Ok(SerializerKind::Native),
            other => Err(Error::Config {
                message: format!("unknown format '{other}', expected 'json' or 'native'"),
            }),
        }
    }
}

/// Where a key-value store lives and how it encodes values.
///
/// ```json
/// { "root": ".storage", "namespace": "kv", "format": "json", "pretty": true }
/// ```
///
/// Every field is optional.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    pub root: PathBuf,
    pub namespace: String,
    pub format: SerializerKind,
    pub pretty: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from(".storage"),
            namespace: ".".to_string(),
            format: SerializerKind::default(),
            pretty: false,
        }
    }
}

impl StoreConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Config {
            message: e.to_string(),
        })
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|error| Error::io(IoOperation::Read, path, error))?;
        debug!(path = %path.display(), "loaded store config");

        Self::from_json_str(&json)
    }

    pub fn serializer(&self) -> Arc<dyn Serializer> {
        self.format.build(self.pretty)
    }

    /// Opens the configured store, creating its directory if needed.
    pub fn open(&self) -> Result<KeyValueStorage> {
        if self.root.as_os_str().is_empty() {
            return Err(Error::Config {
                message: "root must not be empty".to_string(),
            });
        }

        KeyValueStorage::new(&self.root, &self.namespace, self.serializer())
    }
}
