use std::path::{self, Component, Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use fsstore_blob::{BlobStorage, File};
use fsstore_core::{Error, Result, Serializer, Value};

const SEPARATORS: &[char] = &['/', '\\'];

/// Maps string keys to values stored as `{key}.{extension}` files.
///
/// Keys may contain `/`, which nests them in subdirectories of the
/// namespace. Every segment between separators must be non-empty and
/// neither `.` nor `..`. Only files carrying the bound serializer's
/// extension are visible as keys.
#[derive(Clone, Debug)]
pub struct KeyValueStorage {
    dir: PathBuf,
    namespace: String,
    serializer: Arc<dyn Serializer>,
    storage: BlobStorage,
}

impl KeyValueStorage {
    /// Opens the namespace `namespace` below `dir`, creating it if needed.
    ///
    /// A namespace of `"."` (or one that is empty once separators are
    /// trimmed) stores keys in `dir` itself.
    pub fn new(
        dir: impl AsRef<Path>,
        namespace: &str,
        serializer: Arc<dyn Serializer>,
    ) -> Result<Self> {
        let dir: PathBuf = dir.as_ref().components().collect();
        let namespace = namespace.trim_matches(SEPARATORS).to_string();

        let root = if namespace.is_empty() || namespace == "." {
            dir.clone()
        } else {
            dir.join(&namespace)
        };
        let storage = BlobStorage::new(root)?;
        debug!(
            path = %storage.path().display(),
            extension = serializer.extension(),
            "opened key-value storage"
        );

        Ok(Self {
            dir,
            namespace,
            serializer,
            storage,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn serializer(&self) -> &Arc<dyn Serializer> {
        &self.serializer
    }

    pub fn storage(&self) -> &BlobStorage {
        &self.storage
    }

    /// Fails with `PreconditionFailed` before touching the filesystem when
    /// `key` could not be recovered from its file path by [`keys`](Self::keys).
    fn file_for_key(&self, key: &str) -> Result<File> {
        if key
            .split(path::is_separator)
            .any(|segment| segment.is_empty() || segment == "." || segment == "..")
        {
            return Err(Error::precondition(format!(
                "key '{key}' has an empty, '.' or '..' segment"
            )));
        }

        let name = format!("{key}.{}", self.serializer.extension());
        self.storage.file(name, Arc::clone(&self.serializer))
    }

    /// Fails with `NotFound`, naming the backing file, if `key` was never set.
    pub fn get(&self, key: &str) -> Result<Value> {
        self.file_for_key(key)?
            .read()?
            .into_value(self.serializer.as_ref())
    }

    pub fn set(&self, key: &str, value: impl Into<Value>) -> Result<()> {
        self.file_for_key(key)?.write(value.into())?;
        Ok(())
    }

    /// Removes `key` and prunes the directories it leaves empty. Deleting a
    /// missing key is a no-op.
    pub fn delete(&self, key: &str) -> Result<()> {
        let file = self.file_for_key(key)?;
        file.delete()?;

        let cleared = self.storage.clear_parents(&file)?;
        debug!(key, cleared, "deleted key");

        Ok(())
    }

    pub fn has(&self, key: &str) -> Result<bool> {
        self.file_for_key(key)?.exists()
    }

    /// Every stored key, in ascending path order.
    pub fn keys(&self) -> Result<Vec<String>> {
        let suffix = format!(".{}", self.serializer.extension());
        let files = self
            .storage
            .list_filtered(|path| path.to_str().is_some_and(|p| p.ends_with(&suffix)))?;

        Ok(files
            .iter()
            .filter_map(|path| key_from_path(path, &suffix))
            .collect())
    }

    /// Deletes every key in the namespace.
    pub fn purge(&self) -> Result<()> {
        self.storage.purge()
    }
}

/// Inverse of `file_for_key`: joins the components with `/` on every
/// platform and drops `suffix`. Files no key maps to are skipped.
fn key_from_path(path: &Path, suffix: &str) -> Option<String> {
    let mut parts = Vec::new();
    for component in path.components() {
        let Component::Normal(part) = component else {
            continue;
        };
        match part.to_str() {
            Some(part) => parts.push(part),
            None => {
                debug!(path = %path.display(), "skipping non UTF-8 key");
                return None;
            }
        }
    }

    let joined = parts.join("/");
    let key = joined.strip_suffix(suffix)?;
    if key.is_empty() || key.ends_with('/') {
        debug!(path = %path.display(), "skipping file with an empty key");
        return None;
    }

    Some(key.to_string())
}
