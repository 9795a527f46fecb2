use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};

use fsstore_core::{Error, Result, Serializer};

use crate::directory::{Directory, ListOrder};
use crate::file::File;

/// OS metadata files that do not keep a directory alive during cleanup.
pub const IGNORED_ENTRIES: &[&str] = &[".", "..", ".DS_Store", ".Trashes", "Thumbs.db", "desktop.ini"];

fn is_ignored(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| IGNORED_ENTRIES.contains(&name))
}

/// A tree of files rooted at one directory.
///
/// The root is created when the storage is constructed. Every [`File`] handed
/// out lives below the root.
#[derive(Clone, Debug)]
pub struct BlobStorage {
    directory: Directory,
}

impl BlobStorage {
    /// Opens the storage, creating `path` if it does not exist.
    ///
    /// Fails if the root cannot be created or is occupied by a file.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let directory = Directory::new(path);
        directory.create()?;

        Ok(Self { directory })
    }

    pub fn path(&self) -> &Path {
        self.directory.path()
    }

    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    /// Resolves `name` below the root. Root and prefix components in `name`
    /// are dropped; `..` components are rejected.
    fn resolve(&self, name: &Path) -> Result<PathBuf> {
        let mut path = self.path().to_path_buf();
        let mut named = false;
        for component in name.components() {
            match component {
                Component::Normal(part) => {
                    path.push(part);
                    named = true;
                }
                Component::ParentDir => {
                    return Err(Error::precondition(format!(
                        "name '{}' climbs out of storage '{}'",
                        name.display(),
                        self.path().display()
                    )));
                }
                Component::RootDir | Component::Prefix(_) | Component::CurDir => {}
            }
        }

        if !named {
            return Err(Error::precondition(format!(
                "name '{}' does not name a file",
                name.display()
            )));
        }

        Ok(path)
    }

    /// A handle on `name` below the root, bound to `serializer`.
    ///
    /// Does not touch the filesystem. Fails with `PreconditionFailed` if
    /// `name` contains `..` or names no file at all.
    pub fn file(&self, name: impl AsRef<Path>, serializer: Arc<dyn Serializer>) -> Result<File> {
        Ok(File::new(self.resolve(name.as_ref())?, Some(serializer)))
    }

    /// A handle on `name` below the root, read and written as raw bytes.
    pub fn raw_file(&self, name: impl AsRef<Path>) -> Result<File> {
        Ok(File::raw(self.resolve(name.as_ref())?))
    }

    /// Every file below the root, relative to it.
    pub fn list(&self) -> Result<Vec<PathBuf>> {
        self.directory.list()
    }

    pub fn list_filtered<F>(&self, filter: F) -> Result<Vec<PathBuf>>
    where
        F: FnMut(&Path) -> bool,
    {
        self.directory.list_filtered(filter)
    }

    pub fn list_sorted<F>(&self, filter: F, order: ListOrder) -> Result<Vec<PathBuf>>
    where
        F: FnMut(&Path) -> bool,
    {
        self.directory.list_sorted(filter, order)
    }

    /// Deletes the root and everything below it.
    ///
    /// The storage stays usable; the root is recreated by the next write.
    pub fn purge(&self) -> Result<()> {
        info!(path = %self.path().display(), "purging storage");
        self.directory.delete()
    }

    /// Removes the directories left empty by deleting `file`.
    ///
    /// Walks from the file's parent up towards the root, deleting each
    /// directory whose only remaining files are [`IGNORED_ENTRIES`]. The root
    /// itself is never removed. Returns `true` when the whole chain below the
    /// root was removed, `false` as soon as a directory is still in use or
    /// already gone.
    ///
    /// Fails with `PreconditionFailed` if `file` still exists or does not
    /// live below the root.
    ///
    /// Cleanup is best effort: a file created in the chain between listing
    /// and deletion is a tolerated race.
    pub fn clear_parents(&self, file: &File) -> Result<bool> {
        if file.exists()? {
            return Err(Error::precondition(format!(
                "file '{}' still exists",
                file.path().display()
            )));
        }

        let parent = file.path().parent().unwrap_or_else(|| Path::new(""));
        let outside = || {
            Error::precondition(format!(
                "path '{}' is not in storage '{}'",
                parent.display(),
                self.path().display()
            ))
        };
        let relative = parent.strip_prefix(self.path()).map_err(|_| outside())?;
        if !relative
            .components()
            .all(|component| matches!(component, Component::Normal(_)))
        {
            return Err(outside());
        }

        let mut current = parent.to_path_buf();
        for _ in relative.components() {
            let directory = Directory::new(&current);

            if !directory.exists()? {
                debug!(path = %current.display(), "directory does not exist");
                return Ok(false);
            }

            let remaining = directory.list_filtered(|path| !is_ignored(path))?;
            if !remaining.is_empty() {
                warn!(
                    path = %current.display(),
                    files = remaining.len(),
                    "directory is not empty"
                );
                return Ok(false);
            }

            debug!(path = %current.display(), "deleting empty directory");
            directory.delete()?;
            current.pop();
        }

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use fsstore_core::ErrorKind;
    use fsstore_serde::JsonSerializer;

    fn json() -> Arc<dyn Serializer> {
        Arc::new(JsonSerializer::new())
    }

    fn storage(dir: &tempfile::TempDir) -> BlobStorage {
        BlobStorage::new(dir.path().join("path/to/storage")).unwrap()
    }

    #[test]
    fn new_creates_root() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(&dir);
        assert!(storage.path().is_dir());
        assert_eq!(storage.path(), dir.path().join("path/to/storage"));
    }

    #[test]
    fn new_fails_when_root_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("occupied");
        fs::write(&path, b"").unwrap();

        let err = BlobStorage::new(&path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    }

    #[test]
    fn new_fails_when_root_cannot_be_created() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, b"").unwrap();

        let err = BlobStorage::new(blocker.join("root")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn file_is_rooted_and_lazy() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(&dir);
        let serializer = json();

        let file = storage.file("test.txt", Arc::clone(&serializer)).unwrap();
        assert_eq!(file.path(), storage.path().join("test.txt"));
        assert!(Arc::ptr_eq(file.serializer().unwrap(), &serializer));
        assert!(!file.path().exists());

        let absolute = storage.raw_file("/etc/passwd").unwrap();
        assert_eq!(absolute.path(), storage.path().join("etc/passwd"));
    }

    #[test]
    fn names_cannot_leave_the_root() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(&dir);

        for name in ["../outside.txt", "a/../../outside.txt", "a/.."] {
            let err = storage.raw_file(name).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::PreconditionFailed, "{name}");
        }
        for name in ["", "/", "."] {
            let err = storage.file(name, json()).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::PreconditionFailed, "{name:?}");
        }
        assert!(!storage.path().parent().unwrap().join("outside.txt").exists());
    }

    #[test]
    fn list_and_delete_files() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(&dir);

        for name in ["file1.txt", "file2.txt", "file3.txt"] {
            storage.file(name, json()).unwrap().create().unwrap();
        }
        assert_eq!(
            storage.list().unwrap(),
            vec![
                PathBuf::from("file1.txt"),
                PathBuf::from("file2.txt"),
                PathBuf::from("file3.txt"),
            ]
        );

        for name in ["file1.txt", "file2.txt", "file3.txt"] {
            storage.file(name, json()).unwrap().delete().unwrap();
        }
        assert!(storage.list().unwrap().is_empty());
    }

    #[test]
    fn purge_removes_root() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(&dir);
        storage.raw_file("a/b.txt").unwrap().write_bytes(b"x").unwrap();

        storage.purge().unwrap();
        assert!(!storage.path().exists());
        assert!(storage.list().unwrap().is_empty());

        // Still usable afterwards.
        storage.raw_file("a/b.txt").unwrap().write_bytes(b"y").unwrap();
        assert_eq!(storage.list().unwrap(), vec![PathBuf::from("a/b.txt")]);
    }

    #[test]
    fn clear_parents_removes_empty_chain() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(&dir);
        let file = storage.file("some/path/to/the/file.txt", json()).unwrap();
        file.create().unwrap().delete().unwrap();

        assert!(storage.clear_parents(&file).unwrap());
        assert!(!storage.path().join("some").exists());
        assert!(storage.path().is_dir());
    }

    #[test]
    fn clear_parents_ignores_os_noise() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(&dir);
        let file = storage.raw_file("a/b/file.txt").unwrap();
        file.create().unwrap().delete().unwrap();
        fs::write(storage.path().join("a/b/.DS_Store"), b"").unwrap();
        fs::write(storage.path().join("a/Thumbs.db"), b"").unwrap();

        assert!(storage.clear_parents(&file).unwrap());
        assert!(!storage.path().join("a").exists());
    }

    #[test]
    fn clear_parents_stops_at_sibling() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(&dir);
        let file = storage.file("a/b/c/file.json", json()).unwrap();
        file.create().unwrap();
        storage.raw_file("a/sibling.json").unwrap().create().unwrap();
        file.delete().unwrap();

        assert!(!storage.clear_parents(&file).unwrap());
        assert!(!storage.path().join("a/b").exists());
        assert!(storage.path().join("a/sibling.json").is_file());
    }

    #[test]
    fn clear_parents_preconditions() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(&dir);
        let file = storage.file("foo/bar/baz/hello/world.txt", json()).unwrap();
        file.create().unwrap();

        let err = storage.clear_parents(&file).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PreconditionFailed);
        assert!(err.to_string().contains("still exists"));

        let stray = File::new("random.txt", Some(json()));
        let err = storage.clear_parents(&stray).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PreconditionFailed);
        assert!(err.to_string().contains("is not in storage"));

        let escaping = File::raw(storage.path().join("../outside.txt"));
        let err = storage.clear_parents(&escaping).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PreconditionFailed);
    }

    #[test]
    fn clear_parents_reports_missing_chain() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(&dir);
        let file = storage.raw_file("never/created/file.txt").unwrap();

        assert!(!storage.clear_parents(&file).unwrap());
    }

    #[test]
    fn clear_parents_at_root_level_keeps_root() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(&dir);
        let file = storage.raw_file("top.txt").unwrap();
        file.create().unwrap().delete().unwrap();

        assert!(storage.clear_parents(&file).unwrap());
        assert!(storage.path().is_dir());
    }
}
