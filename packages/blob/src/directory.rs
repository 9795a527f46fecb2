use std::cmp::Ordering;
use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use walkdir::WalkDir;

use fsstore_core::{EntryType, Error, IoOperation, Result};

/// Order in which sibling entries are visited while listing.
///
/// Sorting applies per directory level; a subdirectory's files appear where
/// the subdirectory itself sorts among its siblings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ListOrder {
    #[default]
    Ascending,
    Descending,
}

impl ListOrder {
    fn compare(self, a: &OsStr, b: &OsStr) -> Ordering {
        match self {
            ListOrder::Ascending => a.cmp(b),
            ListOrder::Descending => b.cmp(a),
        }
    }
}

/// Absent entries and paths running through a regular file both mean
/// "nothing here".
pub(crate) fn is_absent(error: &io::Error) -> bool {
    matches!(
        error.kind(),
        io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
    )
}

/// A directory on disk, addressed by path.
///
/// A handle only: nothing is cached, every call goes back to the filesystem.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Directory {
    path: PathBuf,
}

impl Directory {
    /// Trailing separators are dropped from `path`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().components().collect(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `true` if the directory exists.
    ///
    /// Fails with `TypeMismatch` when the path holds something other than a
    /// directory.
    pub fn exists(&self) -> Result<bool> {
        match fs::metadata(&self.path) {
            Ok(metadata) if metadata.is_dir() => {
                debug!(path = %self.path.display(), "directory exists");
                Ok(true)
            }
            Ok(_) => Err(Error::type_mismatch(&self.path, EntryType::Directory)),
            Err(error) if is_absent(&error) => Ok(false),
            Err(error) => Err(Error::io(IoOperation::Stat, &self.path, error)),
        }
    }

    /// Creates the directory and any missing parents. Idempotent.
    pub fn create(&self) -> Result<&Self> {
        if self.exists()? {
            debug!(path = %self.path.display(), "directory already exists");
            return Ok(self);
        }

        fs::create_dir_all(&self.path)
            .map_err(|error| Error::io(IoOperation::Create, &self.path, error))?;
        info!(path = %self.path.display(), "created directory");

        Ok(self)
    }

    /// Lists every file below this directory, ascending.
    ///
    /// Paths are relative to this directory. A missing directory lists as
    /// empty.
    pub fn list(&self) -> Result<Vec<PathBuf>> {
        self.list_sorted(|_| true, ListOrder::Ascending)
    }

    /// Lists the files below this directory for which `filter` returns
    /// `true`. The filter sees each file's path relative to this directory.
    pub fn list_filtered<F>(&self, filter: F) -> Result<Vec<PathBuf>>
    where
        F: FnMut(&Path) -> bool,
    {
        self.list_sorted(filter, ListOrder::Ascending)
    }

    /// Recursive listing with an explicit sibling order.
    ///
    /// Directories are descended into but never returned. Entries that vanish
    /// while the walk is in progress are skipped.
    pub fn list_sorted<F>(&self, mut filter: F, order: ListOrder) -> Result<Vec<PathBuf>>
    where
        F: FnMut(&Path) -> bool,
    {
        if !self.exists()? {
            return Ok(Vec::new());
        }

        let walker = WalkDir::new(&self.path)
            .min_depth(1)
            .sort_by(move |a, b| order.compare(a.file_name(), b.file_name()));

        let mut files = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(error) => {
                    let path = error
                        .path()
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|| self.path.clone());
                    let source = error
                        .into_io_error()
                        .unwrap_or_else(|| io::Error::other("filesystem loop detected"));
                    if is_absent(&source) {
                        debug!(path = %path.display(), "entry vanished during listing");
                        continue;
                    }
                    return Err(Error::io(IoOperation::List, path, source));
                }
            };

            if entry.file_type().is_dir() {
                debug!(path = %entry.path().display(), "descending into directory");
                continue;
            }

            let Ok(relative) = entry.path().strip_prefix(&self.path) else {
                continue;
            };
            if filter(relative) {
                files.push(relative.to_path_buf());
            }
        }

        Ok(files)
    }

    /// Deletes the directory with everything inside it.
    ///
    /// Files are unlinked and subdirectories deleted depth-first before the
    /// directory itself is removed. A missing directory is not an error.
    pub fn delete(&self) -> Result<()> {
        if !self.exists()? {
            debug!(path = %self.path.display(), "directory does not exist");
            return Ok(());
        }

        let entries = fs::read_dir(&self.path)
            .map_err(|error| Error::io(IoOperation::List, &self.path, error))?;

        for entry in entries {
            let entry = entry.map_err(|error| Error::io(IoOperation::List, &self.path, error))?;
            let path = entry.path();
            let file_type = entry
                .file_type()
                .map_err(|error| Error::io(IoOperation::Stat, &path, error))?;

            if file_type.is_dir() {
                Directory::new(&path).delete()?;
            } else {
                fs::remove_file(&path)
                    .map_err(|error| Error::io(IoOperation::Delete, &path, error))?;
            }
        }

        fs::remove_dir(&self.path)
            .map_err(|error| Error::io(IoOperation::Delete, &self.path, error))?;
        info!(path = %self.path.display(), "deleted directory");

        Ok(())
    }
}
