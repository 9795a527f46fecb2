use std::fs::{self, FileTimes, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use bytes::Bytes;
use tracing::{debug, info, warn};

use fsstore_core::{EntryType, Error, IoOperation, Record, Result, Serializer};

use crate::directory::{is_absent, Directory};

/// A regular file on disk, optionally bound to a serializer.
///
/// Like [`Directory`], a `File` is a stateless handle: it holds no open
/// descriptor and caches nothing. Reads take a shared advisory lock and writes
/// an exclusive one, each held for that single call only.
#[derive(Clone, Debug)]
pub struct File {
    path: PathBuf,
    serializer: Option<Arc<dyn Serializer>>,
}

impl File {
    pub fn new(path: impl Into<PathBuf>, serializer: Option<Arc<dyn Serializer>>) -> Self {
        Self {
            path: path.into(),
            serializer,
        }
    }

    /// A file whose content is read and written as raw bytes.
    pub fn raw(path: impl Into<PathBuf>) -> Self {
        Self::new(path, None)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn serializer(&self) -> Option<&Arc<dyn Serializer>> {
        self.serializer.as_ref()
    }

    /// Returns `true` if the path holds a regular file.
    ///
    /// Fails with `TypeMismatch` when it holds a directory (or anything else
    /// that is not a regular file).
    pub fn exists(&self) -> Result<bool> {
        match fs::metadata(&self.path) {
            Ok(metadata) if metadata.is_file() => Ok(true),
            Ok(_) => Err(Error::type_mismatch(&self.path, EntryType::File)),
            Err(error) if is_absent(&error) => Ok(false),
            Err(error) => Err(Error::io(IoOperation::Stat, &self.path, error)),
        }
    }

    /// Creates an empty file, and its parent directories, unless it already
    /// exists.
    pub fn create(&self) -> Result<&Self> {
        if self.exists()? {
            debug!(path = %self.path.display(), "file already exists");
            return Ok(self);
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Directory::new(parent).create()?;
        }

        // No truncation: a concurrent writer may have won the race.
        OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.path)
            .map_err(|error| Error::io(IoOperation::Create, &self.path, error))?;
        info!(path = %self.path.display(), "created file");

        Ok(self)
    }

    /// Sets the modification and access times, creating the file first if
    /// needed.
    ///
    /// `mtime` defaults to now; `atime` defaults to `mtime`.
    pub fn touch(&self, mtime: Option<SystemTime>, atime: Option<SystemTime>) -> Result<&Self> {
        self.create()?;

        let modified = mtime.unwrap_or_else(SystemTime::now);
        let accessed = atime.unwrap_or(modified);
        let times = FileTimes::new()
            .set_modified(modified)
            .set_accessed(accessed);

        OpenOptions::new()
            .write(true)
            .open(&self.path)
            .and_then(|file| file.set_times(times))
            .map_err(|error| Error::io(IoOperation::Touch, &self.path, error))?;
        debug!(path = %self.path.display(), "touched file");

        Ok(self)
    }

    /// Reads the whole file under a shared lock, bypassing the serializer.
    pub fn read_bytes(&self) -> Result<Bytes> {
        if !self.exists()? {
            return Err(Error::not_found(&self.path));
        }

        let mut file = fs::File::open(&self.path)
            .map_err(|error| Error::io(IoOperation::Read, &self.path, error))?;
        file.lock_shared()
            .map_err(|error| Error::io(IoOperation::Lock, &self.path, error))?;

        let mut buffer = Vec::new();
        let read = file.read_to_end(&mut buffer);
        let unlocked = file.unlock();

        read.map_err(|error| Error::io(IoOperation::Read, &self.path, error))?;
        unlocked.map_err(|error| Error::io(IoOperation::Lock, &self.path, error))?;
        debug!(path = %self.path.display(), bytes = buffer.len(), "read file");

        Ok(Bytes::from(buffer))
    }

    /// Reads the file, decoding it when a serializer is bound.
    ///
    /// Fails with `NotFound` if the file does not exist.
    pub fn read(&self) -> Result<Record> {
        let bytes = self.read_bytes()?;

        match &self.serializer {
            Some(serializer) => serializer.deserialize(&bytes).map(Record::Parsed),
            None => Ok(Record::Raw(bytes)),
        }
    }

    /// Replaces the file's content under an exclusive lock, creating it first
    /// if needed.
    ///
    /// Parsed records are encoded with the bound serializer before the file
    /// is touched, so an encoding failure leaves the old content in place.
    pub fn write(&self, record: impl Into<Record>) -> Result<&Self> {
        let bytes = record.into().into_bytes(self.serializer.as_deref())?;
        self.write_bytes(&bytes)
    }

    /// Replaces the file's content with `bytes`, bypassing the serializer.
    pub fn write_bytes(&self, bytes: &[u8]) -> Result<&Self> {
        self.create()?;

        // Truncation happens only once the lock is held.
        let mut file = OpenOptions::new()
            .write(true)
            .truncate(false)
            .open(&self.path)
            .map_err(|error| Error::io(IoOperation::Write, &self.path, error))?;
        file.lock()
            .map_err(|error| Error::io(IoOperation::Lock, &self.path, error))?;

        let written = file
            .set_len(0)
            .and_then(|()| file.write_all(bytes))
            .and_then(|()| file.flush());
        let unlocked = file.unlock();

        written.map_err(|error| Error::io(IoOperation::Write, &self.path, error))?;
        unlocked.map_err(|error| Error::io(IoOperation::Lock, &self.path, error))?;
        info!(path = %self.path.display(), bytes = bytes.len(), "wrote file");

        Ok(self)
    }

    /// Removes the file. Removing a missing file only logs a warning.
    pub fn delete(&self) -> Result<&Self> {
        if self.exists()? {
            fs::remove_file(&self.path)
                .map_err(|error| Error::io(IoOperation::Delete, &self.path, error))?;
            info!(path = %self.path.display(), "deleted file");
        } else {
            warn!(path = %self.path.display(), "file is already deleted");
        }

        Ok(self)
    }
}
