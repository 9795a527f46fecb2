//! Error types shared by every storage layer.
//!
//! A single taxonomy covers the whole stack so that a failure raised by the
//! blob layer surfaces unchanged through the key-value and collection layers.
//! Callers branch on [`Error::kind`] rather than on message text.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// The kind of filesystem entry an operation expected to find.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntryType {
    File,
    Directory,
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryType::File => write!(f, "file"),
            EntryType::Directory => write!(f, "directory"),
        }
    }
}

/// The filesystem operation that raised an [`Error::Io`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IoOperation {
    Create,
    Read,
    Write,
    Delete,
    Lock,
    Touch,
    List,
    Stat,
}

impl fmt::Display for IoOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IoOperation::Create => "create",
            IoOperation::Read => "read",
            IoOperation::Write => "write",
            IoOperation::Delete => "delete",
            IoOperation::Lock => "lock",
            IoOperation::Touch => "touch",
            IoOperation::List => "list",
            IoOperation::Stat => "stat",
        };
        f.write_str(name)
    }
}

/// Discriminant of [`Error`], cheap to copy and compare.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    TypeMismatch,
    Io,
    NotFound,
    PreconditionFailed,
    InvalidPattern,
    Serialization,
    MissingField,
    InvalidField,
    InvalidRecord,
    Config,
}

/// Errors raised anywhere in the storage stack.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The path exists but is the wrong kind of entry.
    #[error("path '{}' is not a {expected}", .path.display())]
    TypeMismatch { path: PathBuf, expected: EntryType },

    /// An OS-level create/read/write/delete/lock call failed.
    #[error("failed to {operation} '{}': {source}", .path.display())]
    Io {
        operation: IoOperation,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A read targeted a file that does not exist.
    #[error("file '{}' does not exist", .path.display())]
    NotFound { path: PathBuf },

    /// An operation was invoked in a state it does not accept.
    #[error("{message}")]
    PreconditionFailed { message: String },

    /// An identifier pattern has no `{placeholder}` token.
    #[error("identifier pattern '{pattern}' expects at least one `{{placeholder}}`")]
    InvalidPattern { pattern: String },

    /// A serializer failed to encode or decode a value.
    #[error("serialization error ({extension}): {message}")]
    Serialization { extension: String, message: String },

    /// The parsed record lacks the field bound to a placeholder.
    #[error("placeholder '{placeholder}' requires field '{field}'")]
    MissingField { placeholder: String, field: String },

    /// A field value cannot be rendered into a key.
    #[error("field '{field}' cannot be used in a key: {reason}")]
    InvalidField { field: String, reason: String },

    /// A record parser rejected its input.
    #[error("invalid record: {message}")]
    InvalidRecord { message: String },

    /// Store configuration is unusable.
    #[error("invalid configuration: {message}")]
    Config { message: String },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            Error::Io { .. } => ErrorKind::Io,
            Error::NotFound { .. } => ErrorKind::NotFound,
            Error::PreconditionFailed { .. } => ErrorKind::PreconditionFailed,
            Error::InvalidPattern { .. } => ErrorKind::InvalidPattern,
            Error::Serialization { .. } => ErrorKind::Serialization,
            Error::MissingField { .. } => ErrorKind::MissingField,
            Error::InvalidField { .. } => ErrorKind::InvalidField,
            Error::InvalidRecord { .. } => ErrorKind::InvalidRecord,
            Error::Config { .. } => ErrorKind::Config,
        }
    }

    pub fn io(operation: IoOperation, path: impl AsRef<Path>, source: io::Error) -> Self {
        Error::Io {
            operation,
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn type_mismatch(path: impl AsRef<Path>, expected: EntryType) -> Self {
        Error::TypeMismatch {
            path: path.as_ref().to_path_buf(),
            expected,
        }
    }

    pub fn not_found(path: impl AsRef<Path>) -> Self {
        Error::NotFound {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn precondition(message: impl Into<String>) -> Self {
        Error::PreconditionFailed {
            message: message.into(),
        }
    }

    pub fn serialization(extension: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Serialization {
            extension: extension.into(),
            message: message.into(),
        }
    }

    pub fn invalid_record(message: impl Into<String>) -> Self {
        Error::InvalidRecord {
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}

/// Result alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, Error>;
