//! Error type shared by the archiver and the ZIP codec.
//!
//! Every failure this crate reports is an I/O failure of some kind: an
//! unreadable source, an uncreatable destination, a malformed archive stream
//! or a filesystem conflict. [`Error`] keeps enough detail to tell these apart
//! while [`Error::kind`] and the `From<Error> for io::Error` conversion let
//! callers treat all of them as plain I/O errors.

use std::io;
use std::path::{Path, PathBuf};

/// Convenient result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Underlying read/write failure without a specific path.
    #[error("I/O error: {0}")]
    Io(#[source] io::Error),

    /// Filesystem operation on a specific path failed.
    #[error("Failed to {op} {}: {source}", .path.display())]
    Path {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The byte stream is not a well-formed ZIP archive.
    #[error("Invalid ZIP archive: {0}")]
    InvalidArchive(String),

    /// The entry uses a feature this codec does not implement.
    #[error("Unsupported ZIP entry {name}: {reason}")]
    Unsupported { name: String, reason: String },

    #[error("CRC-32 mismatch for {name}: expected {expected:08x}, got {actual:08x}")]
    ChecksumMismatch {
        name: String,
        expected: u32,
        actual: u32,
    },

    /// Entry name would resolve outside the extraction directory.
    #[error("Entry name escapes the destination directory: {0}")]
    UnsafeEntryName(String),

    /// A path could not be turned into an archive entry name.
    #[error("Cannot derive an entry name for {}", .0.display())]
    InvalidPath(PathBuf),

    #[error("ZIP writer has no open file entry")]
    NoOpenEntry,

    #[error("ZIP writer is already finished")]
    WriterClosed,
}

impl Error {
    /// The closest [`io::ErrorKind`] for this error.
    pub fn kind(&self) -> io::ErrorKind {
        match self {
            Error::Io(e) => e.kind(),
            Error::Path { source, .. } => source.kind(),
            Error::InvalidArchive(_) | Error::ChecksumMismatch { .. } => io::ErrorKind::InvalidData,
            Error::Unsupported { .. } => io::ErrorKind::Unsupported,
            Error::UnsafeEntryName(_) | Error::InvalidPath(_) => io::ErrorKind::InvalidInput,
            Error::NoOpenEntry | Error::WriterClosed => io::ErrorKind::Other,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        // Entry readers report codec errors through `io::Read`; unwrap them
        // again so callers see the original variant.
        if err.get_ref().is_some_and(|inner| inner.is::<Error>()) {
            if let Some(inner) = err.into_inner() {
                if let Ok(original) = inner.downcast::<Error>() {
                    return *original;
                }
            }
            return Error::InvalidArchive("corrupt entry data".to_string());
        }
        Error::Io(err)
    }
}

impl From<Error> for io::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Io(e) => e,
            other => io::Error::new(other.kind(), other),
        }
    }
}

/// Attach the failing operation and path to an [`io::Result`].
pub(crate) trait PathContext<T> {
    fn with_path(self, op: &'static str, path: &Path) -> Result<T>;
}

impl<T> PathContext<T> for io::Result<T> {
    fn with_path(self, op: &'static str, path: &Path) -> Result<T> {
        self.map_err(|source| Error::Path {
            op,
            path: path.to_path_buf(),
            source,
        })
    }
}
