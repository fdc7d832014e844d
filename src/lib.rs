//! # zipdir
//!
//! Compress directory trees into ZIP archives and extract them again.
//!
//! The archiver walks a source tree recursively and writes one entry per
//! directory and regular file, naming each entry by its path relative to the
//! source (optionally including the source directory's own name). Extraction
//! decodes the archive strictly in stream order, so it works the same on a
//! file on disk and on a pipe.
//!
//! ## Features
//!
//! - Recursive compression with an optional traversal filter
//! - Empty directories preserved as directory entries
//! - Streaming extraction from any [`std::io::Read`], no seeking
//! - ZIP64 support for large files and archives with many entries
//! - STORED and DEFLATE compression methods, CRC-32 verified on read
//! - Optional confinement of extracted paths to the destination directory
//!
//! ## Example
//!
//! ```no_run
//! fn main() -> zipdir::Result<()> {
//!     // Pack the contents of `model/` (without the `model/` prefix)
//!     zipdir::compress("model", "model.zip", false)?;
//!
//!     // And unpack them somewhere else
//!     zipdir::extract("model.zip", "unpacked")?;
//!     Ok(())
//! }
//! ```

pub mod archiver;
pub mod cli;
pub mod error;
pub mod zip;

pub use archiver::{
    ExtractOptions, ExtractStats, FileFilter, add_to_zip, compress, compress_with_filter, extract,
    extract_from_reader, extract_with_options,
};
pub use cli::Cli;
pub use error::{Error, Result};
pub use zip::{CompressionMethod, ZipEntry, ZipFileEntry, ZipStreamReader, ZipWriter};
