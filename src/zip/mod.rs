//! ZIP archive reading and writing.
//!
//! This module provides a small streaming codec for the standard ZIP format,
//! enough to round-trip directory trees without ever seeking.
//!
//! ## Architecture
//!
//! The module is organized into three main components:
//!
//! - [`structures`]: Data structures representing ZIP format elements (headers, descriptors, EOCD)
//! - [`reader`]: Forward-only decoding of local entries from any [`std::io::BufRead`]
//! - [`writer`]: Streaming encoder writing to any [`std::io::Write`]
//!
//! ## ZIP Format Overview
//!
//! A ZIP file consists of:
//! 1. Local file headers and compressed data for each file
//! 2. Central Directory with metadata for all files
//! 3. End of Central Directory (EOCD) record at the end
//!
//! Both halves of this codec work on the local records only: the writer
//! emits them as it goes and appends the Central Directory at the end, the
//! reader decodes them in order and stops when the Central Directory starts.
//!
//! ## Supported Features
//!
//! - Standard ZIP format (PKZIP APPNOTE 6.3.x compatible)
//! - ZIP64 extensions for files > 4GB and archives with more than 65535 entries
//!   (local ZIP64 extra fields for files announced as large, 64-bit data
//!   descriptors, ZIP64 end records)
//! - STORED (no compression) method
//! - DEFLATE compression method
//! - Data descriptors, with or without signature
//!
//! ## Limitations
//!
//! - No encryption support
//! - No multi-disk archive support
//! - No BZIP2, LZMA, or other compression methods
//! - STORED entries with a data descriptor cannot be read
//! - A file that grows past 4 GiB without having been announced through
//!   `start_file_with_size` gets a 64-bit data descriptor but no ZIP64 local
//!   extra field

pub mod reader;
pub mod structures;
pub mod writer;

pub use reader::{ZipEntry, ZipStreamReader};
pub use structures::{CompressionMethod, ZipFileEntry};
pub use writer::ZipWriter;
