//! Forward-only ZIP decoder.
//!
//! Reads local file headers and entry data in stream order and stops at the
//! first central directory record. Nothing is buffered beyond the
//! [`BufRead`] window, so archives can be decoded from pipes and sockets.
//!
//! ## Entry boundaries
//!
//! Without the central directory the only way to find the end of an entry is
//! to decode it:
//! - entries with sizes in the local header are bounded by `compressed_size`
//! - DEFLATE entries with a data descriptor end where the deflate stream ends;
//!   the decoder only consumes the input it actually uses, leaving the reader
//!   positioned on the descriptor
//! - STORED entries with a data descriptor have no recoverable length and are
//!   rejected (directory entries excepted, which are empty by definition)

use flate2::bufread::DeflateDecoder;
use std::io::{self, BufRead, BufReader, Read, Take};

use crate::error::{Error, Result};

use super::structures::*;

/// Sequential reader over the entries of a ZIP stream.
///
/// ## Example
///
/// ```no_run
/// use zipdir::ZipStreamReader;
///
/// # fn main() -> zipdir::Result<()> {
/// let file = std::fs::File::open("archive.zip")?;
/// let mut archive = ZipStreamReader::new(file);
/// while let Some(mut entry) = archive.next_entry()? {
///     let mut contents = Vec::new();
///     std::io::copy(&mut entry, &mut contents)?;
///     println!("{}: {} bytes", entry.name(), contents.len());
/// }
/// # Ok(())
/// # }
/// ```
pub struct ZipStreamReader<R: BufRead> {
    inner: R,
    finished: bool,
}

impl<R: Read> ZipStreamReader<BufReader<R>> {
    /// Wrap an unbuffered reader.
    pub fn new(reader: R) -> Self {
        Self::from_buf_read(BufReader::new(reader))
    }
}

impl<R: BufRead> ZipStreamReader<R> {
    pub fn from_buf_read(inner: R) -> Self {
        Self {
            inner,
            finished: false,
        }
    }

    /// Advance to the next local entry.
    ///
    /// Returns `Ok(None)` once the central directory (or the end of the
    /// stream) is reached. Any unread data of the previous entry is skipped
    /// when that entry is dropped.
    pub fn next_entry(&mut self) -> Result<Option<ZipEntry<'_, R>>> {
        if self.finished {
            return Ok(None);
        }

        let Some(signature) = read_signature(&mut self.inner)? else {
            // Same leniency as most stream decoders: a stream cut exactly at
            // a record boundary simply has no more entries
            log::warn!("zip: stream ended without a central directory");
            self.finished = true;
            return Ok(None);
        };

        self.finished = true;
        if signature != LFH_SIGNATURE {
            if signature == CDFH_SIGNATURE
                || signature == EndOfCentralDirectory::SIGNATURE
                || signature == Zip64EOCD::SIGNATURE
            {
                return Ok(None);
            }
            return Err(Error::InvalidArchive(format!(
                "unexpected record signature {signature:02x?}"
            )));
        }

        // Stays set if the entry is rejected: its data cannot be skipped
        let header = LocalFileHeader::read_from(&mut self.inner)
            .map_err(|e| truncated(e, "local file header"))?;
        let entry = ZipEntry::new(header, &mut self.inner)?;
        self.finished = false;
        Ok(Some(entry))
    }
}

/// Read a 4-byte record signature, `None` on a clean end of stream.
fn read_signature<R: Read>(reader: &mut R) -> Result<Option<[u8; 4]>> {
    let mut signature = [0u8; 4];
    let mut filled = 0;
    while filled < signature.len() {
        match reader.read(&mut signature[filled..]) {
            Ok(0) if filled == 0 => return Ok(None),
            Ok(0) => {
                return Err(Error::InvalidArchive(
                    "truncated record signature".to_string(),
                ));
            }
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(Some(signature))
}

fn truncated(err: Error, record: &str) -> Error {
    match err {
        Error::Io(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
            Error::InvalidArchive(format!("truncated {record}"))
        }
        other => other,
    }
}

/// The decoder reports a bad DEFLATE stream (or one cut short) as a plain
/// I/O error; surface it as a malformed archive instead.
fn corrupt_data(name: &str, err: io::Error) -> io::Error {
    match err.kind() {
        io::ErrorKind::InvalidInput | io::ErrorKind::InvalidData | io::ErrorKind::UnexpectedEof
            if err.get_ref().is_none_or(|inner| !inner.is::<Error>()) =>
        {
            Error::InvalidArchive(format!("corrupt data for {name}: {err}")).into()
        }
        _ => err,
    }
}

enum EntryData<'a, R: BufRead> {
    Stored(Take<&'a mut R>),
    Deflated(DeflateDecoder<Take<&'a mut R>>),
    /// Length unknown up front, runs to the end of the deflate stream
    DeflatedToEnd(DeflateDecoder<&'a mut R>),
}

/// One entry of a [`ZipStreamReader`]. Reading yields the decompressed
/// contents; the CRC-32 and sizes are verified when the data is exhausted.
pub struct ZipEntry<'a, R: BufRead> {
    info: ZipFileEntry,
    data: EntryData<'a, R>,
    zip64: bool,
    hasher: crc32fast::Hasher,
    bytes_out: u64,
    finished: bool,
}

impl<'a, R: BufRead> ZipEntry<'a, R> {
    fn new(header: LocalFileHeader, inner: &'a mut R) -> Result<Self> {
        let info = ZipFileEntry::from_local_header(&header);

        if header.is_encrypted() {
            return Err(Error::Unsupported {
                name: header.file_name,
                reason: "encrypted entries are not supported".to_string(),
            });
        }

        let data = match (header.compression_method, header.has_data_descriptor()) {
            (CompressionMethod::Stored, false) => {
                EntryData::Stored(inner.take(header.compressed_size))
            }
            (CompressionMethod::Stored, true) if info.is_directory => {
                EntryData::Stored(inner.take(0))
            }
            (CompressionMethod::Stored, true) => {
                return Err(Error::Unsupported {
                    name: header.file_name,
                    reason: "STORED entry with a data descriptor cannot be streamed".to_string(),
                });
            }
            (CompressionMethod::Deflate, false) => {
                EntryData::Deflated(DeflateDecoder::new(inner.take(header.compressed_size)))
            }
            (CompressionMethod::Deflate, true) => {
                EntryData::DeflatedToEnd(DeflateDecoder::new(inner))
            }
            (CompressionMethod::Unknown(method), _) => {
                return Err(Error::Unsupported {
                    name: header.file_name,
                    reason: format!("compression method {method}"),
                });
            }
        };

        Ok(Self {
            info,
            data,
            zip64: header.zip64,
            hasher: crc32fast::Hasher::new(),
            bytes_out: 0,
            finished: false,
        })
    }

    /// Entry name exactly as stored in the archive.
    pub fn name(&self) -> &str {
        &self.info.file_name
    }

    pub fn is_dir(&self) -> bool {
        self.info.is_directory
    }

    /// Entry metadata. CRC and sizes are taken from the local header until
    /// the entry has been read to the end, after which they are the verified
    /// values (including those from a data descriptor).
    pub fn info(&self) -> &ZipFileEntry {
        &self.info
    }

    /// Called once the decompressed data is exhausted: skip any padding,
    /// consume the data descriptor and verify CRC and sizes.
    fn finish(&mut self) -> Result<()> {
        self.finished = true;

        let Self {
            info,
            data,
            zip64,
            hasher,
            bytes_out,
            ..
        } = self;

        let (compressed, mut rest): (u64, &mut dyn Read) = match data {
            EntryData::Stored(take) => {
                if take.limit() != 0 {
                    return Err(Error::InvalidArchive(format!(
                        "truncated data for {}",
                        info.file_name
                    )));
                }
                (info.compressed_size, take.get_mut())
            }
            EntryData::Deflated(decoder) => {
                // Deflate stream may end before the declared size
                io::copy(decoder.get_mut(), &mut io::sink())?;
                if decoder.get_ref().limit() != 0 {
                    return Err(Error::InvalidArchive(format!(
                        "truncated data for {}",
                        info.file_name
                    )));
                }
                (info.compressed_size, decoder.get_mut().get_mut())
            }
            EntryData::DeflatedToEnd(decoder) => (decoder.total_in(), decoder.get_mut()),
        };

        let has_descriptor = info.flags & FLAG_DATA_DESCRIPTOR != 0;
        let (expected_crc, expected_compressed, expected_size) = if has_descriptor {
            let wide = *zip64
                || compressed >= U32_MARKER as u64
                || *bytes_out >= U32_MARKER as u64;
            let descriptor = DataDescriptor::read_from(&mut rest, wide)
                .map_err(|e| truncated(e, "data descriptor"))?;
            (
                descriptor.crc32,
                descriptor.compressed_size,
                descriptor.uncompressed_size,
            )
        } else {
            (info.crc32, info.compressed_size, info.uncompressed_size)
        };

        let actual_crc = hasher.clone().finalize();
        if actual_crc != expected_crc {
            return Err(Error::ChecksumMismatch {
                name: info.file_name.clone(),
                expected: expected_crc,
                actual: actual_crc,
            });
        }
        if *bytes_out != expected_size || compressed != expected_compressed {
            return Err(Error::InvalidArchive(format!(
                "size mismatch for {}: expected {}/{} bytes, got {}/{}",
                info.file_name, expected_compressed, expected_size, compressed, bytes_out
            )));
        }

        info.crc32 = actual_crc;
        info.compressed_size = compressed;
        info.uncompressed_size = *bytes_out;
        Ok(())
    }
}

impl<R: BufRead> Read for ZipEntry<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.finished || buf.is_empty() {
            return Ok(0);
        }

        let name = &self.info.file_name;
        let n = match &mut self.data {
            EntryData::Stored(reader) => reader.read(buf)?,
            EntryData::Deflated(reader) => reader.read(buf).map_err(|e| corrupt_data(name, e))?,
            EntryData::DeflatedToEnd(reader) => {
                reader.read(buf).map_err(|e| corrupt_data(name, e))?
            }
        };

        if n == 0 {
            self.finish()?;
            return Ok(0);
        }

        self.hasher.update(&buf[..n]);
        self.bytes_out += n as u64;
        Ok(n)
    }
}

impl<R: BufRead> Drop for ZipEntry<'_, R> {
    fn drop(&mut self) {
        // Leave the stream positioned on the next record
        if !self.finished {
            if let Err(e) = io::copy(self, &mut io::sink()) {
                log::debug!("zip: failed to skip rest of {}: {}", self.info.file_name, e);
            }
        }
    }
}
