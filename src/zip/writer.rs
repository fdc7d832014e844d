//! Streaming ZIP archive writer.
//!
//! Entries are written front to back without seeking: directory entries are
//! zero-length STORED records, file entries are DEFLATE compressed and
//! followed by a data descriptor carrying their CRC and sizes. The central
//! directory is collected in memory and emitted by [`ZipWriter::finish`].
//!
//! Sizes are not known when a local header is written, so a file that may
//! reach 4 GiB has to be announced up front with
//! [`ZipWriter::start_file_with_size`]: its local header then carries a ZIP64
//! extra field and its data descriptor uses 64-bit sizes.

use flate2::Compression;
use flate2::write::DeflateEncoder;
use std::io::{self, Write};
use std::mem;
use std::time::SystemTime;

use crate::error::{Error, Result};

use super::structures::*;

/// Expected sizes from this point on get a ZIP64 local header. The margin
/// below 4 GiB covers DEFLATE's worst-case expansion of stored blocks.
const ZIP64_SIZE_THRESHOLD: u64 = U32_MARKER as u64 - (16 << 20);

/// Counts the bytes passed through to the inner writer, giving the current
/// archive offset without requiring `Seek`.
struct CountingWriter<W: Write> {
    inner: W,
    position: u64,
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.position += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// File entry currently receiving data.
struct OpenFile<W: Write> {
    encoder: DeflateEncoder<CountingWriter<W>>,
    hasher: crc32fast::Hasher,
    size: u64,
    data_start: u64,
    zip64: bool,
    record: CentralDirectoryHeader,
}

enum WriterState<W: Write> {
    Idle(CountingWriter<W>),
    File(OpenFile<W>),
    Closed,
}

/// Writes a ZIP archive to any [`Write`] sink.
///
/// ## Example
///
/// ```no_run
/// use std::io::Write;
/// use std::time::SystemTime;
/// use zipdir::ZipWriter;
///
/// # fn main() -> zipdir::Result<()> {
/// let file = std::fs::File::create("out.zip")?;
/// let mut zip = ZipWriter::new(file);
/// zip.add_directory("docs/", SystemTime::now())?;
/// zip.start_file("docs/readme.txt", SystemTime::now())?;
/// zip.write_all(b"hello")?;
/// zip.finish()?;
/// # Ok(())
/// # }
/// ```
pub struct ZipWriter<W: Write> {
    state: WriterState<W>,
    central_directory: Vec<CentralDirectoryHeader>,
}

impl<W: Write> ZipWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            state: WriterState::Idle(CountingWriter { inner, position: 0 }),
            central_directory: Vec::new(),
        }
    }

    /// Number of entries completed so far.
    pub fn entry_count(&self) -> usize {
        self.central_directory.len()
    }

    /// Write a zero-length directory entry. A trailing `/` is appended to
    /// `name` if it is missing.
    pub fn add_directory(&mut self, name: &str, modified: SystemTime) -> Result<()> {
        let mut name = name.to_string();
        if !name.ends_with('/') {
            name.push('/');
        }

        let mut out = self.take_idle()?;
        let lfh_offset = out.position;
        let (last_mod_date, last_mod_time) = dos_datetime(modified);
        let header = LocalFileHeader {
            version_needed: VERSION_DEFAULT,
            flags: name_flags(&name),
            compression_method: CompressionMethod::Stored,
            last_mod_time,
            last_mod_date,
            crc32: 0,
            compressed_size: 0,
            uncompressed_size: 0,
            file_name: name,
            zip64: false,
        };
        let written = header.write_to(&mut out);
        self.state = WriterState::Idle(out);
        written?;

        log::debug!("zip: directory entry {}", header.file_name);
        self.central_directory.push(CentralDirectoryHeader {
            flags: header.flags,
            compression_method: header.compression_method,
            last_mod_time,
            last_mod_date,
            crc32: 0,
            compressed_size: 0,
            uncompressed_size: 0,
            lfh_offset,
            file_name: header.file_name,
            is_directory: true,
        });
        Ok(())
    }

    /// Begin a file entry. Data is supplied through the [`Write`] impl and
    /// the entry is completed by the next `start_file`, `add_directory` or
    /// `finish` call.
    ///
    /// For content that may reach 4 GiB use [`Self::start_file_with_size`].
    pub fn start_file(&mut self, name: &str, modified: SystemTime) -> Result<()> {
        self.start_file_with_size(name, modified, 0)
    }

    /// [`Self::start_file`] for content of roughly `expected_size` bytes.
    ///
    /// # Arguments
    ///
    /// * `name` - Entry name, `/`-separated
    /// * `modified` - Modification time stored in the entry
    /// * `expected_size` - Expected uncompressed size; only used to decide
    ///   whether the entry needs ZIP64 headers
    pub fn start_file_with_size(
        &mut self,
        name: &str,
        modified: SystemTime,
        expected_size: u64,
    ) -> Result<()> {
        let zip64 = expected_size >= ZIP64_SIZE_THRESHOLD;
        let mut out = self.take_idle()?;
        let lfh_offset = out.position;
        let (last_mod_date, last_mod_time) = dos_datetime(modified);
        let header = LocalFileHeader {
            version_needed: if zip64 { VERSION_ZIP64 } else { VERSION_DEFAULT },
            flags: name_flags(name) | FLAG_DATA_DESCRIPTOR,
            compression_method: CompressionMethod::Deflate,
            last_mod_time,
            last_mod_date,
            crc32: 0,
            compressed_size: 0,
            uncompressed_size: 0,
            file_name: name.to_string(),
            zip64,
        };
        if let Err(e) = header.write_to(&mut out) {
            self.state = WriterState::Idle(out);
            return Err(e);
        }

        log::debug!("zip: file entry {} (zip64: {})", header.file_name, zip64);
        let data_start = out.position;
        self.state = WriterState::File(OpenFile {
            encoder: DeflateEncoder::new(out, Compression::default()),
            hasher: crc32fast::Hasher::new(),
            size: 0,
            data_start,
            zip64,
            record: CentralDirectoryHeader {
                flags: header.flags,
                compression_method: header.compression_method,
                last_mod_time,
                last_mod_date,
                crc32: 0,
                compressed_size: 0,
                uncompressed_size: 0,
                lfh_offset,
                file_name: header.file_name,
                is_directory: false,
            },
        });
        Ok(())
    }

    /// Complete the archive: close the open entry, write the central
    /// directory and end records, flush, and hand back the sink.
    pub fn finish(mut self) -> Result<W> {
        let mut out = self.take_idle()?;
        let cd_offset = out.position;
        for record in &self.central_directory {
            record.write_to(&mut out)?;
        }
        let eocd = EndOfCentralDirectory {
            total_entries: self.central_directory.len() as u64,
            cd_size: out.position - cd_offset,
            cd_offset,
        };

        if eocd.is_zip64() {
            let eocd64_offset = out.position;
            Zip64EOCD {
                total_entries: eocd.total_entries,
                cd_size: eocd.cd_size,
                cd_offset: eocd.cd_offset,
            }
            .write_to(&mut out)?;
            Zip64EOCDLocator { eocd64_offset }.write_to(&mut out)?;
        }
        eocd.write_to(&mut out)?;
        out.flush()?;

        log::debug!(
            "zip: finished archive with {} entries, {} bytes",
            self.central_directory.len(),
            out.position
        );
        Ok(out.inner)
    }

    /// Close any open file entry and take the underlying writer out of the
    /// state machine. The caller must put it back (or drop the writer).
    fn take_idle(&mut self) -> Result<CountingWriter<W>> {
        match mem::replace(&mut self.state, WriterState::Closed) {
            WriterState::Idle(out) => Ok(out),
            WriterState::File(open) => self.close_file(open),
            WriterState::Closed => Err(Error::WriterClosed),
        }
    }

    fn close_file(&mut self, open: OpenFile<W>) -> Result<CountingWriter<W>> {
        let OpenFile {
            encoder,
            hasher,
            size,
            data_start,
            zip64,
            mut record,
        } = open;

        let mut out = encoder.finish()?;
        let descriptor = DataDescriptor {
            crc32: hasher.finalize(),
            compressed_size: out.position - data_start,
            uncompressed_size: size,
        };
        descriptor.write_to(&mut out, zip64)?;

        record.crc32 = descriptor.crc32;
        record.compressed_size = descriptor.compressed_size;
        record.uncompressed_size = descriptor.uncompressed_size;
        self.central_directory.push(record);
        Ok(out)
    }
}

impl<W: Write> Write for ZipWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &mut self.state {
            WriterState::File(open) => {
                let n = open.encoder.write(buf)?;
                open.hasher.update(&buf[..n]);
                open.size += n as u64;
                Ok(n)
            }
            WriterState::Idle(_) => Err(Error::NoOpenEntry.into()),
            WriterState::Closed => Err(Error::WriterClosed.into()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.state {
            WriterState::File(open) => open.encoder.flush(),
            WriterState::Idle(out) => out.flush(),
            WriterState::Closed => Ok(()),
        }
    }
}

fn name_flags(name: &str) -> u16 {
    if name.is_ascii() { 0 } else { FLAG_UTF8 }
}
