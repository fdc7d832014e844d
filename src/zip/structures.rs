use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Read, Write};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{Error, Result};

/// ZIP compression methods
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionMethod {
    Stored,
    Deflate,
    Unknown(u16),
}

impl CompressionMethod {
    pub fn from_u16(value: u16) -> Self {
        match value {
            0 => CompressionMethod::Stored,
            8 => CompressionMethod::Deflate,
            _ => CompressionMethod::Unknown(value),
        }
    }

    pub fn as_u16(&self) -> u16 {
        match self {
            CompressionMethod::Stored => 0,
            CompressionMethod::Deflate => 8,
            CompressionMethod::Unknown(v) => *v,
        }
    }
}

/// General purpose flag: entry is encrypted
pub const FLAG_ENCRYPTED: u16 = 0x0001;
/// General purpose flag: CRC and sizes follow the data in a data descriptor
pub const FLAG_DATA_DESCRIPTOR: u16 = 0x0008;
/// General purpose flag: file name is UTF-8
pub const FLAG_UTF8: u16 = 0x0800;

/// Version 2.0: deflate, directories
pub const VERSION_DEFAULT: u16 = 20;
/// Version 4.5: ZIP64 extensions
pub const VERSION_ZIP64: u16 = 45;
/// Host system in the upper byte of "version made by"
const HOST_UNIX: u16 = 3;

pub const ZIP64_EXTRA_ID: u16 = 0x0001;
pub const U32_MARKER: u32 = 0xFFFFFFFF;
pub const U16_MARKER: u16 = 0xFFFF;

const DOS_DIRECTORY_ATTR: u32 = 0x10;
const UNIX_DIR_MODE: u32 = 0o040755;
const UNIX_FILE_MODE: u32 = 0o100644;

/// Central Directory File Header (CDFH) - 46 bytes minimum
pub const CDFH_SIGNATURE: &[u8] = b"PK\x01\x02";

/// Local File Header (LFH) - 30 bytes
pub const LFH_SIGNATURE: &[u8] = b"PK\x03\x04";

/// Data descriptor, optional signature
pub const DATA_DESCRIPTOR_SIGNATURE: &[u8] = b"PK\x07\x08";

/// Local File Header, everything after the 4-byte signature.
#[derive(Debug, Clone)]
pub struct LocalFileHeader {
    pub version_needed: u16,
    pub flags: u16,
    pub compression_method: CompressionMethod,
    pub last_mod_time: u16,
    pub last_mod_date: u16,
    pub crc32: u32,
    pub compressed_size: u64,
    pub uncompressed_size: u64,
    pub file_name: String,
    /// True when the sizes came from a ZIP64 extra field
    pub zip64: bool,
}

impl LocalFileHeader {
    /// Parse the header that follows an already consumed signature.
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let version_needed = reader.read_u16::<LittleEndian>()?;
        let flags = reader.read_u16::<LittleEndian>()?;
        let compression_method = reader.read_u16::<LittleEndian>()?;
        let last_mod_time = reader.read_u16::<LittleEndian>()?;
        let last_mod_date = reader.read_u16::<LittleEndian>()?;
        let crc32 = reader.read_u32::<LittleEndian>()?;
        let mut compressed_size = reader.read_u32::<LittleEndian>()? as u64;
        let mut uncompressed_size = reader.read_u32::<LittleEndian>()? as u64;
        let file_name_length = reader.read_u16::<LittleEndian>()?;
        let extra_field_length = reader.read_u16::<LittleEndian>()?;

        let mut file_name_bytes = vec![0u8; file_name_length as usize];
        reader.read_exact(&mut file_name_bytes)?;
        // Lossy conversion keeps non-UTF8 (CP437) names usable
        let file_name = String::from_utf8_lossy(&file_name_bytes).into_owned();

        let mut extra = vec![0u8; extra_field_length as usize];
        reader.read_exact(&mut extra)?;

        // ZIP64 local extra carries both sizes, uncompressed first,
        // but only for the fields marked 0xFFFFFFFF in the fixed header
        let mut zip64 = false;
        let mut cursor = extra.as_slice();
        while cursor.len() >= 4 {
            let header_id = cursor.read_u16::<LittleEndian>()?;
            let field_size = cursor.read_u16::<LittleEndian>()? as usize;
            let field_size = field_size.min(cursor.len());
            let (mut field, rest) = cursor.split_at(field_size);
            cursor = rest;

            if header_id != ZIP64_EXTRA_ID {
                continue;
            }
            zip64 = true;
            if uncompressed_size == U32_MARKER as u64 && field.len() >= 8 {
                uncompressed_size = field.read_u64::<LittleEndian>()?;
            }
            if compressed_size == U32_MARKER as u64 && field.len() >= 8 {
                compressed_size = field.read_u64::<LittleEndian>()?;
            }
        }

        Ok(Self {
            version_needed,
            flags,
            compression_method: CompressionMethod::from_u16(compression_method),
            last_mod_time,
            last_mod_date,
            crc32,
            compressed_size,
            uncompressed_size,
            file_name,
            zip64,
        })
    }

    /// Write the header including its signature.
    ///
    /// With `zip64` set both size fields are written as `0xFFFFFFFF` and the
    /// real values go into a ZIP64 extra field. Streaming readers take that
    /// field as the signal that the data descriptor has 64-bit sizes.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        let name = self.file_name.as_bytes();
        let name_len = u16::try_from(name.len())
            .map_err(|_| Error::InvalidArchive(format!("file name too long: {}", self.file_name)))?;

        let mut extra = Vec::new();
        let (compressed_size, uncompressed_size) = if self.zip64 {
            extra.write_u16::<LittleEndian>(ZIP64_EXTRA_ID)?;
            extra.write_u16::<LittleEndian>(16)?;
            extra.write_u64::<LittleEndian>(self.uncompressed_size)?;
            extra.write_u64::<LittleEndian>(self.compressed_size)?;
            (U32_MARKER, U32_MARKER)
        } else {
            (clamp_u32(self.compressed_size), clamp_u32(self.uncompressed_size))
        };

        writer.write_all(LFH_SIGNATURE)?;
        writer.write_u16::<LittleEndian>(self.version_needed)?;
        writer.write_u16::<LittleEndian>(self.flags)?;
        writer.write_u16::<LittleEndian>(self.compression_method.as_u16())?;
        writer.write_u16::<LittleEndian>(self.last_mod_time)?;
        writer.write_u16::<LittleEndian>(self.last_mod_date)?;
        writer.write_u32::<LittleEndian>(self.crc32)?;
        writer.write_u32::<LittleEndian>(compressed_size)?;
        writer.write_u32::<LittleEndian>(uncompressed_size)?;
        writer.write_u16::<LittleEndian>(name_len)?;
        writer.write_u16::<LittleEndian>(extra.len() as u16)?;
        writer.write_all(name)?;
        writer.write_all(&extra)?;
        Ok(())
    }

    pub fn has_data_descriptor(&self) -> bool {
        self.flags & FLAG_DATA_DESCRIPTOR != 0
    }

    pub fn is_encrypted(&self) -> bool {
        self.flags & FLAG_ENCRYPTED != 0
    }
}

/// CRC and sizes trailing an entry written with [`FLAG_DATA_DESCRIPTOR`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataDescriptor {
    pub crc32: u32,
    pub compressed_size: u64,
    pub uncompressed_size: u64,
}

impl DataDescriptor {
    /// Write a signed descriptor. Sizes are 64-bit when `wide` is set (the
    /// local header carried a ZIP64 extra) or when either one needs it.
    pub fn write_to<W: Write>(&self, writer: &mut W, wide: bool) -> Result<()> {
        writer.write_all(DATA_DESCRIPTOR_SIGNATURE)?;
        writer.write_u32::<LittleEndian>(self.crc32)?;
        if wide || self.is_zip64() {
            writer.write_u64::<LittleEndian>(self.compressed_size)?;
            writer.write_u64::<LittleEndian>(self.uncompressed_size)?;
        } else {
            writer.write_u32::<LittleEndian>(self.compressed_size as u32)?;
            writer.write_u32::<LittleEndian>(self.uncompressed_size as u32)?;
        }
        Ok(())
    }

    /// Read a descriptor whose signature may or may not be present.
    ///
    /// The descriptor itself does not say how wide its size fields are.
    /// `wide` selects the ZIP64 layout and must be true when the entry had a
    /// ZIP64 local extra field or either measured size exceeds 32 bits.
    pub fn read_from<R: Read>(reader: &mut R, wide: bool) -> Result<Self> {
        let first = reader.read_u32::<LittleEndian>()?;
        let signature = u32::from_le_bytes([
            DATA_DESCRIPTOR_SIGNATURE[0],
            DATA_DESCRIPTOR_SIGNATURE[1],
            DATA_DESCRIPTOR_SIGNATURE[2],
            DATA_DESCRIPTOR_SIGNATURE[3],
        ]);
        let crc32 = if first == signature {
            reader.read_u32::<LittleEndian>()?
        } else {
            first
        };

        let (compressed_size, uncompressed_size) = if wide {
            (
                reader.read_u64::<LittleEndian>()?,
                reader.read_u64::<LittleEndian>()?,
            )
        } else {
            (
                reader.read_u32::<LittleEndian>()? as u64,
                reader.read_u32::<LittleEndian>()? as u64,
            )
        };

        Ok(Self {
            crc32,
            compressed_size,
            uncompressed_size,
        })
    }

    pub fn is_zip64(&self) -> bool {
        self.compressed_size >= U32_MARKER as u64 || self.uncompressed_size >= U32_MARKER as u64
    }
}

/// Central Directory File Header as written after all entries.
#[derive(Debug, Clone)]
pub struct CentralDirectoryHeader {
    pub flags: u16,
    pub compression_method: CompressionMethod,
    pub last_mod_time: u16,
    pub last_mod_date: u16,
    pub crc32: u32,
    pub compressed_size: u64,
    pub uncompressed_size: u64,
    pub lfh_offset: u64,
    pub file_name: String,
    pub is_directory: bool,
}

impl CentralDirectoryHeader {
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        // ZIP64 extra: only the overflowing fields, in this fixed order
        let mut extra = Vec::new();
        for value in [self.uncompressed_size, self.compressed_size, self.lfh_offset] {
            if value >= U32_MARKER as u64 {
                extra.write_u64::<LittleEndian>(value)?;
            }
        }
        let version_needed = if extra.is_empty() {
            VERSION_DEFAULT
        } else {
            VERSION_ZIP64
        };

        let mut extra_field = Vec::new();
        if !extra.is_empty() {
            extra_field.write_u16::<LittleEndian>(ZIP64_EXTRA_ID)?;
            extra_field.write_u16::<LittleEndian>(extra.len() as u16)?;
            extra_field.extend_from_slice(&extra);
        }

        let external_attrs = if self.is_directory {
            (UNIX_DIR_MODE << 16) | DOS_DIRECTORY_ATTR
        } else {
            UNIX_FILE_MODE << 16
        };

        let name = self.file_name.as_bytes();
        let name_len = u16::try_from(name.len())
            .map_err(|_| Error::InvalidArchive(format!("file name too long: {}", self.file_name)))?;

        writer.write_all(CDFH_SIGNATURE)?;
        writer.write_u16::<LittleEndian>((HOST_UNIX << 8) | version_needed)?;
        writer.write_u16::<LittleEndian>(version_needed)?;
        writer.write_u16::<LittleEndian>(self.flags)?;
        writer.write_u16::<LittleEndian>(self.compression_method.as_u16())?;
        writer.write_u16::<LittleEndian>(self.last_mod_time)?;
        writer.write_u16::<LittleEndian>(self.last_mod_date)?;
        writer.write_u32::<LittleEndian>(self.crc32)?;
        writer.write_u32::<LittleEndian>(clamp_u32(self.compressed_size))?;
        writer.write_u32::<LittleEndian>(clamp_u32(self.uncompressed_size))?;
        writer.write_u16::<LittleEndian>(name_len)?;
        writer.write_u16::<LittleEndian>(extra_field.len() as u16)?;
        writer.write_u16::<LittleEndian>(0)?; // comment length
        writer.write_u16::<LittleEndian>(0)?; // disk number start
        writer.write_u16::<LittleEndian>(0)?; // internal attributes
        writer.write_u32::<LittleEndian>(external_attrs)?;
        writer.write_u32::<LittleEndian>(clamp_u32(self.lfh_offset))?;
        writer.write_all(name)?;
        writer.write_all(&extra_field)?;
        Ok(())
    }
}

/// End of Central Directory (EOCD) - 22 bytes minimum
pub struct EndOfCentralDirectory {
    pub total_entries: u64,
    pub cd_size: u64,
    pub cd_offset: u64,
}

impl EndOfCentralDirectory {
    pub const SIGNATURE: &'static [u8] = b"PK\x05\x06";

    pub fn is_zip64(&self) -> bool {
        self.total_entries >= U16_MARKER as u64
            || self.cd_size >= U32_MARKER as u64
            || self.cd_offset >= U32_MARKER as u64
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        let entries = u16::try_from(self.total_entries)
            .ok()
            .filter(|&n| n != U16_MARKER)
            .unwrap_or(U16_MARKER);

        writer.write_all(Self::SIGNATURE)?;
        writer.write_u16::<LittleEndian>(0)?; // disk number
        writer.write_u16::<LittleEndian>(0)?; // disk with central directory
        writer.write_u16::<LittleEndian>(entries)?;
        writer.write_u16::<LittleEndian>(entries)?;
        writer.write_u32::<LittleEndian>(clamp_u32(self.cd_size))?;
        writer.write_u32::<LittleEndian>(clamp_u32(self.cd_offset))?;
        writer.write_u16::<LittleEndian>(0)?; // comment length
        Ok(())
    }
}

/// ZIP64 End of Central Directory Locator - 20 bytes
pub struct Zip64EOCDLocator {
    pub eocd64_offset: u64,
}

impl Zip64EOCDLocator {
    pub const SIGNATURE: &'static [u8] = b"PK\x06\x07";

    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(Self::SIGNATURE)?;
        writer.write_u32::<LittleEndian>(0)?; // disk with ZIP64 EOCD
        writer.write_u64::<LittleEndian>(self.eocd64_offset)?;
        writer.write_u32::<LittleEndian>(1)?; // total disks
        Ok(())
    }
}

/// ZIP64 End of Central Directory - 56 bytes minimum
pub struct Zip64EOCD {
    pub total_entries: u64,
    pub cd_size: u64,
    pub cd_offset: u64,
}

impl Zip64EOCD {
    pub const SIGNATURE: &'static [u8] = b"PK\x06\x06";
    pub const MIN_SIZE: usize = 56;

    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(Self::SIGNATURE)?;
        // Size of the record not counting the leading 12 bytes
        writer.write_u64::<LittleEndian>((Self::MIN_SIZE - 12) as u64)?;
        writer.write_u16::<LittleEndian>((HOST_UNIX << 8) | VERSION_ZIP64)?;
        writer.write_u16::<LittleEndian>(VERSION_ZIP64)?;
        writer.write_u32::<LittleEndian>(0)?; // disk number
        writer.write_u32::<LittleEndian>(0)?; // disk with central directory
        writer.write_u64::<LittleEndian>(self.total_entries)?;
        writer.write_u64::<LittleEndian>(self.total_entries)?;
        writer.write_u64::<LittleEndian>(self.cd_size)?;
        writer.write_u64::<LittleEndian>(self.cd_offset)?;
        Ok(())
    }
}

/// Parsed ZIP file entry information
#[derive(Debug, Clone)]
pub struct ZipFileEntry {
    pub file_name: String,
    pub compression_method: CompressionMethod,
    pub compressed_size: u64,
    pub uncompressed_size: u64,
    pub crc32: u32,
    pub flags: u16,
    pub last_mod_time: u16,
    pub last_mod_date: u16,
    pub is_directory: bool,
}

impl ZipFileEntry {
    pub(crate) fn from_local_header(header: &LocalFileHeader) -> Self {
        Self {
            file_name: header.file_name.clone(),
            compression_method: header.compression_method,
            compressed_size: header.compressed_size,
            uncompressed_size: header.uncompressed_size,
            crc32: header.crc32,
            flags: header.flags,
            last_mod_time: header.last_mod_time,
            last_mod_date: header.last_mod_date,
            // Directory entries end with '/'
            is_directory: header.file_name.ends_with('/'),
        }
    }

    /// Parse modification date to (year, month, day)
    pub fn mod_date(&self) -> (u16, u8, u8) {
        let day = (self.last_mod_date & 0x1F) as u8;
        let month = ((self.last_mod_date >> 5) & 0x0F) as u8;
        let year = ((self.last_mod_date >> 9) & 0x7F) + 1980;
        (year, month, day)
    }

    /// Parse modification time to (hour, minute, second)
    pub fn mod_time(&self) -> (u8, u8, u8) {
        let second = ((self.last_mod_time & 0x1F) * 2) as u8;
        let minute = ((self.last_mod_time >> 5) & 0x3F) as u8;
        let hour = ((self.last_mod_time >> 11) & 0x1F) as u8;
        (hour, minute, second)
    }
}

/// Convert a timestamp to MS-DOS `(date, time)` fields, in UTC.
///
/// DOS dates cover 1980-2107; anything outside is clamped to the nearest end.
pub fn dos_datetime(time: SystemTime) -> (u16, u16) {
    const MIN_DATE: u16 = (1 << 5) | 1; // 1980-01-01
    const MAX: (u16, u16) = ((127 << 9) | (12 << 5) | 31, (23 << 11) | (59 << 5) | 29);

    let secs = match time.duration_since(UNIX_EPOCH) {
        Ok(d) => d.as_secs(),
        Err(_) => return (MIN_DATE, 0),
    };
    let days = (secs / 86_400) as i64;
    let rem = secs % 86_400;
    let (year, month, day) = civil_from_days(days);

    if year < 1980 {
        return (MIN_DATE, 0);
    }
    if year > 2107 {
        return MAX;
    }

    let date = (((year - 1980) as u16) << 9) | ((month as u16) << 5) | day as u16;
    let hour = (rem / 3600) as u16;
    let minute = ((rem % 3600) / 60) as u16;
    let second = (rem % 60) as u16;
    let time = (hour << 11) | (minute << 5) | (second / 2);
    (date, time)
}

/// Days since 1970-01-01 to a proleptic Gregorian (year, month, day).
fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}

fn clamp_u32(value: u64) -> u32 {
    u32::try_from(value).unwrap_or(U32_MARKER)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn entry_with(date: u16, time: u16) -> ZipFileEntry {
        ZipFileEntry {
            file_name: "a".to_string(),
            compression_method: CompressionMethod::Stored,
            compressed_size: 0,
            uncompressed_size: 0,
            crc32: 0,
            flags: 0,
            last_mod_time: time,
            last_mod_date: date,
            is_directory: false,
        }
    }

    #[test]
    fn test_civil_from_days() {
        assert_eq!(civil_from_days(0), (1970, 1, 1));
        assert_eq!(civil_from_days(3652), (1980, 1, 1));
        assert_eq!(civil_from_days(11_017), (2000, 3, 1));
        assert_eq!(civil_from_days(11_016), (2000, 2, 29));
    }

    #[test]
    fn test_dos_datetime_decodes_back() {
        // 2000-03-01 13:45:30 UTC
        let t = UNIX_EPOCH + Duration::from_secs(11_017 * 86_400 + 13 * 3600 + 45 * 60 + 30);
        let (date, time) = dos_datetime(t);
        let entry = entry_with(date, time);
        assert_eq!(entry.mod_date(), (2000, 3, 1));
        assert_eq!(entry.mod_time(), (13, 45, 30));
    }

    #[test]
    fn test_dos_datetime_clamps_before_1980() {
        assert_eq!(dos_datetime(UNIX_EPOCH), ((1 << 5) | 1, 0));
    }

    #[test]
    fn test_local_header_zip64_sizes() {
        let mut bytes = Vec::new();
        bytes.write_u16::<LittleEndian>(VERSION_ZIP64).unwrap();
        bytes.write_u16::<LittleEndian>(0).unwrap();
        bytes.write_u16::<LittleEndian>(0).unwrap();
        bytes.write_u16::<LittleEndian>(0).unwrap();
        bytes.write_u16::<LittleEndian>(0).unwrap();
        bytes.write_u32::<LittleEndian>(0xDEADBEEF).unwrap();
        bytes.write_u32::<LittleEndian>(U32_MARKER).unwrap();
        bytes.write_u32::<LittleEndian>(U32_MARKER).unwrap();
        bytes.write_u16::<LittleEndian>(3).unwrap();
        bytes.write_u16::<LittleEndian>(20).unwrap();
        bytes.extend_from_slice(b"big");
        bytes.write_u16::<LittleEndian>(ZIP64_EXTRA_ID).unwrap();
        bytes.write_u16::<LittleEndian>(16).unwrap();
        bytes.write_u64::<LittleEndian>(5 << 32).unwrap();
        bytes.write_u64::<LittleEndian>(4 << 32).unwrap();

        let header = LocalFileHeader::read_from(&mut bytes.as_slice()).unwrap();
        assert_eq!(header.file_name, "big");
        assert!(header.zip64);
        assert_eq!(header.uncompressed_size, 5 << 32);
        assert_eq!(header.compressed_size, 4 << 32);
        assert_eq!(header.crc32, 0xDEADBEEF);
    }

    #[test]
    fn test_zip64_local_header_reads_back() {
        let header = LocalFileHeader {
            version_needed: VERSION_ZIP64,
            flags: FLAG_DATA_DESCRIPTOR,
            compression_method: CompressionMethod::Deflate,
            last_mod_time: 0,
            last_mod_date: 0,
            crc32: 0,
            compressed_size: 0,
            uncompressed_size: 0,
            file_name: "big.bin".to_string(),
            zip64: true,
        };
        let mut bytes = Vec::new();
        header.write_to(&mut bytes).unwrap();
        // 30 fixed bytes, the name, then a 4 + 16 byte extra field
        assert_eq!(bytes.len(), 30 + 7 + 20);
        assert_eq!(&bytes[18..26], &[0xFF; 8]);

        let parsed = LocalFileHeader::read_from(&mut &bytes[4..]).unwrap();
        assert!(parsed.zip64);
        assert_eq!(parsed.file_name, "big.bin");
        assert_eq!(parsed.compressed_size, 0);
        assert_eq!(parsed.uncompressed_size, 0);
    }

    #[test]
    fn test_wide_data_descriptor() {
        let descriptor = DataDescriptor {
            crc32: 1,
            compressed_size: 2,
            uncompressed_size: 3,
        };
        let mut narrow = Vec::new();
        descriptor.write_to(&mut narrow, false).unwrap();
        assert_eq!(narrow.len(), 16);

        let mut wide = Vec::new();
        descriptor.write_to(&mut wide, true).unwrap();
        assert_eq!(wide.len(), 24);
        assert_eq!(
            DataDescriptor::read_from(&mut wide.as_slice(), true).unwrap(),
            descriptor
        );
    }

    #[test]
    fn test_data_descriptor_without_signature() {
        let mut bytes = Vec::new();
        bytes.write_u32::<LittleEndian>(0x1234_5678).unwrap();
        bytes.write_u32::<LittleEndian>(7).unwrap();
        bytes.write_u32::<LittleEndian>(11).unwrap();

        let descriptor = DataDescriptor::read_from(&mut bytes.as_slice(), false).unwrap();
        assert_eq!(
            descriptor,
            DataDescriptor {
                crc32: 0x1234_5678,
                compressed_size: 7,
                uncompressed_size: 11,
            }
        );
    }

    #[test]
    fn test_eocd_switches_to_markers() {
        let eocd = EndOfCentralDirectory {
            total_entries: 70_000,
            cd_size: 10,
            cd_offset: 20,
        };
        assert!(eocd.is_zip64());

        let mut bytes = Vec::new();
        eocd.write_to(&mut bytes).unwrap();
        assert_eq!(bytes.len(), 22);
        assert_eq!(&bytes[8..10], &[0xFF, 0xFF]);
    }
}
