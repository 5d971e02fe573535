//! Just enough of the ASAM MDF4 layout to recover when a recording started.
//!
//! A file starts with a 64-byte identification block followed by the `##HD`
//! header block. The header carries `start_time_ns`, which is the only value
//! this crate extracts.

use std::io;
use std::io::Read;
use std::io::Seek;
use std::io::SeekFrom;

use thiserror::Error;
use time::Duration;
use time::OffsetDateTime;

pub type Result<T> = std::result::Result<T, MdfError>;

const ID_BLOCK_LEN: usize = 64;
const HD_BLOCK_OFFSET: u64 = 64;
const BLOCK_HEADER_LEN: usize = 24;
/// Fixed part of the HD data section that precedes the start angle/distance.
const HD_TIME_FIELDS_LEN: usize = 16;
/// HD blocks in the wild carry six links; anything far beyond that is corrupt.
const MAX_HD_LINKS: u64 = 64;
const MIN_SUPPORTED_VERSION: u16 = 400;

const FINALIZED_FILE_ID: &[u8; 8] = b"MDF     ";
const UNFINALIZED_FILE_ID: &[u8; 8] = b"UnFinMF ";
const HD_BLOCK_ID: &[u8; 4] = b"##HD";

const TIME_FLAG_LOCAL_TIME: u8 = 0b01;
const TIME_FLAG_OFFSETS_VALID: u8 = 0b10;

#[derive(Debug, Error)]
pub enum MdfError {
    #[error("failed to read mdf data: {0}")]
    Io(#[from] io::Error),
    #[error("not an mdf file (file id {found:?})")]
    NotMdf { found: String },
    #[error("unsupported mdf version {version}; at least 4.00 is required")]
    UnsupportedVersion { version: u16 },
    #[error("invalid {block} block: {reason}")]
    InvalidBlock { block: &'static str, reason: String },
    #[error("start time {nanos}ns cannot be represented as a timestamp")]
    TimestampOutOfRange { nanos: i128 },
}

/// Parsed identification block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identification {
    pub version: u16,
    pub version_label: String,
    pub program: String,
    pub finalized: bool,
}

/// Time fields of the `##HD` block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderTime {
    pub start_time_ns: u64,
    pub tz_offset_min: i16,
    pub dst_offset_min: i16,
    pub time_flags: u8,
}

impl HeaderTime {
    /// Start of the measurement as a UTC instant.
    ///
    /// When the file records local time with valid offsets, the offsets are
    /// removed. Local time without offsets is taken as UTC since there is
    /// nothing better to anchor it to.
    pub fn start_time(&self) -> Result<OffsetDateTime> {
        let mut nanos = i128::from(self.start_time_ns);
        if self.time_flags & TIME_FLAG_LOCAL_TIME != 0
            && self.time_flags & TIME_FLAG_OFFSETS_VALID != 0
        {
            let offset_min = i128::from(self.tz_offset_min) + i128::from(self.dst_offset_min);
            nanos -= offset_min * Duration::MINUTE.whole_nanoseconds();
        }
        OffsetDateTime::from_unix_timestamp_nanos(nanos)
            .map_err(|_| MdfError::TimestampOutOfRange { nanos })
    }
}

pub fn read_identification<R: Read + Seek + ?Sized>(reader: &mut R) -> Result<Identification> {
    reader.seek(SeekFrom::Start(0))?;
    let mut block = [0u8; ID_BLOCK_LEN];
    reader.read_exact(&mut block)?;

    let file_id = &block[0..8];
    let finalized = if file_id == FINALIZED_FILE_ID {
        true
    } else if file_id == UNFINALIZED_FILE_ID {
        false
    } else {
        return Err(MdfError::NotMdf {
            found: String::from_utf8_lossy(file_id).into_owned(),
        });
    };

    let version = u16::from_le_bytes([block[28], block[29]]);
    if version < MIN_SUPPORTED_VERSION {
        return Err(MdfError::UnsupportedVersion { version });
    }

    Ok(Identification {
        version,
        version_label: trimmed_ascii(&block[8..16]),
        program: trimmed_ascii(&block[16..24]),
        finalized,
    })
}

pub fn read_header_time<R: Read + Seek + ?Sized>(reader: &mut R) -> Result<HeaderTime> {
    reader.seek(SeekFrom::Start(HD_BLOCK_OFFSET))?;
    let mut header = [0u8; BLOCK_HEADER_LEN];
    reader.read_exact(&mut header)?;

    if &header[0..4] != HD_BLOCK_ID {
        return Err(MdfError::InvalidBlock {
            block: "HD",
            reason: format!(
                "expected id {:?}, found {:?}",
                String::from_utf8_lossy(HD_BLOCK_ID),
                String::from_utf8_lossy(&header[0..4])
            ),
        });
    }
    let length = read_u64(&header[8..16]);
    let link_count = read_u64(&header[16..24]);
    if link_count > MAX_HD_LINKS {
        return Err(MdfError::InvalidBlock {
            block: "HD",
            reason: format!("implausible link count {link_count}"),
        });
    }
    let data_offset = BLOCK_HEADER_LEN as u64 + link_count * 8;
    if length < data_offset + HD_TIME_FIELDS_LEN as u64 {
        return Err(MdfError::InvalidBlock {
            block: "HD",
            reason: format!("block length {length} too small for {link_count} links"),
        });
    }

    reader.seek(SeekFrom::Start(HD_BLOCK_OFFSET + data_offset))?;
    let mut data = [0u8; HD_TIME_FIELDS_LEN];
    reader.read_exact(&mut data)?;

    Ok(HeaderTime {
        start_time_ns: read_u64(&data[0..8]),
        tz_offset_min: i16::from_le_bytes([data[8], data[9]]),
        dst_offset_min: i16::from_le_bytes([data[10], data[11]]),
        time_flags: data[12],
    })
}

/// Validate the identification block and return the measurement start time
/// from the `##HD` block. Data records are not read.
pub fn read_start_time<R: Read + Seek + ?Sized>(reader: &mut R) -> Result<OffsetDateTime> {
    read_identification(reader)?;
    read_header_time(reader)?.start_time()
}

fn read_u64(bytes: &[u8]) -> u64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&bytes[..8]);
    u64::from_le_bytes(buf)
}

fn trimmed_ascii(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .trim_end_matches(['\0', ' '])
        .to_string()
}

/// Builds the smallest byte image `read_start_time` accepts. Used by tests in
/// this workspace to fabricate log files.
pub fn synthetic_file(start_time_ns: u64) -> Vec<u8> {
    let link_count: u64 = 6;
    let data_len = HD_TIME_FIELDS_LEN as u64 + 16;
    let hd_len = BLOCK_HEADER_LEN as u64 + link_count * 8 + data_len;

    let mut bytes = Vec::with_capacity(ID_BLOCK_LEN + hd_len as usize);
    bytes.extend_from_slice(FINALIZED_FILE_ID);
    bytes.extend_from_slice(b"4.11    ");
    bytes.extend_from_slice(b"logbrwsr");
    bytes.extend_from_slice(&[0u8; 4]);
    bytes.extend_from_slice(&411u16.to_le_bytes());
    bytes.resize(ID_BLOCK_LEN, 0);

    bytes.extend_from_slice(HD_BLOCK_ID);
    bytes.extend_from_slice(&[0u8; 4]);
    bytes.extend_from_slice(&hd_len.to_le_bytes());
    bytes.extend_from_slice(&link_count.to_le_bytes());
    bytes.extend(std::iter::repeat_n(0u8, (link_count * 8) as usize));
    bytes.extend_from_slice(&start_time_ns.to_le_bytes());
    bytes.extend_from_slice(&0i16.to_le_bytes());
    bytes.extend_from_slice(&0i16.to_le_bytes());
    bytes.push(0);
    bytes.resize(ID_BLOCK_LEN + hd_len as usize, 0);
    bytes
}
