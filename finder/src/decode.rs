use time::OffsetDateTime;

use crate::error::DecodeError;
use crate::fs::FileHandle;

/// Reads the first-measurement timestamp out of an open log file.
pub trait TimestampDecoder: Send + Sync {
    fn first_timestamp(&self, handle: &mut dyn FileHandle) -> Result<OffsetDateTime, DecodeError>;
}

impl<F> TimestampDecoder for F
where
    F: Fn(&mut dyn FileHandle) -> Result<OffsetDateTime, DecodeError> + Send + Sync,
{
    fn first_timestamp(&self, handle: &mut dyn FileHandle) -> Result<OffsetDateTime, DecodeError> {
        self(handle)
    }
}

/// Uses the measurement start time recorded in the MDF4 `##HD` header block.
///
/// This is the time the recorder stamped when the file was opened, not the
/// timestamp of the first data record. Supply a custom [`TimestampDecoder`] when the first sample itself matters.
#[derive(Debug, Clone, Copy, Default)]
pub struct MdfDecoder;

impl TimestampDecoder for MdfDecoder {
    fn first_timestamp(&self, handle: &mut dyn FileHandle) -> Result<OffsetDateTime, DecodeError> {
        Ok(logbrowser_utils_mdf::read_start_time(handle)?)
    }
}
