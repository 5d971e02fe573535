use time::OffsetDateTime;
use tracing::trace;

use crate::decode::TimestampDecoder;
use crate::error::FinderError;
use crate::error::Result;
use crate::fs::FileSystem;
use crate::fs::OpenOptions;
use crate::lister::ExtensionFilter;
use crate::lister::list_directories;
use crate::lister::list_files;
use crate::path::FsPath;

/// Opens `path`, decodes its first-measurement timestamp and closes it again.
///
/// The handle lives only for the duration of the decode and is dropped on
/// every return path.
pub fn file_timestamp(
    fs: &dyn FileSystem,
    path: &FsPath,
    decoder: &dyn TimestampDecoder,
    open_options: &OpenOptions,
) -> Result<OffsetDateTime> {
    let mut handle = fs
        .open_for_read(path, open_options)
        .map_err(|err| FinderError::from_io(path, err))?;
    let decoded = decoder.first_timestamp(&mut *handle);
    drop(handle);

    let timestamp = decoded.map_err(|source| FinderError::Decode {
        path: path.clone(),
        source,
    })?;
    trace!("{path} starts at {timestamp}");
    Ok(timestamp)
}

/// Start time of a single log file, or of the first qualifying file in a
/// directory.
///
/// A directory without qualifying files of its own takes the start time of
/// its first subdirectory that has one, so a device root resolves through its
/// sessions. `Ok(None)` means no qualifying file exists anywhere below `path`.
pub fn first_timestamp(
    fs: &dyn FileSystem,
    path: &FsPath,
    extensions: &ExtensionFilter,
    decoder: &dyn TimestampDecoder,
    open_options: &OpenOptions,
) -> Result<Option<OffsetDateTime>> {
    if fs.is_directory(path) {
        let files = list_files(fs, path, extensions)?;
        if let Some(first) = files.first() {
            return file_timestamp(fs, first, decoder, open_options).map(Some);
        }
        for child in list_directories(fs, path)? {
            let found = first_timestamp(fs, &child, extensions, decoder, open_options)?;
            if found.is_some() {
                return Ok(found);
            }
        }
        trace!("{path} holds no log files");
        return Ok(None);
    }
    if fs.is_file(path) {
        return file_timestamp(fs, path, decoder, open_options).map(Some);
    }
    Err(FinderError::NotFound { path: path.clone() })
}
