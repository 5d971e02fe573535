use std::io;

use logbrowser_utils_mdf::MdfError;
use thiserror::Error;

use crate::path::FsPath;

pub type Result<T> = std::result::Result<T, FinderError>;

#[derive(Debug, Error)]
pub enum FinderError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("path does not exist: {path}")]
    NotFound { path: FsPath },
    #[error("i/o error on {path}: {source}")]
    Io { path: FsPath, source: io::Error },
    #[error("failed to decode timestamp of {path}: {source}")]
    Decode { path: FsPath, source: DecodeError },
}

impl FinderError {
    /// Wraps an I/O failure, keeping `NotFound` distinguishable from other
    /// failures.
    pub(crate) fn from_io(path: &FsPath, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            Self::NotFound { path: path.clone() }
        } else {
            Self::Io {
                path: path.clone(),
                source,
            }
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Failure reported by a [`crate::decode::TimestampDecoder`].
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error(transparent)]
    Mdf(#[from] MdfError),
    #[error("failed to read log file: {0}")]
    Io(#[from] io::Error),
    #[error("malformed log file: {0}")]
    Malformed(String),
}
