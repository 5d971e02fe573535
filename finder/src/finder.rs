//! Windowed search for log files across a fleet of devices.
//!
//! Storage is laid out as `root/<device>/<session>/<file>`, with session and
//! file names sorting in recording order. A window search narrows sessions
//! first and then files inside the boundary sessions, decoding only the
//! handful of files the binary searches probe.

use std::fmt;
use std::sync::Arc;

use time::OffsetDateTime;
use time::PrimitiveDateTime;
use tracing::debug;

use crate::decode::MdfDecoder;
use crate::decode::TimestampDecoder;
use crate::error::FinderError;
use crate::error::Result;
use crate::fs::FileSystem;
use crate::fs::OpenOptions;
use crate::lister::ExtensionFilter;
use crate::lister::list_directories;
use crate::lister::list_files;
use crate::path::FsPath;
use crate::range::select_range;
use crate::range::select_spans;
use crate::resolver;
use crate::window::TimeWindow;

/// Timestamp given to a session without qualifying files. It sorts before
/// every real timestamp, so a lower bound never drops such a session.
pub const EMPTY_SESSION_TIMESTAMP: OffsetDateTime = PrimitiveDateTime::MIN.assume_utc();

#[derive(Clone)]
pub struct FindOptions {
    /// Directory holding one subdirectory per device.
    pub root: FsPath,
    pub extensions: ExtensionFilter,
    pub window: TimeWindow,
    /// Without a decoder nothing can be compared, so the window is ignored.
    pub decoder: Option<Arc<dyn TimestampDecoder>>,
    pub open_options: OpenOptions,
}

impl Default for FindOptions {
    fn default() -> Self {
        Self {
            root: FsPath::root(),
            extensions: ExtensionFilter::default(),
            window: TimeWindow::unbounded(),
            decoder: Some(Arc::new(MdfDecoder)),
            open_options: OpenOptions::default(),
        }
    }
}

impl fmt::Debug for FindOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FindOptions")
            .field("root", &self.root)
            .field("extensions", &self.extensions)
            .field("window", &self.window)
            .field("has_decoder", &self.decoder.is_some())
            .field("open_options", &self.open_options)
            .finish()
    }
}

pub struct LogFileFinder<'a> {
    fs: &'a dyn FileSystem,
    options: FindOptions,
}

impl<'a> LogFileFinder<'a> {
    pub fn new(fs: &'a dyn FileSystem) -> Self {
        Self::with_options(fs, FindOptions::default())
    }

    pub fn with_options(fs: &'a dyn FileSystem, options: FindOptions) -> Self {
        Self { fs, options }
    }

    pub fn root(mut self, root: impl Into<FsPath>) -> Self {
        self.options.root = root.into();
        self
    }

    pub fn extensions(mut self, extensions: ExtensionFilter) -> Self {
        self.options.extensions = extensions;
        self
    }

    pub fn window(mut self, window: TimeWindow) -> Self {
        self.options.window = window;
        self
    }

    pub fn decoder(mut self, decoder: impl TimestampDecoder + 'static) -> Self {
        self.options.decoder = Some(Arc::new(decoder));
        self
    }

    /// Lists files without ever opening them; any window is ignored.
    pub fn without_decoder(mut self) -> Self {
        self.options.decoder = None;
        self
    }

    pub fn open_options(mut self, open_options: OpenOptions) -> Self {
        self.options.open_options = open_options;
        self
    }

    pub fn options(&self) -> &FindOptions {
        &self.options
    }

    /// Log files of every device in `devices` whose first measurement falls
    /// in the window, sorted by path.
    ///
    /// Devices without a directory under the root are skipped. Arguments are
    /// validated before any filesystem access, and a file that cannot be
    /// decoded fails the whole search.
    pub fn find<S: AsRef<str>>(&self, devices: &[S]) -> Result<Vec<FsPath>> {
        if devices.is_empty() {
            return Err(FinderError::InvalidArgument(
                "at least one device is required".to_string(),
            ));
        }
        for (position, device) in devices.iter().enumerate() {
            validate_device(position, device.as_ref())?;
        }

        let mut found = Vec::new();
        for device in devices {
            found.extend(self.find_device(device.as_ref())?);
        }
        found.sort();
        Ok(found)
    }

    /// Start time of `path` using this finder's extensions and decoder. See
    /// [`resolver::first_timestamp`].
    pub fn first_timestamp(&self, path: &FsPath) -> Result<Option<OffsetDateTime>> {
        let decoder = self.options.decoder.as_deref().ok_or_else(|| {
            FinderError::InvalidArgument("a timestamp decoder is required".to_string())
        })?;
        resolver::first_timestamp(
            self.fs,
            path,
            &self.options.extensions,
            decoder,
            &self.options.open_options,
        )
    }

    fn find_device(&self, device: &str) -> Result<Vec<FsPath>> {
        let device_root = self.options.root.join(device);
        let sessions = match list_directories(self.fs, &device_root) {
            Ok(sessions) => sessions,
            Err(err) if err.is_not_found() => {
                debug!("skipping device {device}: {device_root} does not exist");
                return Ok(Vec::new());
            }
            Err(err) => return Err(err),
        };

        let window = self.options.window;
        let decoder = match self.options.decoder.as_deref() {
            Some(decoder) if window.is_bounded() => decoder,
            _ => {
                debug!("device {device}: {} sessions, no window", sessions.len());
                return self.all_files(&sessions);
            }
        };

        let total = sessions.len();
        let sessions = select_spans(
            sessions,
            Some(|session: &FsPath| self.session_timestamp(session, decoder)),
            window.lower.as_ref(),
            window.upper.as_ref(),
        )?;
        debug!("device {device}: {} of {total} sessions overlap the window", sessions.len());

        match sessions.as_slice() {
            [] => Ok(Vec::new()),
            [only] => self.select_files(only, &window, decoder),
            [first, middle @ .., last] => {
                let mut found = self.boundary_files(first, &window.lower_only(), decoder)?;
                found.extend(self.all_files(middle)?);
                found.extend(self.boundary_files(last, &window.upper_only(), decoder)?);
                Ok(found)
            }
        }
    }

    fn all_files(&self, sessions: &[FsPath]) -> Result<Vec<FsPath>> {
        let mut found = Vec::new();
        for session in sessions {
            found.extend(list_files(self.fs, session, &self.options.extensions)?);
        }
        Ok(found)
    }

    /// Boundary sessions are cut on one side only; a session holding a single
    /// file is kept whole.
    fn boundary_files(
        &self,
        session: &FsPath,
        window: &TimeWindow,
        decoder: &dyn TimestampDecoder,
    ) -> Result<Vec<FsPath>> {
        let files = list_files(self.fs, session, &self.options.extensions)?;
        if files.len() == 1 {
            debug!("{session}: single file kept whole");
            return Ok(files);
        }
        self.narrow_files(session, files, window, decoder)
    }

    fn select_files(
        &self,
        session: &FsPath,
        window: &TimeWindow,
        decoder: &dyn TimestampDecoder,
    ) -> Result<Vec<FsPath>> {
        let files = list_files(self.fs, session, &self.options.extensions)?;
        self.narrow_files(session, files, window, decoder)
    }

    fn narrow_files(
        &self,
        session: &FsPath,
        files: Vec<FsPath>,
        window: &TimeWindow,
        decoder: &dyn TimestampDecoder,
    ) -> Result<Vec<FsPath>> {
        let total = files.len();
        let files = select_range(
            files,
            Some(|file: &FsPath| self.file_timestamp(file, decoder)),
            window.lower.as_ref(),
            window.upper.as_ref(),
        )?;
        debug!("{session}: {} of {total} files selected", files.len());
        Ok(files)
    }

    fn session_timestamp(
        &self,
        session: &FsPath,
        decoder: &dyn TimestampDecoder,
    ) -> Result<OffsetDateTime> {
        let files = list_files(self.fs, session, &self.options.extensions)?;
        match files.first() {
            Some(first) => self.file_timestamp(first, decoder),
            None => Ok(EMPTY_SESSION_TIMESTAMP),
        }
    }

    fn file_timestamp(&self, file: &FsPath, decoder: &dyn TimestampDecoder) -> Result<OffsetDateTime> {
        resolver::file_timestamp(self.fs, file, decoder, &self.options.open_options)
    }
}

/// A device id names one directory directly below the root.
fn validate_device(position: usize, device: &str) -> Result<()> {
    let trimmed = device.trim();
    if trimmed.is_empty() {
        return Err(FinderError::InvalidArgument(format!(
            "device at position {position} is blank"
        )));
    }
    if trimmed.contains(['/', '\\']) || trimmed == "." || trimmed == ".." {
        return Err(FinderError::InvalidArgument(format!(
            "device {device:?} is not a single directory name"
        )));
    }
    Ok(())
}

/// Convenience wrapper around [`LogFileFinder::find`].
pub fn find_log_files<S: AsRef<str>>(
    fs: &dyn FileSystem,
    devices: &[S],
    options: &FindOptions,
) -> Result<Vec<FsPath>> {
    LogFileFinder::with_options(fs, options.clone()).find(devices)
}
