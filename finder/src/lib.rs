//! Locates recorded log files on device-fleet storage.
//!
//! Files live under `root/<device>/<session>/<file>`. Given a time window,
//! [`LogFileFinder`] binary-searches sessions and files by the timestamp of
//! their first measurement, so only a logarithmic number of files is ever
//! opened.

pub mod decode;
pub mod error;
pub mod finder;
pub mod fs;
pub mod lazy;
pub mod lister;
pub mod path;
pub mod range;
pub mod resolver;
pub mod window;

pub use decode::MdfDecoder;
pub use decode::TimestampDecoder;
pub use error::DecodeError;
pub use error::FinderError;
pub use error::Result;
pub use finder::FindOptions;
pub use finder::LogFileFinder;
pub use finder::find_log_files;
pub use lister::ExtensionFilter;
pub use path::FsPath;
pub use resolver::first_timestamp;
pub use window::TimeWindow;
