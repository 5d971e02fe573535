use std::path::PathBuf;

use anyhow::Context;
use anyhow::Result;
use anyhow::bail;
use clap::Parser;
use logbrowser_finder::FsPath;
use logbrowser_finder::LogFileFinder;
use logbrowser_finder::fs::RelativeFileSystem;
use time::OffsetDateTime;
use tracing::warn;

use crate::config::BrowserConfig;
use crate::timestamp::format_timestamp;

/// Arguments for reading the start time of a session or log file.
#[derive(Debug, Parser, Clone)]
pub struct FirstTimestampCommand {
    /// Directory holding one subdirectory per device.
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Accepted file extension, case-insensitive (repeatable).
    #[arg(short = 'e', long = "ext", value_name = "EXT")]
    pub extensions: Vec<String>,

    /// Device, session directory or log file, relative to the root.
    #[arg(value_name = "PATH")]
    pub path: String,
}

impl FirstTimestampCommand {
    pub fn run(&self, config: &BrowserConfig) -> Result<()> {
        match self.resolve(config)? {
            Some(timestamp) => println!("{}", format_timestamp(timestamp)?),
            None => warn!("{} holds no matching log files", self.path),
        }
        Ok(())
    }

    pub fn resolve(&self, config: &BrowserConfig) -> Result<Option<OffsetDateTime>> {
        let root = config.root_dir(self.root.as_deref());
        if !root.is_dir() {
            bail!("{} is not a directory", root.display());
        }

        let fs = RelativeFileSystem::local(&root);
        let finder = LogFileFinder::new(&fs)
            .extensions(config.extension_filter(&self.extensions)?)
            .open_options(config.open_options());
        finder
            .first_timestamp(&FsPath::new(&self.path))
            .with_context(|| format!("failed to read the start time of {}", self.path))
    }
}
