use std::path::PathBuf;

use anyhow::Context;
use anyhow::Result;
use anyhow::bail;
use clap::Parser;
use logbrowser_finder::FsPath;
use logbrowser_finder::LogFileFinder;
use logbrowser_finder::TimeWindow;
use logbrowser_finder::fs::RelativeFileSystem;
use time::OffsetDateTime;

use crate::config::BrowserConfig;
use crate::timestamp::parse_timestamp;

/// Arguments for listing the log files of one or more devices.
#[derive(Debug, Parser, Clone)]
pub struct FindCommand {
    /// Directory holding one subdirectory per device.
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Device to search (repeatable).
    #[arg(short = 'd', long = "device", value_name = "ID")]
    pub devices: Vec<String>,

    /// Accepted file extension, case-insensitive (repeatable).
    #[arg(short = 'e', long = "ext", value_name = "EXT")]
    pub extensions: Vec<String>,

    /// Only files recording at or after this time.
    #[arg(long, value_name = "TIMESTAMP", value_parser = parse_timestamp)]
    pub start: Option<OffsetDateTime>,

    /// Only files that started recording at or before this time.
    #[arg(long, value_name = "TIMESTAMP", value_parser = parse_timestamp)]
    pub stop: Option<OffsetDateTime>,

    /// List files without opening them.
    #[arg(long, conflicts_with_all = ["start", "stop"])]
    pub no_timestamps: bool,

    /// Print a JSON array instead of one path per line.
    #[arg(long)]
    pub json: bool,
}

impl FindCommand {
    pub fn run(&self, config: &BrowserConfig) -> Result<()> {
        let found = self.find(config)?;
        let rendered = render_paths(&found, self.json)?;
        if !rendered.is_empty() {
            println!("{rendered}");
        }
        Ok(())
    }

    /// Paths are relative to the root and start with `/`.
    pub fn find(&self, config: &BrowserConfig) -> Result<Vec<FsPath>> {
        let devices = if self.devices.is_empty() {
            &config.devices
        } else {
            &self.devices
        };
        if devices.is_empty() {
            bail!("no devices to search; pass --device or set `devices` in the config");
        }
        if let (Some(start), Some(stop)) = (self.start, self.stop)
            && start > stop
        {
            bail!("--start must not be later than --stop");
        }

        let root = config.root_dir(self.root.as_deref());
        if !root.is_dir() {
            bail!("{} is not a directory", root.display());
        }

        let fs = RelativeFileSystem::local(&root);
        let mut finder = LogFileFinder::new(&fs)
            .extensions(config.extension_filter(&self.extensions)?)
            .open_options(config.open_options())
            .window(TimeWindow {
                lower: self.start,
                upper: self.stop,
            });
        if self.no_timestamps {
            finder = finder.without_decoder();
        }
        finder
            .find(devices.as_slice())
            .with_context(|| format!("failed to search {}", root.display()))
    }
}

pub fn render_paths(paths: &[FsPath], json: bool) -> Result<String> {
    let paths: Vec<&str> = paths.iter().map(FsPath::as_str).collect();
    if json {
        Ok(serde_json::to_string(&paths)?)
    } else {
        Ok(paths.join("\n"))
    }
}
