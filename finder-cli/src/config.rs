use std::path::Path;
use std::path::PathBuf;

use anyhow::Context;
use anyhow::Result;
use anyhow::bail;
use logbrowser_finder::ExtensionFilter;
use logbrowser_finder::fs::CacheHint;
use logbrowser_finder::fs::DEFAULT_BLOCK_SIZE;
use logbrowser_finder::fs::OpenOptions;
use logbrowser_utils_home_dir::default_config_path;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;

/// Settings read from `config.toml`. Every field is optional in the file and
/// command-line flags take precedence over it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BrowserConfig {
    /// Local directory holding one subdirectory per device.
    pub root: Option<PathBuf>,
    /// Devices searched when none are passed on the command line.
    pub devices: Vec<String>,
    /// Accepted log file extensions; empty means `mf4`.
    pub extensions: Vec<String>,
    pub block_size: usize,
    pub cache: CacheSetting,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            root: None,
            devices: Vec::new(),
            extensions: Vec::new(),
            block_size: DEFAULT_BLOCK_SIZE,
            cache: CacheSetting::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum CacheSetting {
    None,
    #[default]
    ReadAhead,
    Whole,
}

impl From<CacheSetting> for CacheHint {
    fn from(setting: CacheSetting) -> Self {
        match setting {
            CacheSetting::None => CacheHint::None,
            CacheSetting::ReadAhead => CacheHint::ReadAhead,
            CacheSetting::Whole => CacheHint::Whole,
        }
    }
}

impl BrowserConfig {
    /// Loads `explicit` if given, which must exist. Otherwise loads
    /// `$LOGBROWSER_HOME/config.toml`, falling back to defaults when that file
    /// is absent.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        let path = default_config_path().context("failed to locate the log browser home")?;
        if !path.exists() {
            debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::from_file(&path)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config at {}", path.display()))?;
        Self::from_toml(&contents)
            .with_context(|| format!("failed to parse config at {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)?;
        if config.block_size == 0 {
            bail!("block_size must be greater than zero");
        }
        Ok(config)
    }

    /// `flag` if given, then the configured root, then the current directory.
    pub fn root_dir(&self, flag: Option<&Path>) -> PathBuf {
        flag.or(self.root.as_deref())
            .unwrap_or(Path::new("."))
            .to_path_buf()
    }

    /// Extensions from `flags` when any were passed, else from the config.
    pub fn extension_filter(&self, flags: &[String]) -> Result<ExtensionFilter> {
        let chosen: &[String] = if flags.is_empty() {
            &self.extensions
        } else {
            flags
        };
        if chosen.is_empty() {
            return Ok(ExtensionFilter::default());
        }
        Ok(ExtensionFilter::new(chosen)?)
    }

    pub fn open_options(&self) -> OpenOptions {
        OpenOptions {
            block_size: self.block_size,
            cache: self.cache.into(),
        }
    }
}
