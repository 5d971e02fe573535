//! Sorted, extension-filtered directory listings.

use std::collections::BTreeSet;

use tracing::warn;

use crate::error::FinderError;
use crate::error::Result;
use crate::fs::EntryKind;
use crate::fs::FileSystem;
use crate::path::FsPath;

pub const DEFAULT_EXTENSION: &str = "mf4";

/// Case-insensitive set of accepted file extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionFilter {
    extensions: BTreeSet<String>,
}

impl ExtensionFilter {
    /// Accepts extensions with or without a leading dot. At least one
    /// non-empty extension is required.
    pub fn new<I, S>(extensions: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut folded = BTreeSet::new();
        for extension in extensions {
            let extension = extension.as_ref().trim().trim_start_matches('.');
            if extension.is_empty() {
                return Err(FinderError::InvalidArgument(
                    "file extensions must not be empty".to_string(),
                ));
            }
            folded.insert(extension.to_lowercase());
        }
        if folded.is_empty() {
            return Err(FinderError::InvalidArgument(
                "at least one file extension is required".to_string(),
            ));
        }
        Ok(Self { extensions: folded })
    }

    pub fn matches(&self, path: &FsPath) -> bool {
        path.extension()
            .is_some_and(|ext| self.extensions.contains(&ext.to_lowercase()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.extensions.iter().map(String::as_str)
    }
}

impl Default for ExtensionFilter {
    fn default() -> Self {
        Self {
            extensions: BTreeSet::from([DEFAULT_EXTENSION.to_string()]),
        }
    }
}

/// Lists the entries of `path` of kind `want`, sorted ascending.
///
/// With a filter, only entries whose extension matches are kept. A directory
/// that does not exist is reported as [`FinderError::NotFound`] so callers
/// can tell it apart from an empty one.
pub fn list_entries(
    fs: &dyn FileSystem,
    path: &FsPath,
    want: EntryKind,
    extensions: Option<&ExtensionFilter>,
) -> Result<Vec<FsPath>> {
    let entries = fs
        .list_directory(path)
        .map_err(|err| FinderError::from_io(path, err))?;

    let mut selected: Vec<FsPath> = entries
        .into_iter()
        .filter(|entry| {
            if entry.kind == EntryKind::Other {
                warn!("ignoring {} of unknown kind", entry.path);
            }
            entry.kind == want
        })
        .map(|entry| entry.path)
        .filter(|path| extensions.is_none_or(|filter| filter.matches(path)))
        .collect();
    selected.sort();
    Ok(selected)
}

pub fn list_directories(fs: &dyn FileSystem, path: &FsPath) -> Result<Vec<FsPath>> {
    list_entries(fs, path, EntryKind::Directory, None)
}

pub fn list_files(
    fs: &dyn FileSystem,
    path: &FsPath,
    extensions: &ExtensionFilter,
) -> Result<Vec<FsPath>> {
    list_entries(fs, path, EntryKind::File, Some(extensions))
}
