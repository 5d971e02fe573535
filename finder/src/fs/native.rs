use std::fs::File;
use std::io;
use std::io::BufReader;
use std::io::Cursor;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;

use tracing::trace;

use super::CacheHint;
use super::DirEntry;
use super::EntryKind;
use super::FileHandle;
use super::FileSystem;
use super::OpenOptions;
use crate::path::FsPath;

/// The local disk, addressed by absolute paths with forward slashes.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeFileSystem;

impl NativeFileSystem {
    pub fn new() -> Self {
        Self
    }

    /// Renders a native path in this filesystem's namespace.
    pub fn fs_path(path: &Path) -> FsPath {
        FsPath::new(path.to_string_lossy().replace('\\', "/"))
    }

    fn native_path(path: &FsPath) -> PathBuf {
        PathBuf::from(path.as_str())
    }
}

impl FileSystem for NativeFileSystem {
    fn list_directory(&self, path: &FsPath) -> io::Result<Vec<DirEntry>> {
        let mut entries = Vec::new();
        for entry in std::fs::read_dir(Self::native_path(path))? {
            let entry = entry?;
            // Follow symlinks so a linked session directory lists as a directory.
            let kind = match std::fs::metadata(entry.path()) {
                Ok(meta) if meta.is_dir() => EntryKind::Directory,
                Ok(meta) if meta.is_file() => EntryKind::File,
                Ok(_) => EntryKind::Other,
                Err(err) => {
                    trace!("cannot stat {}: {err}", entry.path().display());
                    EntryKind::Other
                }
            };
            entries.push(DirEntry::new(Self::fs_path(&entry.path()), kind));
        }
        Ok(entries)
    }

    fn is_directory(&self, path: &FsPath) -> bool {
        Self::native_path(path).is_dir()
    }

    fn is_file(&self, path: &FsPath) -> bool {
        Self::native_path(path).is_file()
    }

    fn open_for_read(&self, path: &FsPath, options: &OpenOptions) -> io::Result<Box<dyn FileHandle>> {
        let file = File::open(Self::native_path(path))?;
        Ok(match options.cache {
            CacheHint::None => Box::new(file),
            CacheHint::ReadAhead => Box::new(BufReader::with_capacity(options.block_size.max(1), file)),
            CacheHint::Whole => {
                let mut bytes = Vec::new();
                BufReader::with_capacity(options.block_size.max(1), file).read_to_end(&mut bytes)?;
                Box::new(Cursor::new(bytes))
            }
        })
    }
}
