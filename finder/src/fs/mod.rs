//! Filesystem seam consumed by the finder.
//!
//! Implementations decide what a path means (local disk, a rebased subtree,
//! memory); the finder only lists directories and opens files for reading.

use std::io;
use std::io::Read;
use std::io::Seek;

use crate::path::FsPath;

mod memory;
mod native;
mod relative;

pub use memory::MemoryFileSystem;
pub use native::NativeFileSystem;
pub use relative::RelativeFileSystem;

/// 64 KiB: one MDF header fits with room to spare.
pub const DEFAULT_BLOCK_SIZE: usize = 64 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub path: FsPath,
    pub kind: EntryKind,
}

impl DirEntry {
    pub fn new(path: FsPath, kind: EntryKind) -> Self {
        Self { path, kind }
    }
}

/// How much of a file an implementation should pull in when opened.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CacheHint {
    /// Read straight from the source.
    None,
    /// Buffer reads in `block_size` chunks.
    #[default]
    ReadAhead,
    /// Load the whole file on open.
    Whole,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenOptions {
    pub block_size: usize,
    pub cache: CacheHint,
}

impl Default for OpenOptions {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            cache: CacheHint::default(),
        }
    }
}

/// An open file. Dropping the handle releases it.
pub trait FileHandle: Read + Seek + Send {}

impl<T: Read + Seek + Send> FileHandle for T {}

pub trait FileSystem: Send + Sync {
    /// Immediate children of `path`. Fails with [`io::ErrorKind::NotFound`]
    /// when `path` does not exist.
    fn list_directory(&self, path: &FsPath) -> io::Result<Vec<DirEntry>>;

    fn is_directory(&self, path: &FsPath) -> bool;

    fn is_file(&self, path: &FsPath) -> bool;

    fn open_for_read(&self, path: &FsPath, options: &OpenOptions) -> io::Result<Box<dyn FileHandle>>;
}

impl<T: FileSystem + ?Sized> FileSystem for &T {
    fn list_directory(&self, path: &FsPath) -> io::Result<Vec<DirEntry>> {
        (**self).list_directory(path)
    }

    fn is_directory(&self, path: &FsPath) -> bool {
        (**self).is_directory(path)
    }

    fn is_file(&self, path: &FsPath) -> bool {
        (**self).is_file(path)
    }

    fn open_for_read(&self, path: &FsPath, options: &OpenOptions) -> io::Result<Box<dyn FileHandle>> {
        (**self).open_for_read(path, options)
    }
}
