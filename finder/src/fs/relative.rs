use std::io;
use std::path::Path;

use super::DirEntry;
use super::FileHandle;
use super::FileSystem;
use super::NativeFileSystem;
use super::OpenOptions;
use crate::path::FsPath;

/// Presents the subtree of `inner` under `base` as its own namespace.
///
/// Caller paths are joined onto `base` before reaching `inner`, and listed
/// entries are rebased back. The mapping is a pure prefix swap, so it keeps
/// the lexicographic order of names intact.
#[derive(Debug, Clone)]
pub struct RelativeFileSystem<F> {
    inner: F,
    base: FsPath,
    paths_with_leading_slash: bool,
}

impl<F: FileSystem> RelativeFileSystem<F> {
    pub fn new(inner: F, base: FsPath) -> Self {
        Self {
            inner,
            base,
            paths_with_leading_slash: false,
        }
    }

    /// Present listed paths as `/device/session/file` instead of
    /// `device/session/file`.
    pub fn with_leading_slash(mut self, enabled: bool) -> Self {
        self.paths_with_leading_slash = enabled;
        self
    }

    pub fn base(&self) -> &FsPath {
        &self.base
    }

    pub fn inner(&self) -> &F {
        &self.inner
    }

    /// Caller path to the path understood by `inner`.
    pub fn translate_forward(&self, path: &FsPath) -> FsPath {
        self.base.join(path.as_str())
    }

    /// Path reported by `inner` back to the caller's namespace.
    pub fn translate_reverse(&self, path: &FsPath) -> io::Result<FsPath> {
        let relative = path.strip_prefix(&self.base).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("{path} is outside of {}", self.base),
            )
        })?;
        if self.paths_with_leading_slash {
            Ok(FsPath::root().join(relative.as_str()))
        } else {
            Ok(relative)
        }
    }
}

impl RelativeFileSystem<NativeFileSystem> {
    /// Local directory tree rooted at `base`, with leading-slash paths.
    pub fn local(base: impl AsRef<Path>) -> Self {
        let base = base.as_ref();
        let absolute = std::path::absolute(base).unwrap_or_else(|_| base.to_path_buf());
        Self::new(NativeFileSystem, NativeFileSystem::fs_path(&absolute)).with_leading_slash(true)
    }
}

impl<F: FileSystem> FileSystem for RelativeFileSystem<F> {
    fn list_directory(&self, path: &FsPath) -> io::Result<Vec<DirEntry>> {
        self.inner
            .list_directory(&self.translate_forward(path))?
            .into_iter()
            .map(|entry| {
                Ok(DirEntry::new(
                    self.translate_reverse(&entry.path)?,
                    entry.kind,
                ))
            })
            .collect()
    }

    fn is_directory(&self, path: &FsPath) -> bool {
        self.inner.is_directory(&self.translate_forward(path))
    }

    fn is_file(&self, path: &FsPath) -> bool {
        self.inner.is_file(&self.translate_forward(path))
    }

    fn open_for_read(&self, path: &FsPath, options: &OpenOptions) -> io::Result<Box<dyn FileHandle>> {
        self.inner.open_for_read(&self.translate_forward(path), options)
    }
}
