use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::io;
use std::io::Cursor;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use super::DirEntry;
use super::EntryKind;
use super::FileHandle;
use super::FileSystem;
use super::OpenOptions;
use crate::path::FsPath;

#[derive(Debug, Default)]
struct Tree {
    directories: BTreeSet<FsPath>,
    files: BTreeMap<FsPath, Arc<Vec<u8>>>,
}

/// In-memory tree that records how it is accessed.
///
/// Paths are stored exactly as added (after normalization), so a tree built
/// from `/a/b` is listed from `/`, and one built from `a/b` from `""`. Parent
/// directories are created implicitly.
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
    tree: Mutex<Tree>,
    opened: Mutex<Vec<FsPath>>,
    listings: AtomicUsize,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&self, path: impl Into<FsPath>, contents: Vec<u8>) {
        let path = path.into();
        let mut tree = lock(&self.tree);
        if let Some(parent) = path.parent() {
            add_directory_chain(&mut tree, parent);
        }
        tree.files.insert(path, Arc::new(contents));
    }

    pub fn add_directory(&self, path: impl Into<FsPath>) {
        add_directory_chain(&mut lock(&self.tree), path.into());
    }

    pub fn remove(&self, path: impl Into<FsPath>) {
        let path = path.into();
        let mut tree = lock(&self.tree);
        tree.files
            .retain(|candidate, _| candidate != &path && candidate.strip_prefix(&path).is_none());
        tree.directories
            .retain(|candidate| candidate != &path && candidate.strip_prefix(&path).is_none());
    }

    /// Number of successful `open_for_read` calls.
    pub fn open_count(&self) -> usize {
        lock(&self.opened).len()
    }

    /// Paths passed to successful `open_for_read` calls, in call order.
    pub fn opened_paths(&self) -> Vec<FsPath> {
        lock(&self.opened).clone()
    }

    /// Number of `list_directory` calls, including failed ones.
    pub fn listing_count(&self) -> usize {
        self.listings.load(Ordering::Relaxed)
    }

    pub fn reset_counters(&self) {
        lock(&self.opened).clear();
        self.listings.store(0, Ordering::Relaxed);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}

fn add_directory_chain(tree: &mut Tree, mut dir: FsPath) {
    while !dir.is_root() {
        let parent = dir.parent();
        tree.directories.insert(dir);
        match parent {
            Some(parent) => dir = parent,
            None => break,
        }
    }
}

fn not_found(path: &FsPath) -> io::Error {
    io::Error::new(io::ErrorKind::NotFound, format!("{path} does not exist"))
}

impl FileSystem for MemoryFileSystem {
    fn list_directory(&self, path: &FsPath) -> io::Result<Vec<DirEntry>> {
        self.listings.fetch_add(1, Ordering::Relaxed);
        let tree = lock(&self.tree);
        if !path.is_root() && !tree.directories.contains(path) {
            return Err(not_found(path));
        }
        let is_child = |candidate: &FsPath| candidate.parent().as_ref() == Some(path);
        let directories = tree
            .directories
            .iter()
            .filter(|dir| is_child(dir))
            .map(|dir| DirEntry::new(dir.clone(), EntryKind::Directory));
        let files = tree
            .files
            .keys()
            .filter(|file| is_child(file))
            .map(|file| DirEntry::new(file.clone(), EntryKind::File));
        Ok(directories.chain(files).collect())
    }

    fn is_directory(&self, path: &FsPath) -> bool {
        path.is_root() || lock(&self.tree).directories.contains(path)
    }

    fn is_file(&self, path: &FsPath) -> bool {
        lock(&self.tree).files.contains_key(path)
    }

    fn open_for_read(&self, path: &FsPath, _options: &OpenOptions) -> io::Result<Box<dyn FileHandle>> {
        let contents = lock(&self.tree)
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| not_found(path))?;
        lock(&self.opened).push(path.clone());
        Ok(Box::new(Cursor::new(contents.as_ref().clone())))
    }
}
