//! In-memory [`FileSystem`] for tests.

use crate::core::Error;
use crate::io::traits::FileSystem;
use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::{Path, PathBuf};

/// A file tree held in memory, with optional per-path read failures.
///
/// A directory exists when it was added with [`with_dir`](Self::with_dir)
/// or when any file lies beneath it.
///
/// ```rust
/// use dimap::io::FileSystem;
/// use dimap::testkit::MemoryFileSystem;
/// use std::path::Path;
///
/// let fs = MemoryFileSystem::new()
///     .with_file("/repo/Program.cs", "services.AddSingleton<IClock, Clock>();")
///     .with_failure("/repo/Locked.cs", "permission denied");
///
/// assert!(fs.is_dir(Path::new("/repo")));
/// assert!(fs.read_to_string(Path::new("/repo/Program.cs")).is_ok());
/// assert!(fs.read_to_string(Path::new("/repo/Locked.cs")).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryFileSystem {
    files: BTreeMap<PathBuf, Vec<u8>>,
    failures: BTreeMap<PathBuf, String>,
    dirs: BTreeSet<PathBuf>,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.with_bytes(path, content.into().into_bytes())
    }

    pub fn with_bytes(mut self, path: impl Into<PathBuf>, content: Vec<u8>) -> Self {
        self.files.insert(path.into(), content);
        self
    }

    /// Reading `path` fails with `message`.
    pub fn with_failure(mut self, path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        self.failures.insert(path.into(), message.into());
        self
    }

    pub fn with_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.dirs.insert(path.into());
        self
    }

    /// Every file and failing path, sorted.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.files
            .keys()
            .chain(self.failures.keys())
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

impl FileSystem for MemoryFileSystem {
    fn read_bytes(&self, path: &Path) -> Result<Vec<u8>, Error> {
        if let Some(message) = self.failures.get(path) {
            return Err(Error::file_read(
                path,
                io::Error::new(io::ErrorKind::PermissionDenied, message.clone()),
            ));
        }
        self.files.get(path).cloned().ok_or_else(|| {
            Error::file_read(
                path,
                io::Error::new(io::ErrorKind::NotFound, "no such file"),
            )
        })
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(path) || self.failures.contains_key(path) || self.is_dir(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.dirs.contains(path)
            || self
                .files
                .keys()
                .chain(self.failures.keys())
                .any(|file| file != path && file.starts_with(path))
    }
}
