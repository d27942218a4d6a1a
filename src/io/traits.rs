//! I/O seams of the engine.
//!
//! Analysis only touches the disk through [`FileSystem`], so tests can run
//! against an in-memory tree and inject read failures.

use crate::core::Error;
use std::path::Path;

/// Read-only file access used during analysis.
///
/// Implementations are shared across rayon workers and must be
/// `Send + Sync`.
pub trait FileSystem: Send + Sync {
    /// Read a file's raw contents.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FileRead`] when the file is missing or unreadable.
    fn read_bytes(&self, path: &Path) -> Result<Vec<u8>, Error>;

    /// Read a file as UTF-8.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FileRead`] when the file cannot be read or is not
    /// valid UTF-8.
    fn read_to_string(&self, path: &Path) -> Result<String, Error> {
        let bytes = self.read_bytes(path)?;
        String::from_utf8(bytes).map_err(|e| {
            Error::file_read(path, std::io::Error::new(std::io::ErrorKind::InvalidData, e))
        })
    }

    fn exists(&self, path: &Path) -> bool;

    fn is_dir(&self, path: &Path) -> bool;
}

impl<F: FileSystem + ?Sized> FileSystem for &F {
    fn read_bytes(&self, path: &Path) -> Result<Vec<u8>, Error> {
        (**self).read_bytes(path)
    }

    fn exists(&self, path: &Path) -> bool {
        (**self).exists(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        (**self).is_dir(path)
    }
}
