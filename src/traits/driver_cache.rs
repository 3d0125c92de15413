//! Localization hooks for storage drivers.

use std::path::{Path, PathBuf};

use crate::{CacheFile, FsError};

/// Hooks that let [`File`](crate::File) entries work on local bytes.
///
/// Local drivers expose each path directly through
/// [`local_path`](Self::local_path). Remote drivers return `None` there and
/// instead hand out a private [`CacheFile`] per entry, which
/// [`download`](Self::download) fills and [`upload`](Self::upload) pushes back.
///
/// # Object Safety
///
/// This trait is object-safe and can be used as `dyn DriverCache`.
pub trait DriverCache {
    /// Host path for `path` when the backend is directly addressable.
    fn local_path(&self, path: &str) -> Option<PathBuf>;

    /// Allocate a private cache file for a file entry at `path`.
    ///
    /// Returns `Ok(None)` for drivers that need no localization.
    fn cache_file(&self, path: &str) -> Result<Option<CacheFile>, FsError>;

    /// Copy the backend object at `path` into `local`.
    ///
    /// # Errors
    ///
    /// - [`FsError::NotSupported`] for drivers that need no localization
    fn download(&self, path: &str, local: &Path) -> Result<(), FsError>;

    /// Copy `local` over the backend object at `path`.
    ///
    /// # Errors
    ///
    /// - [`FsError::NotSupported`] for drivers that need no localization
    fn upload(&self, local: &Path, path: &str) -> Result<(), FsError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn driver_cache_is_object_safe() {
        fn _check(_: &dyn DriverCache) {}
    }
}
