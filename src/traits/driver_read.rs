//! Query operations for storage drivers.

use std::time::SystemTime;

use crate::{DriverInfo, EntryType, FsError, Metadata, PathResolver};

/// Query operations for a storage driver.
///
/// Paths are caller-supplied strings; implementations pass them through
/// [`PathResolver`] before touching the backend.
///
/// # Absence
///
/// Existence checks answer `Ok(false)`, `None` or an empty listing when the target is
/// simply missing. `Err` is reserved for configuration failures and for
/// remote failures that survived a reconnect.
///
/// # Thread Safety
///
/// Drivers must be `Send` so one can be opened on one thread and handed to
/// another. They are not `Sync`: a driver serves one caller at a time.
///
/// # Object Safety
///
/// This trait is object-safe and can be used as `dyn DriverRead`.
pub trait DriverRead: Send {
    /// Static description of this driver.
    fn info(&self) -> &'static DriverInfo;

    /// Resolver bound to this driver's root.
    fn resolver(&self) -> &PathResolver;

    /// Check whether `path` names an existing file.
    fn file_exists(&self, path: &str) -> Result<bool, FsError>;

    /// Check whether `path` names an existing directory.
    fn dir_exists(&self, path: &str) -> Result<bool, FsError>;

    /// Check whether `path` names anything at all.
    fn exists(&self, path: &str) -> Result<bool, FsError> {
        Ok(self.file_exists(path)? || self.dir_exists(path)?)
    }

    /// Check whether `path` is a file and not a directory.
    fn is_file(&self, path: &str) -> Result<bool, FsError> {
        Ok(!self.dir_exists(path)? && self.file_exists(path)?)
    }

    /// Check whether `path` is a directory.
    fn is_dir(&self, path: &str) -> Result<bool, FsError> {
        self.dir_exists(path)
    }

    /// Size in bytes, or `None` when the backend cannot report one.
    fn size(&self, path: &str) -> Option<u64>;

    /// Last modification time, or `None` when the backend cannot report one.
    fn mod_time(&self, path: &str) -> Option<SystemTime>;

    /// Root-relative paths of the immediate children of `path`, sorted.
    ///
    /// A missing directory lists as empty.
    fn list_children(&self, path: &str) -> Result<Vec<String>, FsError>;

    /// Kind, size and modification time of `path`, or `None` if absent.
    fn metadata(&self, path: &str) -> Result<Option<Metadata>, FsError> {
        let kind = if self.dir_exists(path)? {
            EntryType::Directory
        } else if self.file_exists(path)? {
            EntryType::File
        } else {
            return Ok(None);
        };
        Ok(Some(Metadata {
            kind,
            size: self.size(path),
            modified: self.mod_time(path),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn driver_read_is_object_safe() {
        fn _check(_: &dyn DriverRead) {}
    }
}
