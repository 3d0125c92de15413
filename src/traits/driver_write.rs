//! Mutating operations for storage drivers.

use crate::path_resolver::{self, SEPARATOR};
use crate::{DriverRead, FsError};

/// Mutating operations for a storage driver.
///
/// Boolean results report whether the backend carried out the change. A
/// missing target or a refusal by the backend yields `Ok(false)`.
///
/// # Object Safety
///
/// This trait is object-safe and can be used as `dyn DriverWrite`.
pub trait DriverWrite: DriverRead {
    /// Remove a file, or an empty directory.
    fn delete(&self, path: &str) -> Result<bool, FsError>;

    /// Remove a file, or a directory with everything below it.
    fn delete_tree(&self, path: &str) -> Result<bool, FsError>;

    /// Create a single directory; its parent must exist.
    fn mkdir(&self, path: &str) -> Result<bool, FsError>;

    /// Create a directory and every missing ancestor, top-down.
    ///
    /// Idempotent: succeeds if the directory already exists.
    ///
    /// # Errors
    ///
    /// - [`FsError::NotADirectory`] if an ancestor exists and is not a
    ///   directory, or a level could not be created
    fn mkpath(&self, path: &str) -> Result<(), FsError> {
        let target = path_resolver::safepath(path);
        let mut current = String::new();
        for segment in target.split(SEPARATOR).filter(|s| !s.is_empty()) {
            current.push(SEPARATOR);
            current.push_str(segment);
            if self.dir_exists(&current)? {
                continue;
            }
            if !self.mkdir(&current)? && !self.dir_exists(&current)? {
                return Err(FsError::NotADirectory { path: current });
            }
        }
        Ok(())
    }

    /// Rename `from` to `to`. Both are root-relative; the parent of `to`
    /// must exist.
    fn rename(&self, from: &str, to: &str) -> Result<bool, FsError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn driver_write_is_object_safe() {
        fn _check(_: &dyn DriverWrite) {}
    }
}
