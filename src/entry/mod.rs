//! # Entries
//!
//! `File` and `Dir` handles bound to a driver.
//!
//! An entry is a `(path, driver)` pair. It borrows its driver and never
//! assumes the path exists; every query goes back to the backend. Entries
//! are cheap views: drop them and ask the driver for new ones at will.
//!
//! Renaming or moving an entry rewrites the path of that same handle.
//!
//! ```rust,no_run
//! use anyfs_drivers::{DriverExt, Entry, FsError, LocalDriver};
//!
//! fn rotate(driver: &LocalDriver) -> Result<(), FsError> {
//!     let mut log = driver.file("/logs/app.log")?;
//!     log.append(b"shutting down\n")?;
//!     log.move_to("archive")?;
//!     assert_eq!(log.path(), "/logs/archive/app.log");
//!     Ok(())
//! }
//! ```

mod dir;
mod file;

use std::path::Path;

use crate::path_resolver::{self, ROOT, SEPARATOR};
use crate::{Driver, EntryType, FsError, Metadata};

pub use dir::Dir;
pub use file::File;

/// Operations available on any entry regardless of backend.
pub trait Entry<'d> {
    /// Whether this handle names a file or a directory.
    fn kind(&self) -> EntryType;

    /// Canonical root-relative path.
    fn path(&self) -> &str;

    /// The driver serving this entry.
    fn driver(&self) -> &'d dyn Driver;

    /// Replace the path after a successful rename or move.
    #[doc(hidden)]
    fn set_path(&mut self, path: String);

    /// Final path segment; empty for the root.
    fn name(&self) -> &str {
        path_resolver::basename(self.path())
    }

    /// Directory containing this entry. The root is its own parent.
    fn parent(&self) -> Dir<'d> {
        Dir::new(self.driver(), &path_resolver::parent(self.path()))
    }

    /// Check whether the backend holds an object of this entry's kind.
    fn exists(&self) -> Result<bool, FsError> {
        match self.kind() {
            EntryType::File => self.driver().file_exists(self.path()),
            EntryType::Directory => self.driver().dir_exists(self.path()),
        }
    }

    /// Remove the object. `Ok(false)` if it was absent or the backend refused.
    fn delete(&mut self) -> Result<bool, FsError> {
        self.driver().delete(self.path())
    }

    /// Size and modification time as reported by the backend.
    fn metadata(&self) -> Metadata {
        Metadata {
            kind: self.kind(),
            size: self.driver().size(self.path()),
            modified: self.driver().mod_time(self.path()),
        }
    }

    /// Rename within the same parent directory and return the new path.
    ///
    /// # Errors
    ///
    /// - [`FsError::InvalidArgument`] if `new_name` is not a single segment
    /// - [`FsError::NotFound`] if the backend had nothing to rename
    fn rename(&mut self, new_name: &str) -> Result<String, FsError> {
        if new_name.is_empty() || new_name.contains(SEPARATOR) || new_name == "." || new_name == ".." {
            return Err(FsError::InvalidArgument {
                operation: "rename",
                reason: format!("{new_name:?} is not a single path segment"),
            });
        }
        let target = path_resolver::join(&path_resolver::parent(self.path()), new_name);
        relocate(self, "rename", target)
    }

    /// Move under `new_dir`, creating it first if needed, and return the new
    /// path. A relative `new_dir` is resolved against the current parent.
    ///
    /// # Errors
    ///
    /// - [`FsError::NotFound`] if the backend had nothing to move
    fn move_to(&mut self, new_dir: &str) -> Result<String, FsError> {
        let dir = if new_dir.starts_with(SEPARATOR) {
            path_resolver::safepath(new_dir)
        } else {
            path_resolver::join(&path_resolver::parent(self.path()), new_dir)
        };
        self.driver().mkpath(&dir)?;
        let target = path_resolver::join(&dir, self.name());
        relocate(self, "move", target)
    }
}

fn relocate<'d, E: Entry<'d> + ?Sized>(
    entry: &mut E,
    operation: &'static str,
    target: String,
) -> Result<String, FsError> {
    if entry.path() == ROOT {
        return Err(FsError::InvalidArgument {
            operation,
            reason: "the root cannot be relocated".into(),
        });
    }
    if target == entry.path() {
        return Ok(target);
    }
    if !entry.driver().rename(entry.path(), &target)? {
        return Err(FsError::NotFound {
            path: entry.path().to_string(),
        });
    }
    entry.set_path(target.clone());
    Ok(target)
}

/// A typed child of a directory.
pub enum DirEntry<'d> {
    /// A file child.
    File(File<'d>),
    /// A directory child.
    Dir(Dir<'d>),
}

impl<'d> DirEntry<'d> {
    /// Kind of the child.
    pub fn kind(&self) -> EntryType {
        match self {
            DirEntry::File(_) => EntryType::File,
            DirEntry::Dir(_) => EntryType::Directory,
        }
    }

    /// Canonical root-relative path of the child.
    pub fn path(&self) -> &str {
        match self {
            DirEntry::File(file) => file.path(),
            DirEntry::Dir(dir) => dir.path(),
        }
    }

    /// Final path segment of the child.
    pub fn name(&self) -> &str {
        path_resolver::basename(self.path())
    }

    /// The file handle, if this child is a file.
    pub fn into_file(self) -> Option<File<'d>> {
        match self {
            DirEntry::File(file) => Some(file),
            DirEntry::Dir(_) => None,
        }
    }

    /// The directory handle, if this child is a directory.
    pub fn into_dir(self) -> Option<Dir<'d>> {
        match self {
            DirEntry::Dir(dir) => Some(dir),
            DirEntry::File(_) => None,
        }
    }
}

impl std::fmt::Debug for DirEntry<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DirEntry::File(file) => f.debug_tuple("File").field(&file.path()).finish(),
            DirEntry::Dir(dir) => f.debug_tuple("Dir").field(&dir.path()).finish(),
        }
    }
}

/// Source or destination of a file copy.
///
/// A `Dir` target stands for the file with the same name as the other side
/// of the copy, inside that directory.
pub enum CopyTarget<'a, 'd> {
    /// A plain host path, outside any driver.
    Path(&'a Path),
    /// Another file entry, possibly on another driver.
    File(&'a mut File<'d>),
    /// A directory entry, possibly on another driver.
    Dir(&'a Dir<'d>),
}

impl<'a> From<&'a Path> for CopyTarget<'a, '_> {
    fn from(path: &'a Path) -> Self {
        CopyTarget::Path(path)
    }
}

impl<'a, 'd> From<&'a mut File<'d>> for CopyTarget<'a, 'd> {
    fn from(file: &'a mut File<'d>) -> Self {
        CopyTarget::File(file)
    }
}

impl<'a, 'd> From<&'a Dir<'d>> for CopyTarget<'a, 'd> {
    fn from(dir: &'a Dir<'d>) -> Self {
        CopyTarget::Dir(dir)
    }
}
