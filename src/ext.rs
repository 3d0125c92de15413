//! # Extension Traits
//!
//! Entry factories for drivers.
//!
//! ## Overview
//!
//! [`DriverExt`] turns a driver into [`File`] and [`Dir`] handles. It is
//! implemented for every driver in this crate and for `dyn Driver`, so a
//! boxed driver from the registry offers the same factories as a concrete one.
//!
//! ## Available Methods
//!
//! | Method | Description |
//! |--------|-------------|
//! | [`file`](DriverExt::file) | File handle for a path |
//! | [`dir`](DriverExt::dir) | Directory handle for a path |
//! | [`move_entry`](DriverExt::move_entry) | Move an entry under another directory |

use crate::drivers::{FtpsDriver, LocalDriver};
use crate::{Dir, Driver, Entry, File, FsError};

/// Entry factories available on every driver.
///
/// # Example
///
/// ```rust,no_run
/// use anyfs_drivers::{DriverExt, FsError, LocalDriver};
///
/// fn greet(driver: &LocalDriver) -> Result<(), FsError> {
///     driver.dir("/").touch()?;
///     driver.file("/x/y.txt")?.write(b"hello")?;
///     assert_eq!(driver.file("/x/y.txt")?.read()?, b"hello");
///     assert!(driver.dir("/x").entries()?.contains(&"y.txt".to_string()));
///     Ok(())
/// }
/// ```
pub trait DriverExt {
    /// This driver as a trait object.
    fn as_driver(&self) -> &dyn Driver;

    /// File handle for `path`. Existence is not checked.
    fn file(&self, path: &str) -> Result<File<'_>, FsError> {
        File::new(self.as_driver(), path)
    }

    /// Directory handle for `path`. Existence is not checked.
    fn dir(&self, path: &str) -> Dir<'_> {
        Dir::new(self.as_driver(), path)
    }

    /// Move `entry` under `new_dir` and return its new path.
    ///
    /// See [`Entry::move_to`].
    fn move_entry<'d, E: Entry<'d>>(&self, entry: &mut E, new_dir: &str) -> Result<String, FsError> {
        entry.move_to(new_dir)
    }
}

impl DriverExt for dyn Driver + '_ {
    fn as_driver(&self) -> &dyn Driver {
        self
    }
}

impl DriverExt for LocalDriver {
    fn as_driver(&self) -> &dyn Driver {
        self
    }
}

impl DriverExt for FtpsDriver {
    fn as_driver(&self) -> &dyn Driver {
        self
    }
}
