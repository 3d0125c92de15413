//! Directory handles.

use crate::path_resolver;
use crate::{DirEntry, Driver, Entry, EntryType, File, FsError};

/// A directory within a driver's root.
///
/// A `Dir` holds no content of its own; it lists and creates children.
pub struct Dir<'d> {
    driver: &'d dyn Driver,
    path: String,
}

impl<'d> Dir<'d> {
    /// Handle for `path` on `driver`. The directory need not exist.
    pub fn new(driver: &'d dyn Driver, path: &str) -> Self {
        Self {
            driver,
            path: path_resolver::safepath(path),
        }
    }

    /// Names of the immediate children, sorted.
    pub fn entries(&self) -> Result<Vec<String>, FsError> {
        let mut names: Vec<String> = self
            .driver
            .list_children(&self.path)?
            .iter()
            .map(|child| path_resolver::basename(child).to_string())
            .collect();
        names.sort();
        Ok(names)
    }

    /// Typed handles for the immediate children, sorted by path.
    pub fn obj_entries(&self) -> Result<Vec<DirEntry<'d>>, FsError> {
        let mut children = Vec::new();
        for child in self.driver.list_children(&self.path)? {
            children.push(self.classify(&child)?);
        }
        Ok(children)
    }

    /// Typed handle for the child `name`, or `None` if nothing is there.
    pub fn child(&self, name: &str) -> Result<Option<DirEntry<'d>>, FsError> {
        let path = self.child_path(name);
        if !self.driver.exists(&path)? {
            return Ok(None);
        }
        self.classify(&path).map(Some)
    }

    /// Canonical path of the child `name`.
    pub fn child_path(&self, name: &str) -> String {
        path_resolver::join(&self.path, name)
    }

    /// File handle for the child `name`.
    pub fn file(&self, name: &str) -> Result<File<'d>, FsError> {
        File::new(self.driver, &self.child_path(name))
    }

    /// Directory handle for the child `name`.
    pub fn dir(&self, name: &str) -> Dir<'d> {
        Dir::new(self.driver, &self.child_path(name))
    }

    /// Ensure this directory and all of its ancestors exist.
    pub fn touch(&self) -> Result<(), FsError> {
        self.driver.mkpath(&self.path)
    }

    /// Remove this directory and everything below it.
    pub fn delete_tree(&self) -> Result<bool, FsError> {
        self.driver.delete_tree(&self.path)
    }

    fn classify(&self, path: &str) -> Result<DirEntry<'d>, FsError> {
        if self.driver.dir_exists(path)? {
            Ok(DirEntry::Dir(Dir::new(self.driver, path)))
        } else {
            File::new(self.driver, path).map(DirEntry::File)
        }
    }
}

impl<'d> Entry<'d> for Dir<'d> {
    fn kind(&self) -> EntryType {
        EntryType::Directory
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn driver(&self) -> &'d dyn Driver {
        self.driver
    }

    fn set_path(&mut self, path: String) {
        self.path = path;
    }
}

impl std::fmt::Debug for Dir<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dir")
            .field("protocol", &self.driver.info().protocol)
            .field("path", &self.path)
            .finish()
    }
}
