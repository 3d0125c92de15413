//! File handles and the localize-on-read, push-on-write discipline.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::path_resolver;
use crate::{CacheFile, CopyTarget, Driver, Entry, EntryType, FsError};

/// A file within a driver's root.
///
/// For drivers that are directly addressable, reads and writes go straight
/// to the host path. For remote drivers the file owns a private
/// [`CacheFile`]: reads localize it first (one download, until forced), and
/// every write or append is pushed back to the backend immediately.
///
/// The cache file is removed when the `File` is dropped.
pub struct File<'d> {
    driver: &'d dyn Driver,
    path: String,
    cache: Option<CacheFile>,
    localized: bool,
}

impl<'d> File<'d> {
    /// Handle for `path` on `driver`. The file need not exist.
    pub fn new(driver: &'d dyn Driver, path: &str) -> Result<Self, FsError> {
        let path = path_resolver::safepath(path);
        let cache = driver.cache_file(&path)?;
        Ok(Self {
            driver,
            path,
            cache,
            localized: false,
        })
    }

    /// Whether a current local copy is in place.
    pub fn is_localized(&self) -> bool {
        self.cache.is_none() || self.localized
    }

    /// Host path that local reads and writes use.
    pub fn local_path(&self) -> Result<PathBuf, FsError> {
        if let Some(cache) = &self.cache {
            return Ok(cache.path().to_path_buf());
        }
        self.driver
            .local_path(&self.path)
            .ok_or(FsError::NotSupported {
                operation: "local_path",
                protocol: self.driver.info().protocol,
            })
    }

    /// Materialize the local copy.
    ///
    /// A no-op when already localized unless `force` is set. Directly
    /// addressable drivers are always localized.
    ///
    /// # Errors
    ///
    /// - [`FsError::NotFound`] if the backend holds no such file
    /// - [`FsError::NotAFile`] if the path names a directory
    pub fn localize(&mut self, force: bool) -> Result<(), FsError> {
        if self.cache.is_none() || (self.localized && !force) {
            return Ok(());
        }
        if !self.driver.file_exists(&self.path)? {
            return Err(self.absent()?);
        }
        let local = self.local_path()?;
        ensure_parent(&local)?;
        self.driver.download(&self.path, &local)?;
        self.localized = true;
        debug!(path = %self.path, local = %local.display(), "localized");
        Ok(())
    }

    /// Push the local copy to the backend, creating the remote parent first.
    pub fn save_remote(&mut self) -> Result<(), FsError> {
        if self.cache.is_none() {
            return Ok(());
        }
        let local = self.local_path()?;
        self.driver.mkpath(&path_resolver::parent(&self.path))?;
        self.driver.upload(&local, &self.path)?;
        self.localized = true;
        debug!(path = %self.path, "pushed");
        Ok(())
    }

    /// Entire contents.
    pub fn read(&mut self) -> Result<Vec<u8>, FsError> {
        self.localize(false)?;
        let local = self.local_path()?;
        std::fs::read(&local).map_err(|e| self.io_error("read", &local, e))
    }

    /// Entire contents as UTF-8.
    pub fn read_to_string(&mut self) -> Result<String, FsError> {
        let bytes = self.read()?;
        String::from_utf8(bytes).map_err(|_| FsError::InvalidData {
            path: self.path.clone(),
            details: "not valid UTF-8".into(),
        })
    }

    /// Replace the contents with `data`, creating parents as needed.
    pub fn write(&mut self, data: &[u8]) -> Result<(), FsError> {
        let local = self.local_path()?;
        ensure_parent(&local)?;
        std::fs::write(&local, data).map_err(|e| self.io_error("write", &local, e))?;
        self.save_remote()
    }

    /// Add `data` to the end, creating the file if it does not exist.
    pub fn append(&mut self, data: &[u8]) -> Result<(), FsError> {
        let local = self.local_path()?;
        ensure_parent(&local)?;
        if !self.is_localized() {
            if self.driver.file_exists(&self.path)? {
                self.localize(false)?;
            } else {
                std::fs::write(&local, b"").map_err(|e| self.io_error("append", &local, e))?;
            }
        }
        std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&local)
            .and_then(|mut fd| fd.write_all(data))
            .map_err(|e| self.io_error("append", &local, e))?;
        self.save_remote()
    }

    /// Create an empty file unless one already exists.
    pub fn touch(&mut self) -> Result<(), FsError> {
        if self.driver.file_exists(&self.path)? {
            return Ok(());
        }
        self.write(b"")
    }

    /// Copy this file's contents to `target`.
    ///
    /// A [`CopyTarget::Dir`] receives a file with this file's name. File
    /// destinations are pushed to their own backend afterward.
    pub fn copy_to<'a, 'e>(&mut self, target: impl Into<CopyTarget<'a, 'e>>) -> Result<(), FsError>
    where
        'e: 'a,
    {
        self.localize(false)?;
        let source = self.local_path()?;
        match target.into() {
            CopyTarget::Path(dest) => copy_local(&source, dest).map_err(|e| self.io_error("copy", dest, e)),
            CopyTarget::File(dest) => dest.receive(&source),
            CopyTarget::Dir(dir) => dir.file(self.name())?.receive(&source),
        }
    }

    /// Replace this file's contents with those of `source` and push them.
    ///
    /// A [`CopyTarget::Dir`] supplies the file with this file's name.
    pub fn copy_from<'a, 'e>(&mut self, source: impl Into<CopyTarget<'a, 'e>>) -> Result<(), FsError>
    where
        'e: 'a,
    {
        match source.into() {
            CopyTarget::Path(src) => self.receive(src),
            CopyTarget::File(src) => {
                src.localize(false)?;
                let local = src.local_path()?;
                self.receive(&local)
            }
            CopyTarget::Dir(dir) => {
                let mut src = dir.file(self.name())?;
                src.localize(false)?;
                let local = src.local_path()?;
                self.receive(&local)
            }
        }
    }

    fn receive(&mut self, source: &Path) -> Result<(), FsError> {
        let local = self.local_path()?;
        if local != source {
            ensure_parent(&local)?;
            copy_local(source, &local).map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => FsError::NotFound {
                    path: source.display().to_string(),
                },
                _ => FsError::io("copy", source, e),
            })?;
        }
        self.save_remote()
    }

    fn absent(&self) -> Result<FsError, FsError> {
        let path = self.path.clone();
        if self.driver.dir_exists(&self.path)? {
            Ok(FsError::NotAFile { path })
        } else {
            Ok(FsError::NotFound { path })
        }
    }

    fn io_error(&self, operation: &'static str, local: &Path, error: io::Error) -> FsError {
        match error.kind() {
            io::ErrorKind::NotFound => FsError::NotFound {
                path: self.path.clone(),
            },
            io::ErrorKind::IsADirectory => FsError::NotAFile {
                path: self.path.clone(),
            },
            _ => FsError::io(operation, local, error),
        }
    }
}

impl<'d> Entry<'d> for File<'d> {
    fn kind(&self) -> EntryType {
        EntryType::File
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

    fn delete(&mut self) -> Result<bool, FsError> {
        let deleted = self.driver.delete(&self.path)?;
        if deleted {
            self.localized = false;
        }
        Ok(deleted)
    }
}

impl std::fmt::Debug for File<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("File")
            .field("protocol", &self.driver.info().protocol)
            .field("path", &self.path)
            .field("cache", &self.cache.as_ref().map(CacheFile::path))
            .field("localized", &self.localized)
            .finish()
    }
}

fn ensure_parent(local: &Path) -> Result<(), FsError> {
    match local.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent).map_err(|e| FsError::io("create_dir_all", parent, e))
        }
        _ => Ok(()),
    }
}

fn copy_local(from: &Path, to: &Path) -> io::Result<()> {
    std::fs::copy(from, to).map(|_| ())
}
