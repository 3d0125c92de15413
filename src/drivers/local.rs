//! Local filesystem driver.
//!
//! Every operation maps one-to-one onto the host filesystem below `root`.
//! The host copy is the source of truth, so entries never localize.

use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::debug;

use crate::path_resolver::{self, SEPARATOR};
use crate::{
    CacheFile, DriverCache, DriverInfo, DriverRead, DriverWrite, FsError, LocalConfig, PathResolver,
};

/// Driver for a local or network-mounted directory.
///
/// # Example
///
/// ```rust,no_run
/// use anyfs_drivers::{DriverExt, LocalDriver};
///
/// let driver = LocalDriver::new("/mnt/share").unwrap();
/// let mut report = driver.file("/reports/today.txt").unwrap();
/// report.write(b"all green").unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct LocalDriver {
    root: PathBuf,
    resolver: PathResolver,
}

impl LocalDriver {
    /// Registry metadata.
    pub const INFO: DriverInfo = DriverInfo {
        protocol: "NFS",
        description: "Local or network-mounted filesystem",
        local: true,
    };

    /// Driver rooted at the existing directory `root`.
    ///
    /// # Errors
    ///
    /// - [`FsError::InvalidRoot`] if `root` is missing or not a directory
    pub fn new(root: impl AsRef<Path>) -> Result<Self, FsError> {
        let root = root.as_ref();
        let invalid = |reason: String| FsError::InvalidRoot {
            root: root.display().to_string(),
            reason,
        };
        if !root.is_dir() {
            return Err(invalid("not an existing directory".into()));
        }
        let root = root.canonicalize().map_err(|e| invalid(e.to_string()))?;
        let resolver = PathResolver::new(&root.to_string_lossy());
        debug!(root = %root.display(), "opened local driver");
        Ok(Self { root, resolver })
    }

    /// Driver built from a [`LocalConfig`].
    pub fn from_config(config: &LocalConfig) -> Result<Self, FsError> {
        Self::new(&config.root)
    }

    /// Canonical host root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Host path for the root-relative `path`.
    pub fn host_path(&self, path: &str) -> PathBuf {
        let safe = path_resolver::safepath(path);
        let relative = safe.trim_start_matches(SEPARATOR);
        if relative.is_empty() {
            self.root.clone()
        } else {
            self.root.join(relative)
        }
    }

    fn refused(operation: &'static str, path: &str, error: &io::Error) -> bool {
        debug!(operation, path, error = %error, "backend refused");
        false
    }
}

impl DriverRead for LocalDriver {
    fn info(&self) -> &'static DriverInfo {
        &Self::INFO
    }

    fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    fn file_exists(&self, path: &str) -> Result<bool, FsError> {
        Ok(self.host_path(path).is_file())
    }

    fn dir_exists(&self, path: &str) -> Result<bool, FsError> {
        Ok(self.host_path(path).is_dir())
    }

    fn size(&self, path: &str) -> Option<u64> {
        std::fs::metadata(self.host_path(path)).ok().map(|m| m.len())
    }

    fn mod_time(&self, path: &str) -> Option<SystemTime> {
        std::fs::metadata(self.host_path(path))
            .and_then(|m| m.modified())
            .ok()
    }

    fn list_children(&self, path: &str) -> Result<Vec<String>, FsError> {
        let dir = path_resolver::safepath(path);
        let host = self.host_path(&dir);
        let entries = match std::fs::read_dir(&host) {
            Ok(entries) => entries,
            Err(e) if matches!(e.kind(), io::ErrorKind::NotFound | io::ErrorKind::NotADirectory) => {
                return Ok(Vec::new());
            }
            Err(e) => return Err(FsError::io("read_dir", host, e)),
        };
        let mut children = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| FsError::io("read_dir", &host, e))?;
            children.push(path_resolver::join(&dir, &entry.file_name().to_string_lossy()));
        }
        children.sort();
        Ok(children)
    }
}

impl DriverWrite for LocalDriver {
    fn delete(&self, path: &str) -> Result<bool, FsError> {
        let host = self.host_path(path);
        if host == self.root {
            return Ok(false);
        }
        let result = match std::fs::symlink_metadata(&host) {
            Ok(meta) if meta.is_dir() => std::fs::remove_dir(&host),
            Ok(_) => std::fs::remove_file(&host),
            Err(_) => return Ok(false),
        };
        Ok(result.map_or_else(|e| Self::refused("delete", path, &e), |()| true))
    }

    fn delete_tree(&self, path: &str) -> Result<bool, FsError> {
        let host = self.host_path(path);
        if host == self.root {
            return Ok(false);
        }
        let result = match std::fs::symlink_metadata(&host) {
            Ok(meta) if meta.is_dir() => std::fs::remove_dir_all(&host),
            Ok(_) => std::fs::remove_file(&host),
            Err(_) => return Ok(false),
        };
        Ok(result.map_or_else(|e| Self::refused("delete_tree", path, &e), |()| true))
    }

    fn mkdir(&self, path: &str) -> Result<bool, FsError> {
        Ok(std::fs::create_dir(self.host_path(path))
            .map_or_else(|e| Self::refused("mkdir", path, &e), |()| true))
    }

    fn rename(&self, from: &str, to: &str) -> Result<bool, FsError> {
        let source = self.host_path(from);
        if source == self.root || std::fs::symlink_metadata(&source).is_err() {
            return Ok(false);
        }
        Ok(std::fs::rename(&source, self.host_path(to))
            .map_or_else(|e| Self::refused("rename", from, &e), |()| true))
    }
}

impl DriverCache for LocalDriver {
    fn local_path(&self, path: &str) -> Option<PathBuf> {
        Some(self.host_path(path))
    }

    fn cache_file(&self, _path: &str) -> Result<Option<CacheFile>, FsError> {
        Ok(None)
    }

    fn download(&self, _path: &str, _local: &Path) -> Result<(), FsError> {
        Err(FsError::NotSupported {
            operation: "download",
            protocol: Self::INFO.protocol,
        })
    }

    fn upload(&self, _local: &Path, _path: &str) -> Result<(), FsError> {
        Err(FsError::NotSupported {
            operation: "upload",
            protocol: Self::INFO.protocol,
        })
    }
}
