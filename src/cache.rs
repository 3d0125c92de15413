//! Private local cache files for remote file entries.

use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

/// A local shadow file owned by exactly one [`File`](crate::File) entry.
///
/// The file is removed when the guard is dropped. Removal only happens in
/// the process that created the guard, so a forked child that inherited the
/// entry never deletes its parent's cache.
#[derive(Debug)]
pub struct CacheFile {
    path: PathBuf,
    owner: u32,
    prune_to: Option<PathBuf>,
}

impl CacheFile {
    /// Takes ownership of `path`. Nothing is created on disk yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            owner: std::process::id(),
            prune_to: None,
        }
    }

    /// On drop, also remove the directories between the file and `dir`
    /// that are left empty. `dir` itself is kept.
    pub fn pruning_up_to(mut self, dir: impl Into<PathBuf>) -> Self {
        self.prune_to = Some(dir.into());
        self
    }

    /// Host path of the cache file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for CacheFile {
    fn drop(&mut self) {
        if std::process::id() != self.owner {
            return;
        }
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "removed cache file"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to remove cache file");
                return;
            }
        }
        if let Some(stop) = &self.prune_to {
            prune_empty_parents(&self.path, stop);
        }
    }
}

/// Stops at `stop`, at anything outside it, or at the first directory that
/// is not empty.
fn prune_empty_parents(file: &Path, stop: &Path) {
    let mut current = file.parent();
    while let Some(dir) = current {
        if dir == stop || !dir.starts_with(stop) || std::fs::remove_dir(dir).is_err() {
            break;
        }
        debug!(dir = %dir.display(), "pruned empty cache directory");
        current = dir.parent();
    }
}
