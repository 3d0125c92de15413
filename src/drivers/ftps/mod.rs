//! FTPS driver with a local shadow copy per file entry.
//!
//! Files are downloaded into a private cache on first read and uploaded on
//! every write. Every remote command runs inside a retry envelope: a
//! transient failure closes the session, opens a fresh one, and retries the
//! command once. A second failure reaches the caller.

#[cfg(feature = "ftps")]
mod native;
mod session;

use std::cell::{Cell, RefCell};
use std::io::Seek;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::path_resolver::{self, ROOT, SEPARATOR};
use crate::{
    CacheFile, DriverCache, DriverInfo, DriverRead, DriverWrite, FsError, FtpsConfig, PathResolver,
    RemoteError,
};

#[cfg(feature = "ftps")]
pub use native::NativeConnector;
pub use session::{Connector, FtpSession};

/// Driver for a directory on an FTPS server.
///
/// The driver owns exactly one control connection and is meant for use from
/// one thread at a time.
///
/// # Example
///
/// ```rust,no_run
/// use anyfs_drivers::{DriverExt, FtpsConfig, FtpsDriver};
///
/// let driver = FtpsDriver::new(FtpsConfig::new("files.example.com", "alice", "secret", "/exports")).unwrap();
/// let mut manifest = driver.file("/manifest.json").unwrap();
/// let bytes = manifest.read().unwrap();
/// manifest.write(&bytes).unwrap();
/// driver.close().unwrap();
/// ```
pub struct FtpsDriver {
    config: FtpsConfig,
    resolver: PathResolver,
    connector: Box<dyn Connector>,
    session: RefCell<Option<Box<dyn FtpSession>>>,
    cache_root: PathBuf,
    reconnects: Cell<u32>,
}

const CACHE_SEGMENT_MAX: usize = 64;

type Command<'a, T> = dyn FnMut(&mut dyn FtpSession) -> Result<T, RemoteError> + 'a;

impl FtpsDriver {
    /// Registry metadata.
    pub const INFO: DriverInfo = DriverInfo {
        protocol: "FTPS",
        description: "FTP over TLS with a local file cache",
        local: false,
    };

    /// Connect to the server described by `config`.
    ///
    /// # Errors
    ///
    /// - [`FsError::Connection`] if the server cannot be reached or refuses
    ///   the login
    #[cfg(feature = "ftps")]
    pub fn new(config: FtpsConfig) -> Result<Self, FsError> {
        Self::with_connector(config, Box::new(NativeConnector))
    }

    /// Connect through `connector`, which is also used for reconnects.
    ///
    /// # Errors
    ///
    /// - [`FsError::Connection`] if the first session cannot be opened
    /// - [`FsError::Io`] if the cache work directory cannot be created
    pub fn with_connector(config: FtpsConfig, connector: Box<dyn Connector>) -> Result<Self, FsError> {
        let session = connector.connect(&config).map_err(|source| FsError::Connection {
            host: config.host.clone(),
            source,
        })?;
        let cache_root = Self::work_dir(&config);
        std::fs::create_dir_all(&cache_root)
            .map_err(|e| FsError::io("create_dir_all", &cache_root, e))?;
        info!(
            host = %config.host,
            port = config.port,
            root = %config.root,
            cache = %cache_root.display(),
            "connected"
        );
        Ok(Self {
            resolver: PathResolver::new(&config.root),
            config,
            connector,
            session: RefCell::new(Some(session)),
            cache_root,
            reconnects: Cell::new(0),
        })
    }

    /// Cache work directory for `config`.
    ///
    /// Derived from host, port and root only, so every run against the same
    /// remote root uses the same directory.
    pub fn work_dir(config: &FtpsConfig) -> PathBuf {
        let key = format!(
            "ftps://{}:{}{}",
            config.host,
            config.port,
            path_resolver::safepath(&config.root)
        );
        let id = Uuid::new_v5(&Uuid::NAMESPACE_URL, key.as_bytes());
        let base = config.cache_dir.clone().unwrap_or_else(std::env::temp_dir);
        base.join(format!("anyfs-ftps-{}", id.simple()))
    }

    /// Construction parameters.
    pub fn config(&self) -> &FtpsConfig {
        &self.config
    }

    /// Directory holding this driver's cache files.
    pub fn cache_root(&self) -> &Path {
        &self.cache_root
    }

    /// Whether a session is currently open.
    pub fn is_connected(&self) -> bool {
        self.session.borrow().is_some()
    }

    /// Number of reconnects performed since construction.
    pub fn reconnect_count(&self) -> u32 {
        self.reconnects.get()
    }

    /// Send QUIT and drop the session.
    ///
    /// A later command reconnects on its own.
    pub fn close(&self) -> Result<(), FsError> {
        let Some(mut session) = self.session.borrow_mut().take() else {
            return Ok(());
        };
        info!(host = %self.config.host, "closing connection");
        session
            .quit()
            .map_err(|source| FsError::remote("quit", ROOT, source))
    }

    fn reconnect(&self) -> Result<(), RemoteError> {
        if let Some(mut stale) = self.session.borrow_mut().take() {
            if let Err(e) = stale.quit() {
                debug!(error = %e, "quit on stale session failed");
            }
        }
        let fresh = self.connector.connect(&self.config)?;
        *self.session.borrow_mut() = Some(fresh);
        self.reconnects.set(self.reconnects.get() + 1);
        info!(host = %self.config.host, reconnects = self.reconnects.get(), "reconnected");
        Ok(())
    }

    #[tracing::instrument(level = "debug", skip(self, command), fields(host = %self.config.host))]
    fn with_retry<T>(
        &self,
        operation: &'static str,
        path: &str,
        command: &mut Command<'_, T>,
    ) -> Result<T, RemoteError> {
        match self.run(command) {
            Err(e) if e.is_transient() => {
                warn!(operation, path, error = %e, "transient failure, reconnecting");
                self.reconnect()?;
                self.run(command)
            }
            result => result,
        }
    }

    fn run<T>(&self, command: &mut Command<'_, T>) -> Result<T, RemoteError> {
        let mut slot = self.session.borrow_mut();
        let session = slot.as_mut().ok_or(RemoteError::Disconnected)?;
        command(session.as_mut())
    }

    /// Resolve a command result that may legitimately fail for an absent
    /// target: non-transient failures become `None`.
    fn answer<T>(
        operation: &'static str,
        path: &str,
        result: Result<T, RemoteError>,
    ) -> Result<Option<T>, FsError> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.is_transient() => Err(FsError::remote(operation, path, e)),
            Err(e) => {
                debug!(operation, path, error = %e, "remote answered no");
                Ok(None)
            }
        }
    }

    fn absent_ok<T>(
        &self,
        operation: &'static str,
        path: &str,
        command: &mut Command<'_, T>,
    ) -> Result<Option<T>, FsError> {
        Self::answer(operation, path, self.with_retry(operation, path, command))
    }

    /// Bound a remote name so mirrored cache paths stay within host
    /// file-name limits.
    fn cache_segment(name: &str) -> &str {
        if name.len() <= CACHE_SEGMENT_MAX {
            return name;
        }
        let mut end = CACHE_SEGMENT_MAX;
        while !name.is_char_boundary(end) {
            end -= 1;
        }
        &name[..end]
    }

    fn child_name(entry: &str) -> Option<&str> {
        let name = path_resolver::basename(entry);
        match name {
            "" | "." | ".." => None,
            name => Some(name),
        }
    }
}

impl DriverRead for FtpsDriver {
    fn info(&self) -> &'static DriverInfo {
        &Self::INFO
    }

    fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    fn file_exists(&self, path: &str) -> Result<bool, FsError> {
        let abs = self.resolver.abspath(path);
        Ok(self.absent_ok("size", path, &mut |s| s.size(&abs))?.is_some())
    }

    fn dir_exists(&self, path: &str) -> Result<bool, FsError> {
        let abs = self.resolver.abspath(path);
        let found = self.absent_ok("cwd", path, &mut |s| {
            s.cwd(&abs)?;
            if let Err(e) = s.cwd(ROOT) {
                debug!(error = %e, "cwd back to root failed");
            }
            Ok(())
        })?;
        Ok(found.is_some())
    }

    fn size(&self, path: &str) -> Option<u64> {
        let abs = self.resolver.abspath(path);
        self.absent_ok("size", path, &mut |s| s.size(&abs)).ok().flatten()
    }

    fn mod_time(&self, path: &str) -> Option<SystemTime> {
        let abs = self.resolver.abspath(path);
        self.absent_ok("mdtm", path, &mut |s| s.mdtm(&abs)).ok().flatten()
    }

    fn list_children(&self, path: &str) -> Result<Vec<String>, FsError> {
        let dir = path_resolver::safepath(path);
        // Many servers answer NLST on a file with the file's own name.
        if !self.dir_exists(&dir)? {
            return Ok(Vec::new());
        }
        let abs = self.resolver.abspath(&dir);
        let listing = self
            .absent_ok("nlst", path, &mut |s| s.nlst(&abs))?
            .unwrap_or_default();
        let mut children: Vec<String> = listing
            .iter()
            .filter_map(|entry| Self::child_name(entry))
            .map(|name| path_resolver::join(&dir, name))
            .collect();
        children.sort();
        children.dedup();
        Ok(children)
    }
}

impl DriverWrite for FtpsDriver {
    fn delete(&self, path: &str) -> Result<bool, FsError> {
        let safe = path_resolver::safepath(path);
        if safe == ROOT {
            return Ok(false);
        }
        let abs = self.resolver.abspath(&safe);
        let removed = if self.dir_exists(&safe)? {
            self.absent_ok("rmdir", &safe, &mut |s| s.rmdir(&abs))?
        } else if self.file_exists(&safe)? {
            self.absent_ok("delete", &safe, &mut |s| s.delete(&abs))?
        } else {
            None
        };
        Ok(removed.is_some())
    }

    fn delete_tree(&self, path: &str) -> Result<bool, FsError> {
        let safe = path_resolver::safepath(path);
        if safe == ROOT || !self.dir_exists(&safe)? {
            return self.delete(&safe);
        }
        for child in self.list_children(&safe)? {
            self.delete_tree(&child)?;
        }
        self.delete(&safe)
    }

    fn mkdir(&self, path: &str) -> Result<bool, FsError> {
        let abs = self.resolver.abspath(path);
        Ok(self.absent_ok("mkdir", path, &mut |s| s.mkdir(&abs))?.is_some())
    }

    fn rename(&self, from: &str, to: &str) -> Result<bool, FsError> {
        if path_resolver::safepath(from) == ROOT || !self.exists(from)? {
            return Ok(false);
        }
        let source = self.resolver.abspath(from);
        let target = self.resolver.abspath(to);
        Ok(self
            .absent_ok("rename", from, &mut |s| s.rename(&source, &target))?
            .is_some())
    }
}

impl DriverCache for FtpsDriver {
    fn local_path(&self, _path: &str) -> Option<PathBuf> {
        None
    }

    fn cache_file(&self, path: &str) -> Result<Option<CacheFile>, FsError> {
        let safe = path_resolver::safepath(path);
        let mut local = self.cache_root.clone();
        let parent = path_resolver::parent(&safe);
        for segment in parent.split(SEPARATOR).filter(|s| !s.is_empty()) {
            local.push(Self::cache_segment(segment));
        }
        let name = match path_resolver::basename(&safe) {
            "" => "root",
            name => Self::cache_segment(name),
        };
        local.push(format!("{name}.{}", Uuid::new_v4().simple()));
        Ok(Some(CacheFile::new(local).pruning_up_to(&self.cache_root)))
    }

    fn download(&self, path: &str, local: &Path) -> Result<(), FsError> {
        let abs = self.resolver.abspath(path);
        let mut sink = std::fs::File::create(local).map_err(|e| FsError::io("download", local, e))?;
        let bytes = self
            .with_retry("download", path, &mut |s| {
                // a retried transfer starts over
                sink.set_len(0)?;
                sink.rewind()?;
                s.retrieve(&abs, &mut sink)
            })
            .map_err(|e| FsError::remote("download", path, e))?;
        debug!(path, bytes, "downloaded");
        Ok(())
    }

    fn upload(&self, local: &Path, path: &str) -> Result<(), FsError> {
        let mut source = std::fs::File::open(local).map_err(|e| FsError::io("upload", local, e))?;
        let abs = self.resolver.abspath(path);
        let bytes = self
            .with_retry("upload", path, &mut |s| {
                source.rewind()?;
                s.store(&abs, &mut source)
            })
            .map_err(|e| FsError::remote("upload", path, e))?;
        debug!(path, bytes, "uploaded");
        Ok(())
    }
}

impl Drop for FtpsDriver {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            debug!(error = %e, "quit on drop failed");
        }
    }
}

impl std::fmt::Debug for FtpsDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FtpsDriver")
            .field("config", &self.config)
            .field("cache_root", &self.cache_root)
            .field("connected", &self.is_connected())
            .field("reconnects", &self.reconnects.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn work_dir_is_deterministic_per_remote_root() {
        let base = FtpsConfig::new("h", "u", "p", "/data").with_cache_dir("/cache");
        let same = FtpsConfig::new("h", "other", "pw", "/data/").with_cache_dir("/cache");
        let other_root = FtpsConfig::new("h", "u", "p", "/elsewhere").with_cache_dir("/cache");
        let other_host = FtpsConfig::new("h2", "u", "p", "/data").with_cache_dir("/cache");

        assert_eq!(FtpsDriver::work_dir(&base), FtpsDriver::work_dir(&same));
        assert_ne!(FtpsDriver::work_dir(&base), FtpsDriver::work_dir(&other_root));
        assert_ne!(FtpsDriver::work_dir(&base), FtpsDriver::work_dir(&other_host));
        assert!(FtpsDriver::work_dir(&base).starts_with("/cache"));
    }

    #[test]
    fn cache_segment_bounds_long_names() {
        assert_eq!(FtpsDriver::cache_segment("short.txt"), "short.txt");

        let long = "n".repeat(240);
        assert_eq!(FtpsDriver::cache_segment(&long).len(), CACHE_SEGMENT_MAX);

        // never splits a multi-byte character
        let wide = "é".repeat(100);
        let cut = FtpsDriver::cache_segment(&wide);
        assert!(cut.len() <= CACHE_SEGMENT_MAX);
        assert!(cut.chars().all(|c| c == 'é'));
    }

    #[test]
    fn child_name_skips_dot_entries() {
        assert_eq!(FtpsDriver::child_name("a.txt"), Some("a.txt"));
        assert_eq!(FtpsDriver::child_name("/data/sub/"), Some("sub"));
        assert_eq!(FtpsDriver::child_name("."), None);
        assert_eq!(FtpsDriver::child_name(".."), None);
    }

    #[test]
    fn answer_separates_absence_from_transport_failure() {
        let absent: Result<u64, _> = Err(RemoteError::Reply {
            code: 550,
            message: "no such file".into(),
        });
        assert!(FtpsDriver::answer("size", "/a", absent).unwrap().is_none());

        let dropped: Result<u64, _> = Err(RemoteError::Disconnected);
        assert!(matches!(
            FtpsDriver::answer("size", "/a", dropped),
            Err(FsError::Remote { .. })
        ));
    }
}
