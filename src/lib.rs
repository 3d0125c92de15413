//! # anyfs-drivers
//!
//! Uniform `File` and `Dir` handles over interchangeable storage drivers.
//!
//! Callers manipulate files and directories the same way whether the bytes
//! live on a local (or network-mounted) disk or on an FTPS server. A driver
//! translates each operation into native calls for its backend.
//!
//! ---
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use anyfs_drivers::{DriverExt, FsError, LocalDriver};
//!
//! fn main() -> Result<(), FsError> {
//!     let driver = LocalDriver::new("/srv/share")?;
//!     driver.dir("/").touch()?;
//!     driver.file("/x/y.txt")?.write(b"hello")?;
//!     assert_eq!(driver.file("/x/y.txt")?.read()?, b"hello");
//!     assert_eq!(driver.dir("/x").entries()?, ["y.txt"]);
//!     Ok(())
//! }
//! ```
//!
//! ---
//!
//! ## Core Types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`Driver`] | Backend contract: existence checks, listing, mutation, localization hooks |
//! | [`DriverExt`] | `file()` / `dir()` factories on any driver |
//! | [`File`], [`Dir`] | Entry handles bound to a driver |
//! | [`Entry`] | Operations shared by files and directories |
//! | [`LocalDriver`] | Direct host filesystem access (`"NFS"`) |
//! | [`FtpsDriver`] | FTP over TLS with a per-file local cache (`"FTPS"`) |
//! | [`registry`] | Protocol token → driver lookup |
//! | [`FsError`] | Error type with context |
//!
//! ---
//!
//! ## Paths
//!
//! Paths use `/` as the only separator and are always relative to the
//! driver root. [`safepath`] normalizes any input so it can never climb
//! above the root; the empty path is the root.
//!
//! ## Remote Files
//!
//! [`FtpsDriver`] gives every [`File`] a private cache file. Reads download
//! once (see [`File::localize`]); writes and appends upload immediately. The
//! cache file is removed when the `File` is dropped. Each remote command is
//! retried once over a fresh connection after a connection-level failure.
//!
//! ## Thread Safety
//!
//! Drivers are single-threaded: one driver, one connection, one caller at a
//! time. Drivers are `Send`, so one can be built on one thread and moved to
//! another, and independent instances may run on separate threads.
//!
//! ---
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `ftps` (default) | Native FTPS transport via `suppaftp` and `native-tls` |
//! | `serde` | Serde derives on configuration and metadata, `DriverConfig::from_json` |

// Private modules
mod cache;
mod config;
mod drivers;
mod entry;
mod error;
mod ext;
mod path_resolver;
mod traits;
mod types;

pub mod registry;

// Public re-exports - errors
pub use error::{FsError, RemoteError};

// Public re-exports - core types
pub use types::{DriverInfo, EntryType, Metadata};

// Public re-exports - driver contract
pub use ext::DriverExt;
pub use traits::{Driver, DriverCache, DriverRead, DriverWrite};

// Public re-exports - entries
pub use cache::CacheFile;
pub use entry::{CopyTarget, Dir, DirEntry, Entry, File};

// Public re-exports - paths
pub use path_resolver::{PathResolver, ROOT, SEPARATOR, basename, join, parent, safepath};

// Public re-exports - drivers and configuration
pub use config::{DriverConfig, FtpsConfig, LocalConfig};
#[cfg(feature = "ftps")]
pub use drivers::NativeConnector;
pub use drivers::{Connector, FtpSession, FtpsDriver, LocalDriver};
