//! # Driver Registry
//!
//! A fixed table of every driver compiled into the crate, keyed by protocol
//! token. Callers pick a backend from a configuration string without naming
//! the concrete driver type.
//!
//! ```rust
//! use anyfs_drivers::registry;
//!
//! assert_eq!(registry::protocols(), ["NFS", "FTPS"]);
//! let ftps = registry::lookup("ftps").unwrap();
//! assert!(!ftps.info.local);
//! assert!(registry::lookup("SMB").is_none());
//! ```

use crate::drivers::{FtpsDriver, LocalDriver};
use crate::{Driver, DriverConfig, DriverInfo, FsError};

type OpenFn = fn(&DriverConfig) -> Result<Box<dyn Driver>, FsError>;

/// One registered driver implementation.
pub struct Registration {
    /// Static metadata of the driver.
    pub info: &'static DriverInfo,
    open: OpenFn,
}

impl Registration {
    /// Construct the driver from `config`.
    ///
    /// # Errors
    ///
    /// - [`FsError::InvalidArgument`] if `config` is for another protocol
    /// - any construction error of the driver itself
    pub fn open(&self, config: &DriverConfig) -> Result<Box<dyn Driver>, FsError> {
        (self.open)(config)
    }
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration").field("info", self.info).finish()
    }
}

static REGISTRY: [Registration; 2] = [
    Registration {
        info: &LocalDriver::INFO,
        open: open_local,
    },
    Registration {
        info: &FtpsDriver::INFO,
        open: open_ftps,
    },
];

/// Every registered driver, in registration order.
pub fn registrations() -> &'static [Registration] {
    &REGISTRY
}

/// Protocol tokens of every registered driver.
pub fn protocols() -> Vec<&'static str> {
    REGISTRY.iter().map(|r| r.info.protocol).collect()
}

/// The driver registered for `protocol`, compared ASCII case-insensitively.
pub fn lookup(protocol: &str) -> Option<&'static Registration> {
    REGISTRY
        .iter()
        .find(|r| r.info.protocol.eq_ignore_ascii_case(protocol))
}

/// Like [`lookup`], but absence is an error.
///
/// # Errors
///
/// - [`FsError::UnknownProtocol`] if no driver is registered for `protocol`
pub fn require(protocol: &str) -> Result<&'static Registration, FsError> {
    lookup(protocol).ok_or_else(|| FsError::UnknownProtocol {
        protocol: protocol.to_string(),
    })
}

/// Construct the driver that `config` names.
///
/// # Errors
///
/// - [`FsError::UnknownProtocol`] if no driver is registered for it
/// - any construction error of the driver itself
pub fn open(config: &DriverConfig) -> Result<Box<dyn Driver>, FsError> {
    require(config.protocol())?.open(config)
}

fn mismatched(expected: &'static DriverInfo, config: &DriverConfig) -> FsError {
    FsError::InvalidArgument {
        operation: "open",
        reason: format!(
            "{} configuration given to the {} driver",
            config.protocol(),
            expected.protocol
        ),
    }
}

fn open_local(config: &DriverConfig) -> Result<Box<dyn Driver>, FsError> {
    match config {
        DriverConfig::Local(local) => Ok(Box::new(LocalDriver::from_config(local)?)),
        other => Err(mismatched(&LocalDriver::INFO, other)),
    }
}

fn open_ftps(config: &DriverConfig) -> Result<Box<dyn Driver>, FsError> {
    match config {
        #[cfg(feature = "ftps")]
        DriverConfig::Ftps(ftps) => Ok(Box::new(FtpsDriver::new(ftps.clone())?)),
        #[cfg(not(feature = "ftps"))]
        DriverConfig::Ftps(_) => Err(FsError::NotSupported {
            operation: "open",
            protocol: FtpsDriver::INFO.protocol,
        }),
        other => Err(mismatched(&FtpsDriver::INFO, other)),
    }
}
