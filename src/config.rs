//! Driver construction parameters.
//!
//! With the `serde` feature, configurations can be read from JSON and the
//! `protocol` field selects the driver:
//!
//! ```rust
//! # #[cfg(feature = "serde")]
//! # {
//! use anyfs_drivers::DriverConfig;
//!
//! let config = DriverConfig::from_json(
//!     r#"{"protocol": "FTPS", "host": "files.example.com", "user": "u", "password": "p", "root": "/data"}"#,
//! ).unwrap();
//! assert_eq!(config.protocol(), "FTPS");
//! # }
//! ```

use std::path::PathBuf;
use std::time::Duration;

use crate::drivers::{FtpsDriver, LocalDriver};

/// Parameters for [`LocalDriver`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LocalConfig {
    /// Existing host directory that becomes the driver root.
    pub root: PathBuf,
}

impl LocalConfig {
    /// Configuration rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

/// Parameters for [`FtpsDriver`].
#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FtpsConfig {
    /// Server host name or address.
    pub host: String,
    /// Control connection port.
    #[cfg_attr(feature = "serde", serde(default = "FtpsConfig::default_port"))]
    pub port: u16,
    /// Login user.
    pub user: String,
    /// Login password.
    pub password: String,
    /// Remote directory that becomes the driver root.
    pub root: String,
    /// Binary (image) transfers when `true`, ASCII otherwise.
    #[cfg_attr(feature = "serde", serde(default = "FtpsConfig::default_binary"))]
    pub binary: bool,
    /// Bound on opening the control connection.
    #[cfg_attr(feature = "serde", serde(default = "FtpsConfig::default_connect_timeout_secs"))]
    pub connect_timeout_secs: u64,
    /// Parent of the cache work directory; the system temp dir when unset.
    #[cfg_attr(feature = "serde", serde(default))]
    pub cache_dir: Option<PathBuf>,
}

impl FtpsConfig {
    /// Standard FTP control port.
    pub const DEFAULT_PORT: u16 = 21;

    /// Connection-open timeout used unless configured otherwise.
    pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;

    /// Configuration with default port, binary transfers and timeout.
    pub fn new(
        host: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
        root: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port: Self::DEFAULT_PORT,
            user: user.into(),
            password: password.into(),
            root: root.into(),
            binary: true,
            connect_timeout_secs: Self::DEFAULT_CONNECT_TIMEOUT_SECS,
            cache_dir: None,
        }
    }

    /// Use `port` for the control connection.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Select binary (`true`) or ASCII (`false`) transfers.
    pub fn with_binary(mut self, binary: bool) -> Self {
        self.binary = binary;
        self
    }

    /// Bound the connection-open time.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout_secs = timeout.as_secs().max(1);
        self
    }

    /// Place the cache work directory under `dir`.
    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(dir.into());
        self
    }

    /// Connection-open timeout.
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    #[cfg(feature = "serde")]
    fn default_port() -> u16 {
        Self::DEFAULT_PORT
    }

    #[cfg(feature = "serde")]
    fn default_binary() -> bool {
        true
    }

    #[cfg(feature = "serde")]
    fn default_connect_timeout_secs() -> u64 {
        Self::DEFAULT_CONNECT_TIMEOUT_SECS
    }
}

impl std::fmt::Debug for FtpsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FtpsConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("root", &self.root)
            .field("binary", &self.binary)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("cache_dir", &self.cache_dir)
            .finish()
    }
}

/// Configuration for any registered driver, keyed by protocol token.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "protocol"))]
pub enum DriverConfig {
    /// Local or network-mounted filesystem.
    #[cfg_attr(feature = "serde", serde(rename = "NFS"))]
    Local(LocalConfig),
    /// FTP over TLS.
    #[cfg_attr(feature = "serde", serde(rename = "FTPS"))]
    Ftps(FtpsConfig),
}

impl DriverConfig {
    /// Protocol token of the driver this configuration is for.
    pub fn protocol(&self) -> &'static str {
        match self {
            DriverConfig::Local(_) => LocalDriver::INFO.protocol,
            DriverConfig::Ftps(_) => FtpsDriver::INFO.protocol,
        }
    }

    /// Parse a configuration from JSON.
    ///
    /// # Errors
    ///
    /// - [`FsError::Deserialization`](crate::FsError::Deserialization) if the
    ///   JSON is malformed or names an unknown protocol
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self, crate::FsError> {
        serde_json::from_str(json).map_err(|e| crate::FsError::Deserialization(e.to_string()))
    }
}

impl From<LocalConfig> for DriverConfig {
    fn from(config: LocalConfig) -> Self {
        DriverConfig::Local(config)
    }
}

impl From<FtpsConfig> for DriverConfig {
    fn from(config: FtpsConfig) -> Self {
        DriverConfig::Ftps(config)
    }
}
