//! The command surface the FTPS driver needs from a control connection.

use std::io::{Read, Write};
use std::time::SystemTime;

use crate::{FtpsConfig, RemoteError};

/// One authenticated FTP session.
///
/// Paths are absolute server paths. Transfers stream whole files between
/// the server and a local reader or writer.
pub trait FtpSession: Send {
    /// CWD.
    fn cwd(&mut self, path: &str) -> Result<(), RemoteError>;

    /// SIZE, in bytes.
    fn size(&mut self, path: &str) -> Result<u64, RemoteError>;

    /// MDTM.
    fn mdtm(&mut self, path: &str) -> Result<SystemTime, RemoteError>;

    /// NLST. Servers answer with bare names or full paths.
    fn nlst(&mut self, path: &str) -> Result<Vec<String>, RemoteError>;

    /// RETR into `sink`; returns the bytes copied.
    fn retrieve(&mut self, path: &str, sink: &mut dyn Write) -> Result<u64, RemoteError>;

    /// STOR from `source`, replacing any existing file; returns the bytes
    /// copied.
    fn store(&mut self, path: &str, source: &mut dyn Read) -> Result<u64, RemoteError>;

    /// DELE.
    fn delete(&mut self, path: &str) -> Result<(), RemoteError>;

    /// RMD.
    fn rmdir(&mut self, path: &str) -> Result<(), RemoteError>;

    /// MKD.
    fn mkdir(&mut self, path: &str) -> Result<(), RemoteError>;

    /// RNFR + RNTO.
    fn rename(&mut self, from: &str, to: &str) -> Result<(), RemoteError>;

    /// QUIT.
    fn quit(&mut self) -> Result<(), RemoteError>;
}

/// Opens sessions for a driver, initially and on every reconnect.
pub trait Connector: Send {
    /// Connect, secure and log in according to `config`.
    fn connect(&self, config: &FtpsConfig) -> Result<Box<dyn FtpSession>, RemoteError>;
}

impl<F> Connector for F
where
    F: Fn(&FtpsConfig) -> Result<Box<dyn FtpSession>, RemoteError> + Send,
{
    fn connect(&self, config: &FtpsConfig) -> Result<Box<dyn FtpSession>, RemoteError> {
        self(config)
    }
}
