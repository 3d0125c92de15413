//! [`FtpSession`] over a real explicit-FTPS control connection.

use std::io::{self, Read, Write};
use std::net::ToSocketAddrs;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use suppaftp::native_tls::TlsConnector;
use suppaftp::types::{FileType, FormatControl, FtpError, Mode};
use suppaftp::{NativeTlsConnector, NativeTlsFtpStream};
use tracing::debug;

use super::session::{Connector, FtpSession};
use crate::{FtpsConfig, RemoteError};

/// Connects with `suppaftp` over `native-tls`.
///
/// Certificates and host names are not verified. Sessions use passive mode
/// and the transfer type selected by [`FtpsConfig::binary`].
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeConnector;

impl Connector for NativeConnector {
    fn connect(&self, config: &FtpsConfig) -> Result<Box<dyn FtpSession>, RemoteError> {
        let stream = Self::open(config)?;

        let tls = TlsConnector::builder()
            .danger_accept_invalid_certs(true)
            .danger_accept_invalid_hostnames(true)
            .build()
            .map_err(|e| RemoteError::Tls(e.to_string()))?;
        let mut stream = stream.into_secure(NativeTlsConnector::from(tls), &config.host)?;

        stream.login(&config.user, &config.password)?;
        stream.set_mode(Mode::Passive);
        let transfer = if config.binary {
            FileType::Binary
        } else {
            FileType::Ascii(FormatControl::Default)
        };
        stream.transfer_type(transfer)?;
        debug!(host = %config.host, port = config.port, "ftps session ready");
        Ok(Box::new(NativeSession { stream }))
    }
}

impl NativeConnector {
    /// Try every resolved address in turn; the last failure wins.
    fn open(config: &FtpsConfig) -> Result<NativeTlsFtpStream, RemoteError> {
        let mut last = None;
        for addr in (config.host.as_str(), config.port).to_socket_addrs()? {
            match NativeTlsFtpStream::connect_timeout(addr, config.connect_timeout()) {
                Ok(stream) => return Ok(stream),
                Err(e) => {
                    debug!(%addr, error = %e, "address unreachable");
                    last = Some(RemoteError::from(e));
                }
            }
        }
        Err(last.unwrap_or_else(|| RemoteError::Protocol(format!("no address for {}", config.host))))
    }
}

struct NativeSession {
    stream: NativeTlsFtpStream,
}

impl FtpSession for NativeSession {
    fn cwd(&mut self, path: &str) -> Result<(), RemoteError> {
        Ok(self.stream.cwd(path)?)
    }

    fn size(&mut self, path: &str) -> Result<u64, RemoteError> {
        Ok(self.stream.size(path)? as u64)
    }

    fn mdtm(&mut self, path: &str) -> Result<SystemTime, RemoteError> {
        let stamp = self.stream.mdtm(path)?.and_utc().timestamp();
        Ok(UNIX_EPOCH + Duration::from_secs(u64::try_from(stamp).unwrap_or(0)))
    }

    fn nlst(&mut self, path: &str) -> Result<Vec<String>, RemoteError> {
        Ok(self.stream.nlst(Some(path))?)
    }

    fn retrieve(&mut self, path: &str, sink: &mut dyn Write) -> Result<u64, RemoteError> {
        Ok(self
            .stream
            .retr(path, |reader| io::copy(reader, &mut *sink).map_err(FtpError::ConnectionError))?)
    }

    fn store(&mut self, path: &str, mut source: &mut dyn Read) -> Result<u64, RemoteError> {
        Ok(self.stream.put_file(path, &mut source)?)
    }

    fn delete(&mut self, path: &str) -> Result<(), RemoteError> {
        Ok(self.stream.rm(path)?)
    }

    fn rmdir(&mut self, path: &str) -> Result<(), RemoteError> {
        Ok(self.stream.rmdir(path)?)
    }

    fn mkdir(&mut self, path: &str) -> Result<(), RemoteError> {
        Ok(self.stream.mkdir(path)?)
    }

    fn rename(&mut self, from: &str, to: &str) -> Result<(), RemoteError> {
        Ok(self.stream.rename(from, to)?)
    }

    fn quit(&mut self) -> Result<(), RemoteError> {
        Ok(self.stream.quit()?)
    }
}

impl From<FtpError> for RemoteError {
    fn from(error: FtpError) -> Self {
        match error {
            FtpError::ConnectionError(io) => RemoteError::Io(io),
            FtpError::SecureError(message) => RemoteError::Tls(message),
            FtpError::UnexpectedResponse(response) => RemoteError::Reply {
                code: response.status.code(),
                message: String::from_utf8_lossy(&response.body).trim().to_string(),
            },
            other => RemoteError::Protocol(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;

    #[test]
    fn open_reports_the_last_address_failure() {
        // bind then release a port so nothing is listening on it
        let port = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap().port();
        let config = FtpsConfig::new("localhost", "u", "p", "/")
            .with_port(port)
            .with_connect_timeout(Duration::from_secs(1));

        let err = NativeConnector::open(&config).err().unwrap();
        assert!(matches!(err, RemoteError::Io(_)), "unexpected {err:?}");
        assert!(err.is_transient());
    }
}
