//! Error types for storage drivers.

use std::path::PathBuf;

/// Driver error type with contextual variants.
///
/// Variants fall into four groups: configuration failures raised while a
/// driver is built, remote failures that survived the reconnect-and-retry
/// envelope, absence conditions that an operation could not express as a
/// boolean, and programming errors.
///
/// # Examples
///
/// ```rust
/// use anyfs_drivers::FsError;
///
/// let err = FsError::NotFound { path: "/missing".into() };
/// assert_eq!(err.to_string(), "not found: /missing");
/// ```
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum FsError {
    // Configuration
    /// The configured root is missing or unusable.
    #[error("invalid root {root}: {reason}")]
    InvalidRoot {
        /// The rejected root location.
        root: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The initial connection to a remote backend could not be opened.
    #[error("cannot connect to {host}: {source}")]
    Connection {
        /// Host the driver tried to reach.
        host: String,
        /// Underlying session failure.
        #[source]
        source: RemoteError,
    },

    /// No registered driver answers to this protocol token.
    #[error("unknown protocol: {protocol}")]
    UnknownProtocol {
        /// The token that was looked up.
        protocol: String,
    },

    // Absence
    /// Path does not exist.
    #[error("not found: {path}")]
    NotFound {
        /// The root-relative path that was not found.
        path: String,
    },

    /// A file operation was aimed at a directory.
    #[error("not a file: {path}")]
    NotAFile {
        /// The root-relative path that names a directory.
        path: String,
    },

    /// Expected a directory but found something else.
    #[error("not a directory: {path}")]
    NotADirectory {
        /// The path that is not a directory.
        path: String,
    },

    /// Content could not be interpreted as requested.
    #[error("invalid data: {path} ({details})")]
    InvalidData {
        /// The path with invalid data.
        path: String,
        /// Details about the invalid data.
        details: String,
    },

    // Remote
    /// A remote command failed, including after one reconnect.
    #[error("{operation} failed for {path}: {source}")]
    Remote {
        /// The remote command that failed.
        operation: &'static str,
        /// The root-relative path involved.
        path: String,
        /// Underlying session failure.
        #[source]
        source: RemoteError,
    },

    // Programming errors
    /// The backend does not implement this operation.
    #[error("{operation} not supported by {protocol} driver")]
    NotSupported {
        /// The unsupported operation.
        operation: &'static str,
        /// Protocol token of the driver.
        protocol: &'static str,
    },

    /// An argument is not acceptable for the operation.
    #[error("{operation}: invalid argument: {reason}")]
    InvalidArgument {
        /// The operation that rejected the argument.
        operation: &'static str,
        /// What was wrong with it.
        reason: String,
    },

    // Local
    /// Local I/O error with context.
    #[error("{operation} failed for {}: {source}", path.display())]
    Io {
        /// The operation that failed.
        operation: &'static str,
        /// Host path involved in the operation.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Configuration could not be parsed.
    #[error("deserialization error: {0}")]
    Deserialization(String),
}

impl FsError {
    /// Wraps a local I/O error with the operation and host path.
    pub fn io(operation: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FsError::Io {
            operation,
            path: path.into(),
            source,
        }
    }

    /// Wraps a remote session failure with the operation and remote path.
    pub fn remote(operation: &'static str, path: impl Into<String>, source: RemoteError) -> Self {
        FsError::Remote {
            operation,
            path: path.into(),
            source,
        }
    }

    /// Returns `true` for errors caused by misuse rather than by the backend.
    pub fn is_programming_error(&self) -> bool {
        matches!(
            self,
            FsError::NotSupported { .. } | FsError::InvalidArgument { .. }
        )
    }
}

impl From<std::io::Error> for FsError {
    fn from(error: std::io::Error) -> Self {
        FsError::Io {
            operation: "io",
            path: PathBuf::new(),
            source: error,
        }
    }
}

/// Failure reported by a remote session.
///
/// [`is_transient`](RemoteError::is_transient) separates connection-level
/// failures, which the driver answers with one reconnect and retry, from
/// protocol replies that describe the target itself.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    /// Transport failure: timeout, broken pipe, reset.
    #[error("connection error: {0}")]
    Io(#[from] std::io::Error),

    /// No session is open.
    #[error("not connected")]
    Disconnected,

    /// The server answered with an unexpected reply.
    #[error("server replied {code}: {message}")]
    Reply {
        /// FTP reply code.
        code: u32,
        /// Reply text.
        message: String,
    },

    /// TLS negotiation or certificate handling failed.
    #[error("tls error: {0}")]
    Tls(String),

    /// Any other protocol failure (bad address, malformed reply).
    #[error("protocol error: {0}")]
    Protocol(String),
}

impl RemoteError {
    /// 421: service closing control connection. 426: data connection closed.
    const CONNECTION_REPLIES: [u32; 2] = [421, 426];

    /// Returns `true` when the failure concerns the connection rather than
    /// the command's target.
    pub fn is_transient(&self) -> bool {
        match self {
            RemoteError::Io(_) | RemoteError::Disconnected => true,
            RemoteError::Reply { code, .. } => Self::CONNECTION_REPLIES.contains(code),
            RemoteError::Tls(_) | RemoteError::Protocol(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fs_error_not_found_display() {
        let err = FsError::NotFound {
            path: "/missing".into(),
        };
        assert_eq!(err.to_string(), "not found: /missing");
    }

    #[test]
    fn fs_error_remote_display_includes_operation() {
        let err = FsError::remote(
            "upload",
            "/a.txt",
            RemoteError::Reply {
                code: 550,
                message: "denied".into(),
            },
        );
        assert_eq!(
            err.to_string(),
            "upload failed for /a.txt: server replied 550: denied"
        );
    }

    #[test]
    fn fs_error_not_supported_is_programming_error() {
        let err = FsError::NotSupported {
            operation: "download",
            protocol: "NFS",
        };
        assert!(err.is_programming_error());
        assert!(!FsError::NotFound { path: "/".into() }.is_programming_error());
    }

    #[test]
    fn fs_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::Other, "test");
        assert!(matches!(FsError::from(io_err), FsError::Io { .. }));
    }

    #[test]
    fn remote_error_io_is_transient() {
        let err = RemoteError::from(std::io::Error::new(
            std::io::ErrorKind::BrokenPipe,
            "pipe",
        ));
        assert!(err.is_transient());
        assert!(RemoteError::Disconnected.is_transient());
    }

    #[test]
    fn remote_error_reply_classification() {
        let closing = RemoteError::Reply {
            code: 421,
            message: "timeout".into(),
        };
        let missing = RemoteError::Reply {
            code: 550,
            message: "no such file".into(),
        };
        assert!(closing.is_transient());
        assert!(!missing.is_transient());
        assert!(!RemoteError::Tls("handshake".into()).is_transient());
    }
}
