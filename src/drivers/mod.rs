//! Concrete drivers.

mod ftps;
mod local;

#[cfg(feature = "ftps")]
pub use ftps::NativeConnector;
pub use ftps::{Connector, FtpSession, FtpsDriver};
pub use local::LocalDriver;
