//! Unified error type.

use thiserror::Error;

/// The error type returned by rekey's fallible operations.
///
/// Request-level failures are expressed as HTTP [`Response`](crate::Response)
/// values, not as `Error`s, and key normalization itself never fails. This
/// type surfaces server start-up failures.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid socket address `{addr}`")]
    InvalidAddr {
        addr: String,
        #[source]
        source: std::net::AddrParseError,
    },

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}
