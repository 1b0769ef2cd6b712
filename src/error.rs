//! Error types for influxline
//!
//! Provides a unified error type for every transport, protocol and
//! application failure. Each variant maps to a stable integer code through
//! [`Error::code`], so callers that branch on sign and magnitude keep working.

use thiserror::Error;

/// Result type alias using Error
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for influxline operations
#[derive(Debug, Error)]
pub enum Error {
    // -------------------------------------------------------------------------
    // Transport Errors
    // -------------------------------------------------------------------------
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Socket creation failed: {0}")]
    SocketCreate(#[source] std::io::Error),

    #[error("Connect failed: {0}")]
    Connect(#[source] std::io::Error),

    #[error("Short write: {0}")]
    ShortWrite(#[source] std::io::Error),

    #[error("Receive failed: {0}")]
    Recv(#[source] std::io::Error),

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    #[error("Unexpected end of stream while reading {0}")]
    UnexpectedEof(&'static str),

    #[error("Invalid chunk size line: {0}")]
    ChunkSize(String),

    #[error("Missing CRLF after chunk data")]
    ChunkTerminator,

    #[error("Body truncated: {remaining} bytes still expected")]
    TruncatedBody { remaining: usize },

    #[error("Malformed response: {0}")]
    Malformed(String),

    // -------------------------------------------------------------------------
    // Application Errors
    // -------------------------------------------------------------------------
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
}

impl Error {
    /// Stable integer code for this failure class.
    ///
    /// Transport and protocol failures are negative; a server rejection
    /// returns the raw HTTP status code.
    pub fn code(&self) -> i32 {
        match self {
            Error::InvalidAddress(_) => -1,
            Error::SocketCreate(_) => -2,
            Error::Connect(_) => -3,
            Error::ShortWrite(_) => -6,
            Error::UnexpectedEof(_) => -7,
            Error::ChunkSize(_) => -8,
            Error::ChunkTerminator => -9,
            Error::TruncatedBody { .. } => -10,
            Error::Malformed(_) => -11,
            Error::Recv(_) => -12,
            Error::Status { status, .. } => i32::from(*status),
        }
    }

    /// True when the server answered but rejected the request
    pub fn is_status(&self) -> bool {
        matches!(self, Error::Status { .. })
    }
}

/// Collapse a result into the classic integer return code: `0` on success,
/// otherwise [`Error::code`].
pub fn result_code<T>(result: &Result<T>) -> i32 {
    match result {
        Ok(_) => 0,
        Err(e) => e.code(),
    }
}
