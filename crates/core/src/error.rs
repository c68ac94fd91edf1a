//! Unified error types for dealscout.
//!
//! Only two failures ever reach a caller of a search: bad input and a
//! page session that could not be created. Everything below the adapter
//! boundary is absorbed into unavailable offers.

use rmcp::model::{ErrorCode, ErrorData as McpError};

/// Unified error types for dealscout.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., empty search query).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// The page-access session could not be created.
    #[error("SESSION_UNAVAILABLE: {0}")]
    SessionUnavailable(String),

    /// Writing the offer table to its sink failed.
    #[error("SINK_FAILED: {0}")]
    SinkFailed(String),
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::SinkFailed(err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::SinkFailed(err.to_string())
    }
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let (code, message) = match &err {
            Error::InvalidInput(msg) => (-32602, msg.clone()),
            Error::SessionUnavailable(msg) => (-32013, msg.clone()),
            Error::SinkFailed(msg) => (-32014, msg.clone()),
        };

        McpError { code: ErrorCode(code), message: message.into(), data: None }
    }
}
