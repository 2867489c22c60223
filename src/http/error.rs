//! Error taxonomy for the protocol layer.

use thiserror::Error;

use crate::http::request::ParseState;
use crate::http::response::StatusCode;
use crate::http::writer::WriterState;

/// Failures raised while reconstructing a request from the wire.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Malformed request line or header line.
    #[error("malformed {0}")]
    Format(String),

    /// Header name contains a character outside the token set.
    #[error("invalid character in header name {0:?}")]
    InvalidCharacter(String),

    /// Anything other than `HTTP/1.1` in the request line.
    #[error("unsupported HTTP version {0:?}")]
    Version(String),

    /// `Content-Length` is not a non-negative integer.
    #[error("invalid content-length {0:?}")]
    InvalidContentLength(String),

    /// More body bytes arrived than `Content-Length` declared.
    #[error("body of {received} bytes exceeds declared content-length {declared}")]
    Framing { received: usize, declared: usize },

    /// A single line outgrew the parse buffer.
    #[error("request line or header exceeds {limit} bytes")]
    TooLarge { limit: usize },

    /// The stream ended before the request was complete.
    #[error("incomplete request, stream ended in state {state:?}")]
    Incomplete { state: ParseState },

    /// Parse called again on a finished request.
    #[error("request already parsed")]
    AlreadyDone,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ParseError {
    /// Status to answer with before closing, if any.
    ///
    /// Client format faults map to 400 and internal faults to 500. A
    /// truncated stream or I/O failure gets no response since the peer
    /// is already gone.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ParseError::Format(_)
            | ParseError::InvalidCharacter(_)
            | ParseError::Version(_)
            | ParseError::InvalidContentLength(_)
            | ParseError::Framing { .. }
            | ParseError::TooLarge { .. } => Some(StatusCode::BadRequest),
            ParseError::AlreadyDone => Some(StatusCode::InternalServerError),
            ParseError::Incomplete { .. } | ParseError::Io(_) => None,
        }
    }
}

/// Failures raised by [`ResponseWriter`](crate::http::writer::ResponseWriter).
#[derive(Debug, Error)]
pub enum WriteError {
    /// Caller contract violation: a write was issued in the wrong state.
    #[error("out of order write: expected {expected:?}, writer is in {actual:?}")]
    OutOfOrder {
        expected: WriterState,
        actual: WriterState,
    },

    /// Numeric status with no known status line.
    #[error("unsupported status code {0}")]
    UnsupportedStatus(u16),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
