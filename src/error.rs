//! Error types for JSON commands.
//!
//! Every failed call ends in exactly one of three variants:
//!
//! - [`JsonError::Transport`]: the connection failed (I/O, timeout, the
//!   server hung up). Propagated as-is, never retried.
//! - [`JsonError::Server`]: the server answered with an error reply, for
//!   example a wrong type at the path or malformed JSON. The message is the
//!   server's own text.
//! - [`JsonError::ProtocolMismatch`]: the reply parsed as RESP but does not
//!   have the shape the command defines.
//!
//! A nil reply where a command defines absence is not an error; those
//! operations return `Option`.

use crate::connection::ConnectionError;
use crate::json::reply::Shape;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum JsonError {
    #[error("transport failure: {0}")]
    Transport(#[from] ConnectionError),

    #[error("{0}")]
    Server(String),

    #[error("protocol mismatch: expected {expected}, got {actual}")]
    ProtocolMismatch { expected: Shape, actual: String },
}

impl JsonError {
    pub(crate) fn mismatch(expected: Shape, actual: impl Into<String>) -> Self {
        JsonError::ProtocolMismatch {
            expected,
            actual: actual.into(),
        }
    }

    /// Returns the server's message if this is a server error reply.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            JsonError::Server(msg) => Some(msg),
            _ => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, JsonError::Transport(_))
    }
}

pub type JsonResult<T> = Result<T, JsonError>;
