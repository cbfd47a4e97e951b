//! Per-connection failures.
//!
//! Every error here is contained within the connection that produced it. The
//! listener never sees them; they only decide which status, if any, is sent
//! before the connection is closed.

use std::fmt;
use std::io;

use crate::http::parser::ParseError;
use crate::http::resolver::ResolveError;
use crate::http::response::StatusCode;

#[derive(Debug)]
pub enum ServeError {
    /// The read failed, timed out, or the peer sent nothing.
    Receive(Option<io::Error>),
    /// No request path could be extracted.
    Malformed(ParseError),
    /// The path does not resolve to a readable regular file under the root.
    NotFound,
    /// The file exists but the process may not read it.
    Permission,
    /// Opening or compressing the file failed for another reason.
    Internal(String),
    /// Writing the response failed or fewer body bytes than declared were sent.
    Transfer(io::Error),
    /// The overall request deadline elapsed.
    Timeout,
}

impl ServeError {
    /// The status to report to the client, or `None` when the connection
    /// should simply be closed.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ServeError::Malformed(_) => Some(StatusCode::BadRequest),
            ServeError::NotFound => Some(StatusCode::NotFound),
            ServeError::Permission => Some(StatusCode::Forbidden),
            ServeError::Internal(_) => Some(StatusCode::InternalServerError),
            ServeError::Receive(_) | ServeError::Transfer(_) | ServeError::Timeout => None,
        }
    }
}

impl fmt::Display for ServeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServeError::Receive(Some(e)) => write!(f, "receive failed: {e}"),
            ServeError::Receive(None) => write!(f, "no request data received"),
            ServeError::Malformed(e) => write!(f, "malformed request: {e}"),
            ServeError::NotFound => write!(f, "file not found"),
            ServeError::Permission => write!(f, "permission denied"),
            ServeError::Internal(msg) => write!(f, "internal error: {msg}"),
            ServeError::Transfer(e) => write!(f, "transfer failed: {e}"),
            ServeError::Timeout => write!(f, "request timed out"),
        }
    }
}

impl std::error::Error for ServeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ServeError::Receive(Some(e)) | ServeError::Transfer(e) => Some(e),
            ServeError::Malformed(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ParseError> for ServeError {
    fn from(e: ParseError) -> Self {
        ServeError::Malformed(e)
    }
}

impl From<ResolveError> for ServeError {
    fn from(e: ResolveError) -> Self {
        match e {
            ResolveError::NotFound | ResolveError::OutsideRoot => ServeError::NotFound,
            ResolveError::Permission => ServeError::Permission,
            ResolveError::Io(e) => ServeError::Internal(e.to_string()),
        }
    }
}
