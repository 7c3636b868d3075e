//! Error types for xmlobj

use std::fmt;
use thiserror::Error;

/// Error kind for detailed categorization
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// A caller handed in something the operation cannot work with
    InvalidArgument { reason: String },
    /// Text left over once every recognized tag was removed
    UnexpectedTokens { tokens: String },
    /// Not a single tag was recognized
    NoKeys,
    InvalidEntity { entity: String },
    MaxDepthExceeded { max: u16 },
    MaxSizeExceeded { max: usize },
    /// JSON text could not be read or written
    Json { message: String },
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument { reason } => write!(f, "invalid argument: {reason}"),
            Self::UnexpectedTokens { tokens } => write!(f, "unexpected tokens: {tokens}"),
            Self::NoKeys => write!(f, "given text has no keys"),
            Self::InvalidEntity { entity } => write!(f, "invalid entity: &{entity};"),
            Self::MaxDepthExceeded { max } => write!(f, "max depth exceeded: {max}"),
            Self::MaxSizeExceeded { max } => write!(f, "max size exceeded: {max}"),
            Self::Json { message } => write!(f, "json error: {message}"),
        }
    }
}

/// Main error type for xmlobj
#[derive(Error, Clone, Debug, PartialEq)]
pub struct Error {
    kind: ErrorKind,
    message: String,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        let message = kind.to_string();
        Self { kind, message }
    }

    pub fn with_message(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArgument {
            reason: reason.into(),
        })
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// True for the wrong-input class of failures
    pub fn is_argument_error(&self) -> bool {
        matches!(self.kind, ErrorKind::InvalidArgument { .. })
    }

    /// True for malformed XML, including limit violations
    pub fn is_parsing_error(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::UnexpectedTokens { .. }
                | ErrorKind::NoKeys
                | ErrorKind::InvalidEntity { .. }
                | ErrorKind::MaxDepthExceeded { .. }
                | ErrorKind::MaxSizeExceeded { .. }
        )
    }

    pub(crate) fn is_limit(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::MaxDepthExceeded { .. } | ErrorKind::MaxSizeExceeded { .. }
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::new(ErrorKind::Json {
            message: err.to_string(),
        })
    }
}

/// Result type alias for xmlobj
pub type Result<T> = std::result::Result<T, Error>;
