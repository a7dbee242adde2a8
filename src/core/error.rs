use std::fmt;

/// Crate-wide Result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Code carried by every locally produced error record.
pub const LOCAL_ERROR_CODE: i32 = -1;

/// Low-level cause of a failed HTTPS exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// Connection could not be established
    Connect,
    /// The call exceeded its timeout
    Timeout,
    /// Client certificate or key could not be loaded
    Certificate,
    /// Request could not be built or sent
    Request,
    /// Response body could not be read
    Body,
}

impl TransportErrorKind {
    /// curl-compatible error number
    pub fn code(&self) -> i32 {
        match self {
            TransportErrorKind::Connect => 7,
            TransportErrorKind::Timeout => 28,
            TransportErrorKind::Certificate => 58,
            TransportErrorKind::Request => 55,
            TransportErrorKind::Body => 56,
        }
    }
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransportErrorKind::Connect => "connect",
            TransportErrorKind::Timeout => "timeout",
            TransportErrorKind::Certificate => "certificate",
            TransportErrorKind::Request => "request",
            TransportErrorKind::Body => "body",
        };
        write!(f, "{} (code {})", name, self.code())
    }
}

/// Main error type
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// A required request field is missing or malformed
    #[error("Validation error: {0}")]
    Validation(String),

    /// HTTPS exchange with the gateway failed
    #[error("Transport error [{kind}]: {message}")]
    Transport {
        kind: TransportErrorKind,
        message: String,
    },

    /// Payload is not well-formed wire XML
    #[error("Decode error: {0}")]
    Decode(String),

    /// Signature missing or not matching
    #[error("Signature error: {0}")]
    Signature(String),

    /// Gateway answered but did not confirm the operation
    #[error("Gateway error: {0}")]
    Gateway(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

// Helper functions for common error scenarios
impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn transport(kind: TransportErrorKind, msg: impl Into<String>) -> Self {
        AppError::Transport {
            kind,
            message: msg.into(),
        }
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        AppError::Decode(msg.into())
    }

    pub fn signature(msg: impl Into<String>) -> Self {
        AppError::Signature(msg.into())
    }

    pub fn gateway(msg: impl Into<String>) -> Self {
        AppError::Gateway(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }

    /// Error record code; every local failure reports -1
    pub fn code(&self) -> i32 {
        LOCAL_ERROR_CODE
    }

    /// Underlying transport error number, if this is a transport failure
    pub fn transport_code(&self) -> Option<i32> {
        match self {
            AppError::Transport { kind, .. } => Some(kind.code()),
            _ => None,
        }
    }
}
