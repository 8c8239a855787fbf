//! Shared error type across resbind crates.

use thiserror::Error;

/// Host-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Invalid input / malformed attributes / bad config.
    BadRequest,
    /// Unsupported config version.
    UnsupportedVersion,
    /// Remote client could not be constructed.
    ClientBuild,
    /// Remote request was rejected or never reached the service.
    SubmitFailed,
    /// Long-running operation finished with an error.
    OperationFailed,
    /// Internal error.
    Internal,
}

impl ErrorCode {
    /// String representation used in JSON responses.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::BadRequest => "BAD_REQUEST",
            ErrorCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ErrorCode::ClientBuild => "CLIENT_BUILD",
            ErrorCode::SubmitFailed => "SUBMIT_FAILED",
            ErrorCode::OperationFailed => "OPERATION_FAILED",
            ErrorCode::Internal => "INTERNAL",
        }
    }

    /// True for failures that originate at the remote compute service.
    pub fn is_remote(self) -> bool {
        matches!(
            self,
            ErrorCode::ClientBuild | ErrorCode::SubmitFailed | ErrorCode::OperationFailed
        )
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, ResBindError>;

/// Unified error type used by core and provider.
///
/// Remote failures keep the service's message verbatim so the host can
/// present it to the operator unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResBindError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("compute client: {0}")]
    ClientBuild(String),
    #[error("{0}")]
    Submit(String),
    #[error("{0}")]
    Operation(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl ResBindError {
    /// Map to a stable host-facing code.
    pub fn code(&self) -> ErrorCode {
        match self {
            ResBindError::BadRequest(_) => ErrorCode::BadRequest,
            ResBindError::UnsupportedVersion => ErrorCode::UnsupportedVersion,
            ResBindError::ClientBuild(_) => ErrorCode::ClientBuild,
            ResBindError::Submit(_) => ErrorCode::SubmitFailed,
            ResBindError::Operation(_) => ErrorCode::OperationFailed,
            ResBindError::Internal(_) => ErrorCode::Internal,
        }
    }
}
