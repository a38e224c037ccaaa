//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
///
/// Each variant corresponds to one error kind of the filing domain; the
/// message carried by a variant is what callers see on the wire, so
/// validation and precondition variants must name the offending field or
/// condition, and internal variants must not leak internals.
#[derive(Debug, Error)]
pub enum AppError {
    /// Structural or semantic failure of caller input.
    #[error("{0}")]
    Validation(String),

    /// Caller lacks the required permission.
    #[error("{0}")]
    Unauthorized(String),

    /// Permissioned operation refused (closed transaction, AV not clean,
    /// disallowed company state).
    #[error("{0}")]
    Forbidden(String),

    /// Named entity absent.
    #[error("{0}")]
    NotFound(String),

    /// Uniqueness or multiplicity invariant breach.
    #[error("{0}")]
    Conflict(String),

    /// ETag mismatch on a conditional operation.
    #[error("{0}")]
    PreconditionFailed(String),

    /// An upstream service failed in a non-translatable way. The upstream
    /// status is logged at the call site; callers only see a 500.
    #[error("upstream service error: {0}")]
    Dependency(String),

    /// Unexpected failure (decode of supposedly valid data, store
    /// inconsistency, cancellation, panic).
    #[error("internal server error")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::Unauthorized(_) => 401,
            Self::Forbidden(_) => 403,
            Self::NotFound(_) => 404,
            Self::Conflict(_) => 409,
            Self::PreconditionFailed(_) => 412,
            Self::Dependency(_) | Self::Internal(_) => 500,
        }
    }

    /// The message to put on the wire. Internal detail stays out of
    /// responses; the payload of `Internal` is for logs only.
    #[must_use]
    pub fn wire_message(&self) -> String {
        match self {
            Self::Internal(_) => "internal server error".to_string(),
            other => other.to_string(),
        }
    }

    /// Create an internal error from any displayable cause.
    #[must_use]
    pub fn internal(cause: impl std::fmt::Display) -> Self {
        Self::Internal(cause.to_string())
    }
}
