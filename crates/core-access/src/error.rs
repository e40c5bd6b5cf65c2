use thiserror::Error;

/// Result type alias for access-control operations
pub type Result<T> = std::result::Result<T, AccessError>;

/// Errors that can occur in access-control operations
///
/// `Unauthenticated` and `Forbidden` deliberately display the same
/// message: a client probing with bad tokens must not be able to tell a
/// rejected credential from an out-of-scope request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccessError {
    /// Bad, revoked, or unknown bearer credential, or unknown principal
    #[error("access denied")]
    Unauthenticated,

    /// Authenticated but outside the granted scope or permission set
    #[error("access denied")]
    Forbidden,

    /// Referenced token does not exist
    #[error("token not found")]
    NotFound,

    /// Malformed issuance or account request
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Token identifier generation exhausted its collision retries
    #[error("could not generate a unique token identifier")]
    IdGeneration,
}
