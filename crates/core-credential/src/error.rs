use thiserror::Error;

/// Result type alias for credential operations
pub type Result<T> = std::result::Result<T, CredentialError>;

/// Errors that can occur while encoding credentials
#[derive(Error, Debug)]
pub enum CredentialError {
    /// The underlying hasher rejected the input
    #[error("error encoding credential: {0}")]
    Encoding(String),

    /// Empty passwords are never accepted
    #[error("empty password")]
    EmptyPassword,
}
