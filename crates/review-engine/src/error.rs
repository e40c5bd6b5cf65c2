use core_access::AccessError;
use core_credential::CredentialError;
use core_review::ReviewError;
use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors surfaced by the service layer.
///
/// Wraps the component errors unchanged so their display contracts hold:
/// authentication and authorization failures both read "access denied",
/// while submission and argument errors stay distinguishable.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Review store failure
    #[error(transparent)]
    Review(#[from] ReviewError),

    /// Authentication or authorization failure
    #[error(transparent)]
    Access(#[from] AccessError),

    /// Credential encoding failure
    #[error(transparent)]
    Credential(#[from] CredentialError),
}
