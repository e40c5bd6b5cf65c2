use thiserror::Error;

/// Result type alias for review store operations
pub type Result<T> = std::result::Result<T, ReviewError>;

/// Errors that can occur in review store operations
///
/// `Forbidden` deliberately carries no detail: callers must not be able to
/// distinguish a wrong viewer from a wrong flag by the error message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReviewError {
    /// No review exists for the requested identity tuple
    #[error("review not found")]
    NotFound,

    /// The acting viewer does not own the review and holds no override
    #[error("access denied")]
    Forbidden,

    /// Mutation attempted on a finalized review
    #[error("review already submitted")]
    AlreadySubmitted,

    /// Review comment exceeds the maximum length
    #[error("review text exceeds maximum {max} bytes (length: {length})")]
    TextTooLong {
        /// Maximum allowed length in bytes
        max: usize,
        /// Actual text length in bytes
        length: usize,
    },
}
