use thiserror::Error;

/// Error type for token operations.
///
/// `InvalidToken` and `MalformedToken` deliberately carry no detail: the
/// boundary layer maps them straight to responses, and a rejection must
/// not reveal whether a signature almost verified.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Invalid signing key: {0}")]
    InvalidKey(String),

    #[error("Token is malformed")]
    MalformedToken,

    #[error("Token is invalid")]
    InvalidToken,

    #[error("Token is expired")]
    TokenExpired,
}
