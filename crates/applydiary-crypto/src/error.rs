//! Error types for token and password operations.

use thiserror::Error;

/// Cryptographic operation errors.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// Token is malformed, carries a bad signature, or has unusable claims.
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// Token signature is valid but the validity window has passed.
    #[error("Token expired")]
    ExpiredToken,

    /// Password hashing or hash parsing failed.
    #[error("Password hashing failed: {0}")]
    Hashing(String),

    /// `issued_at + ttl` is not a representable instant.
    #[error("Token expiry out of range")]
    ExpiryOutOfRange,

    /// Signing secret or lifetime rejected.
    #[error("Invalid signing secret: {0}")]
    InvalidSecret(String),
}

/// Result type for cryptographic operations.
pub type CryptoResult<T> = Result<T, CryptoError>;

impl From<CryptoError> for applydiary_core::Error {
    fn from(e: CryptoError) -> Self {
        match e {
            CryptoError::InvalidToken(_) | CryptoError::ExpiredToken => {
                applydiary_core::Error::Unauthenticated(e.to_string())
            }
            CryptoError::Hashing(_) | CryptoError::ExpiryOutOfRange => {
                applydiary_core::Error::Internal(e.to_string())
            }
            CryptoError::InvalidSecret(_) => applydiary_core::Error::Config(e.to_string()),
        }
    }
}
