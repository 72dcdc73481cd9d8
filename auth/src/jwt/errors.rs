use thiserror::Error;

/// Error type for JWT operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JwtError {
    /// No signing secret was configured for a token class.
    #[error("Missing signing secret for {0} tokens")]
    MissingSecret(String),

    /// Both token classes were given the same secret.
    #[error("Access and refresh tokens must be signed with different secrets")]
    SharedSecret,

    #[error("Token lifetime reaches past the representable range")]
    ExpiryOutOfRange,

    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token is expired")]
    TokenExpired,

    /// Signature, issuer, audience, algorithm or structure did not check out.
    #[error("Token is invalid: {0}")]
    InvalidToken(String),
}
