use chrono::Utc;

use crate::jwt::Claims;
use crate::jwt::Identity;
use crate::jwt::IssuedToken;
use crate::jwt::JwtError;
use crate::jwt::TokenClass;
use crate::jwt::TokenPair;
use crate::jwt::TokenSigner;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Authentication coordinator combining password verification and JWT generation.
///
/// Provides high-level authentication operations by coordinating
/// password hashing and the two-class token signer.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    token_signer: TokenSigner,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `password_hasher` - Hasher configured with the desired cost
    /// * `token_signer` - Signer holding both token class secrets
    pub fn new(password_hasher: PasswordHasher, token_signer: TokenSigner) -> Self {
        Self {
            password_hasher,
            token_signer,
        }
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Check a plaintext password against a stored hash.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `PasswordError` - Stored hash is unreadable
    pub fn verify_password(
        &self,
        password: &str,
        stored_hash: &str,
    ) -> Result<(), AuthenticationError> {
        if self.password_hasher.verify(password, stored_hash)? {
            Ok(())
        } else {
            Err(AuthenticationError::InvalidCredentials)
        }
    }

    /// Mint an access and a refresh token sharing the current instant as
    /// issued-at. No password check.
    pub fn issue_pair(&self, identity: &Identity) -> Result<TokenPair, JwtError> {
        self.token_signer.sign_pair(identity, Utc::now())
    }

    /// Mint a fresh access token only.
    ///
    /// Used by the refresh flow once the refresh token has been verified by
    /// other means.
    pub fn issue_access(&self, identity: &Identity) -> Result<IssuedToken, JwtError> {
        self.token_signer
            .sign(TokenClass::Access, identity, Utc::now())
    }

    /// Validate a token of the given class and return its claims.
    ///
    /// # Errors
    /// * `JwtError` - Token validation or decoding failed
    pub fn validate_token(&self, class: TokenClass, token: &str) -> Result<Claims, JwtError> {
        self.token_signer.verify(class, token)
    }
}
