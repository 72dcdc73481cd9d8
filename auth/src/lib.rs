//! Authentication utilities library
//!
//! Provides the credential and token primitives used by the auth service:
//! - Password hashing (Argon2id, configurable cost)
//! - JWT access/refresh token generation and validation, one secret per class
//! - Authentication coordination
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hash).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## Token Pairs
//! ```
//! use auth::{Authenticator, Identity, PasswordHasher, TokenClass, TokenSettings, TokenSigner};
//! use chrono::Duration;
//!
//! let signer = TokenSigner::new(
//!     "issuer",
//!     "audience",
//!     TokenSettings { secret: "access_secret_at_least_32_bytes_long!".into(), ttl: Duration::minutes(15) },
//!     TokenSettings { secret: "refresh_secret_at_least_32_bytes_long".into(), ttl: Duration::days(7) },
//! )
//! .unwrap();
//! let auth = Authenticator::new(PasswordHasher::new(), signer);
//!
//! let hash = auth.hash_password("Abcd1234").unwrap();
//! let identity = Identity {
//!     id: "42".into(),
//!     email: "a@x.com".into(),
//!     first_name: "Ada".into(),
//!     last_name: "Lovelace".into(),
//! };
//! auth.verify_password("Abcd1234", &hash).unwrap();
//! let pair = auth.issue_pair(&identity).unwrap();
//!
//! let claims = auth.validate_token(TokenClass::Refresh, &pair.refresh.token).unwrap();
//! assert_eq!(claims.sub, "42");
//! assert!(auth.validate_token(TokenClass::Access, &pair.refresh.token).is_err());
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::Authenticator;
pub use jwt::Claims;
pub use jwt::Identity;
pub use jwt::IssuedToken;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use jwt::TokenClass;
pub use jwt::TokenPair;
pub use jwt::TokenSettings;
pub use jwt::TokenSigner;
pub use password::PasswordError;
pub use password::PasswordHasher;
