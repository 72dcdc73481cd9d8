use async_trait::async_trait;
use auth::IssuedToken;

use crate::domain::session::errors::SessionError;
use crate::domain::session::models::IssuedSession;
use crate::domain::session::models::LoginCommand;
use crate::domain::session::models::RegisterCommand;
use crate::domain::user::models::UserId;

/// Port for session lifecycle operations.
#[async_trait]
pub trait SessionServicePort: Send + Sync + 'static {
    /// Check credentials and mint an access/refresh token pair.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password, indistinguishably
    /// * `Unexpected` - Store, hashing or signing failure
    async fn login(&self, command: LoginCommand) -> Result<IssuedSession, SessionError>;

    /// Create a user and mint its first token pair.
    ///
    /// # Errors
    /// * `DuplicateEmail` - Email already registered, nothing created
    /// * `Unexpected` - Store, hashing or signing failure
    async fn register(&self, command: RegisterCommand) -> Result<IssuedSession, SessionError>;

    /// Mint a new access token for a user whose refresh token has already
    /// been verified. Claims are rebuilt from the current user record.
    ///
    /// # Errors
    /// * `Unauthorized` - The user no longer exists
    /// * `Unexpected` - Store or signing failure
    async fn refresh(&self, user_id: &UserId) -> Result<IssuedToken, SessionError>;
}
