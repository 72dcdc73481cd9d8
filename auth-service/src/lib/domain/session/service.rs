use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;
use auth::IssuedToken;
use chrono::Utc;

use crate::domain::session::credentials::CredentialValidator;
use crate::domain::session::errors::CredentialError;
use crate::domain::session::errors::SessionError;
use crate::domain::session::models::IssuedSession;
use crate::domain::session::models::LoginCommand;
use crate::domain::session::models::RegisterCommand;
use crate::domain::session::ports::SessionServicePort;
use crate::domain::session::workers::PasswordWorkers;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;
use crate::user::ports::UserRepository;

/// Domain service implementation for session operations.
///
/// Concrete implementation of SessionServicePort with dependency injection.
pub struct SessionService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    authenticator: Arc<Authenticator>,
    credentials: CredentialValidator<UR>,
    workers: PasswordWorkers,
}

impl<UR> SessionService<UR>
where
    UR: UserRepository,
{
    /// Create a new session service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User persistence implementation
    /// * `authenticator` - Password hasher and token signer
    /// * `workers` - Pool running password hashing and verification
    pub fn new(
        repository: Arc<UR>,
        authenticator: Arc<Authenticator>,
        workers: PasswordWorkers,
    ) -> Self {
        let credentials = CredentialValidator::new(
            Arc::clone(&repository),
            Arc::clone(&authenticator),
            workers.clone(),
        );

        Self {
            repository,
            authenticator,
            credentials,
            workers,
        }
    }

    fn open_session(&self, user: &User) -> Result<IssuedSession, SessionError> {
        let pair = self
            .authenticator
            .issue_pair(&user.identity())
            .map_err(|e| SessionError::Unexpected(format!("Token signing failed: {}", e)))?;

        Ok(IssuedSession {
            user_id: user.id,
            access_token: pair.access,
            refresh_token: pair.refresh,
        })
    }
}

#[async_trait]
impl<UR> SessionServicePort for SessionService<UR>
where
    UR: UserRepository,
{
    async fn login(&self, command: LoginCommand) -> Result<IssuedSession, SessionError> {
        let user = match self
            .credentials
            .authenticate(&command.email, command.password)
            .await
        {
            Ok(user) => user,
            Err(CredentialError::NotFound) | Err(CredentialError::InvalidCredentials) => {
                tracing::info!("Rejected login for {}", command.email);
                return Err(SessionError::InvalidCredentials);
            }
            Err(CredentialError::Unexpected(e)) => {
                tracing::error!("Login for {} failed: {}", command.email, e);
                return Err(SessionError::Unexpected(e));
            }
        };

        self.open_session(&user)
    }

    async fn register(&self, command: RegisterCommand) -> Result<IssuedSession, SessionError> {
        let authenticator = Arc::clone(&self.authenticator);
        let password = command.password;
        let password_hash = self
            .workers
            .run(move || authenticator.hash_password(password.expose()))
            .await?
            .map_err(|e| SessionError::Unexpected(format!("Password hashing failed: {}", e)))?;

        let user = User {
            id: UserId::new(),
            first_name: command.first_name,
            last_name: command.last_name,
            email: command.email,
            password_hash,
            created_at: Utc::now(),
        };

        let created_user = match self.repository.create(user).await {
            Ok(user) => user,
            Err(UserError::EmailAlreadyExists(email)) => {
                tracing::info!("Registration rejected, {} already registered", email);
                return Err(SessionError::DuplicateEmail);
            }
            Err(e) => {
                tracing::error!("Failed to store new user: {}", e);
                return Err(SessionError::Unexpected(e.to_string()));
            }
        };

        self.open_session(&created_user)
    }

    async fn refresh(&self, user_id: &UserId) -> Result<IssuedToken, SessionError> {
        let user = self
            .repository
            .find_by_id(user_id)
            .await
            .map_err(|e| SessionError::Unexpected(e.to_string()))?
            .ok_or_else(|| {
                tracing::warn!("Refresh requested for unknown user {}", user_id);
                SessionError::Unauthorized
            })?;

        self.authenticator
            .issue_access(&user.identity())
            .map_err(|e| SessionError::Unexpected(format!("Token signing failed: {}", e)))
    }
}
