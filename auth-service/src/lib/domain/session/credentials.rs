use std::sync::Arc;

use auth::AuthenticationError;
use auth::Authenticator;
use tokio::sync::OnceCell;

use crate::domain::session::errors::CredentialError;
use crate::domain::session::workers::PasswordWorkers;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::User;
use crate::domain::user::ports::UserRepository;

/// Plaintext behind the hash checked when the email is unknown.
const DECOY_PASSWORD: &str = "decoy-password-never-assigned";

/// Looks a user up by email and checks the password against the stored hash.
///
/// An unknown email still costs one Argon2 verification, against a decoy
/// hash made once with the configured parameters.
pub struct CredentialValidator<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    authenticator: Arc<Authenticator>,
    workers: PasswordWorkers,
    decoy_hash: OnceCell<String>,
}

impl<UR> CredentialValidator<UR>
where
    UR: UserRepository,
{
    pub fn new(
        repository: Arc<UR>,
        authenticator: Arc<Authenticator>,
        workers: PasswordWorkers,
    ) -> Self {
        Self {
            repository,
            authenticator,
            workers,
            decoy_hash: OnceCell::new(),
        }
    }

    /// Return the user owning `email` if `password` matches.
    ///
    /// # Errors
    /// * `NotFound` - No user with this email
    /// * `InvalidCredentials` - Password mismatch
    /// * `Unexpected` - Store failure, unreadable stored hash or worker failure
    pub async fn authenticate(
        &self,
        email: &EmailAddress,
        password: String,
    ) -> Result<User, CredentialError> {
        let found = self
            .repository
            .find_by_email(email)
            .await
            .map_err(|e| CredentialError::Unexpected(e.to_string()))?;

        let Some(user) = found else {
            self.verify_decoy(password).await?;
            return Err(CredentialError::NotFound);
        };

        let authenticator = Arc::clone(&self.authenticator);
        let stored_hash = user.password_hash.clone();
        let verification = self
            .workers
            .run(move || authenticator.verify_password(&password, &stored_hash))
            .await?;

        match verification {
            Ok(()) => Ok(user),
            Err(AuthenticationError::InvalidCredentials) => Err(CredentialError::InvalidCredentials),
            Err(e) => Err(CredentialError::Unexpected(e.to_string())),
        }
    }

    /// Run a verification whose outcome is thrown away.
    async fn verify_decoy(&self, password: String) -> Result<(), CredentialError> {
        let decoy_hash = self
            .decoy_hash
            .get_or_try_init(|| async {
                let authenticator = Arc::clone(&self.authenticator);
                self.workers
                    .run(move || authenticator.hash_password(DECOY_PASSWORD))
                    .await?
                    .map_err(|e| CredentialError::Unexpected(e.to_string()))
            })
            .await?
            .clone();

        let authenticator = Arc::clone(&self.authenticator);
        let _ = self
            .workers
            .run(move || authenticator.verify_password(&password, &decoy_hash))
            .await?;

        Ok(())
    }
}
