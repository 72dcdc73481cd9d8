use thiserror::Error;

/// Failure of a password job dispatched to the hashing workers.
#[derive(Debug, Clone, Error)]
pub enum WorkerError {
    #[error("Password worker pool is closed")]
    Closed,

    #[error("Password worker failed: {0}")]
    Join(String),
}

/// Outcome of a credential check that did not produce a user.
///
/// Internal only: callers collapse `NotFound` and `InvalidCredentials`
/// before anything reaches a client.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CredentialError {
    #[error("No user registered with this email")]
    NotFound,

    #[error("Password does not match")]
    InvalidCredentials,

    #[error("Credential check failed: {0}")]
    Unexpected(String),
}

/// Errors surfaced by the session service.
///
/// This is the public boundary of the auth core; store and crypto failures
/// are folded into `Unexpected`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Email already registered")]
    DuplicateEmail,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl From<WorkerError> for SessionError {
    fn from(err: WorkerError) -> Self {
        SessionError::Unexpected(err.to_string())
    }
}

impl From<WorkerError> for CredentialError {
    fn from(err: WorkerError) -> Self {
        CredentialError::Unexpected(err.to_string())
    }
}
