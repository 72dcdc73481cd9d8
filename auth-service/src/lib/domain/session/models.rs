use std::fmt;

use auth::IssuedToken;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::NewPassword;
use crate::domain::user::models::PersonName;
use crate::domain::user::models::UserId;

/// Command to open a session with email and password.
pub struct LoginCommand {
    pub email: EmailAddress,
    pub password: String,
}

impl LoginCommand {
    pub fn new(email: EmailAddress, password: String) -> Self {
        Self { email, password }
    }
}

impl fmt::Debug for LoginCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCommand")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Command to create an account and open its first session.
#[derive(Debug)]
pub struct RegisterCommand {
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub email: EmailAddress,
    pub password: NewPassword,
}

/// Tokens minted for a freshly authenticated user.
///
/// The access token goes into the response body; the refresh token only
/// ever travels in the refresh cookie.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub user_id: UserId,
    pub access_token: IssuedToken,
    pub refresh_token: IssuedToken,
}
