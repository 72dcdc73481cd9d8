use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::TokenResponseData;
use super::INVALID_CREDENTIALS;
use crate::domain::session::models::LoginCommand;
use crate::domain::user::models::EmailAddress;
use crate::inbound::http::cookie::set_refresh_cookie;
use crate::inbound::http::router::AppState;

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<(CookieJar, ApiSuccess<TokenResponseData>), ApiError> {
    // An unreadable body is just another failed login
    let Json(body) = body.map_err(|rejection| {
        tracing::debug!("Login body rejected: {}", rejection.body_text());
        ApiError::Unauthorized(INVALID_CREDENTIALS.to_string())
    })?;
    let session = state.session_service.login(body.try_into_command()?).await?;

    tracing::info!(user_id = %session.user_id, "User logged in");

    Ok((
        set_refresh_cookie(jar, &session.refresh_token),
        ApiSuccess::new(
            StatusCode::OK,
            "Login completed successfully.",
            session.access_token.into(),
        ),
    ))
}

#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    email: String,
    password: String,
}

impl LoginRequest {
    /// A malformed email or empty password is just another failed login.
    fn try_into_command(self) -> Result<LoginCommand, ApiError> {
        let rejected = || ApiError::Unauthorized(INVALID_CREDENTIALS.to_string());

        let email = EmailAddress::new(self.email).map_err(|_| rejected())?;
        if self.password.is_empty() {
            return Err(rejected());
        }

        Ok(LoginCommand::new(email, self.password))
    }
}
