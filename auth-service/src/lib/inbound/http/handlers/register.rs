use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use thiserror::Error;

use super::ApiError;
use super::ApiSuccess;
use super::TokenResponseData;
use crate::domain::session::models::RegisterCommand;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::NewPassword;
use crate::domain::user::models::PersonName;
use crate::inbound::http::cookie::set_refresh_cookie;
use crate::inbound::http::router::AppState;
use crate::user::errors::EmailError;
use crate::user::errors::NameError;
use crate::user::errors::PasswordPolicyError;

pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(CookieJar, ApiSuccess<TokenResponseData>), ApiError> {
    let Json(body) = body.map_err(|rejection| ApiError::UnprocessableEntity(rejection.body_text()))?;
    let session = state
        .session_service
        .register(body.try_into_command()?)
        .await?;

    tracing::info!(user_id = %session.user_id, "User registered");

    Ok((
        set_refresh_cookie(jar, &session.refresh_token),
        ApiSuccess::new(
            StatusCode::CREATED,
            "Registration completed successfully.",
            session.access_token.into(),
        ),
    ))
}

/// HTTP request body for registration (raw JSON)
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    first_name: String,
    last_name: String,
    email: String,
    password: String,
    confirm_password: String,
}

#[derive(Debug, Clone, Error)]
enum ParseRegisterRequestError {
    #[error("{0}")]
    Name(#[from] NameError),

    #[error("Invalid email: {0}")]
    Email(#[from] EmailError),

    #[error("Invalid password: {0}")]
    Password(#[from] PasswordPolicyError),
}

impl RegisterRequest {
    fn try_into_command(self) -> Result<RegisterCommand, ParseRegisterRequestError> {
        Ok(RegisterCommand {
            first_name: PersonName::new("First name", self.first_name)?,
            last_name: PersonName::new("Last name", self.last_name)?,
            email: EmailAddress::new(self.email)?,
            password: NewPassword::new(self.password, &self.confirm_password)?,
        })
    }
}

impl From<ParseRegisterRequestError> for ApiError {
    fn from(err: ParseRegisterRequestError) -> Self {
        ApiError::UnprocessableEntity(err.to_string())
    }
}
