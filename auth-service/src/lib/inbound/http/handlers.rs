use auth::IssuedToken;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Serialize;

use crate::session::errors::SessionError;

pub mod login;
pub mod logout;
pub mod me;
pub mod refresh_token;
pub mod register;

/// Message returned for every failed login or rejected registration.
pub const INVALID_CREDENTIALS: &str = "Invalid credentials.";

/// Message returned when a guard or extractor rejects a request.
pub const UNAUTHORIZED: &str = "Unauthorized";

/// Message returned for any unexpected fault. Details stay in the logs.
pub const UNEXPECTED_FAULT: &str = "An error occurred.";

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, message: &str, data: T) -> Self {
        ApiSuccess(
            status,
            Json(ApiResponseBody::new(status, message, Some(data))),
        )
    }

    pub fn without_data(status: StatusCode, message: &str) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(status, message, None)))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Carries the internal detail for the log; the client only sees a
    /// generic message.
    InternalServerError(String),
    UnprocessableEntity(String),
    Unauthorized(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InternalServerError(detail) => {
                tracing::error!("Request failed: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    UNEXPECTED_FAULT.to_string(),
                )
            }
            ApiError::UnprocessableEntity(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
        };

        (status, Json(ApiResponseBody::new_error(status, message))).into_response()
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        match err {
            // Duplicate emails are reported like bad credentials so that
            // registration cannot be used to probe for accounts
            SessionError::InvalidCredentials | SessionError::DuplicateEmail => {
                ApiError::Unauthorized(INVALID_CREDENTIALS.to_string())
            }
            SessionError::Unauthorized => ApiError::Unauthorized(UNAUTHORIZED.to_string()),
            SessionError::Unexpected(detail) => ApiError::InternalServerError(detail),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    status_code: u16,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(status_code: StatusCode, message: &str, data: Option<T>) -> Self {
        Self {
            status_code: status_code.as_u16(),
            message: message.to_string(),
            data,
        }
    }
}

impl ApiResponseBody<ApiErrorData> {
    pub fn new_error(status_code: StatusCode, message: String) -> Self {
        Self {
            status_code: status_code.as_u16(),
            message: message.clone(),
            data: Some(ApiErrorData { message }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub message: String,
}

/// Body of every response that hands out an access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenResponseData {
    #[serde(rename = "accessToken")]
    pub access_token: String,
}

impl From<IssuedToken> for TokenResponseData {
    fn from(token: IssuedToken) -> Self {
        Self {
            access_token: token.token,
        }
    }
}
