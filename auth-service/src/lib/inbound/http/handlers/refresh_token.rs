use axum::extract::State;
use axum::http::StatusCode;

use super::ApiError;
use super::ApiSuccess;
use super::TokenResponseData;
use crate::inbound::http::guard::CurrentUser;
use crate::inbound::http::router::AppState;

/// Mint a new access token for the holder of a verified refresh token.
///
/// The refresh cookie itself is left untouched.
pub async fn refresh_token(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> Result<ApiSuccess<TokenResponseData>, ApiError> {
    let access_token = state.session_service.refresh(&current_user.id).await?;

    tracing::debug!(user_id = %current_user.id, "Access token refreshed");

    Ok(ApiSuccess::new(
        StatusCode::OK,
        "Access token refreshed successfully.",
        access_token.into(),
    ))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use auth::IssuedToken;
    use chrono::Utc;
    use mockall::mock;

    use super::*;
    use crate::domain::session::errors::SessionError;
    use crate::domain::session::models::IssuedSession;
    use crate::domain::session::models::LoginCommand;
    use crate::domain::session::models::RegisterCommand;
    use crate::domain::session::ports::SessionServicePort;
    use crate::domain::user::models::UserId;
    use crate::inbound::http::handlers::UNAUTHORIZED;

    mock! {
        pub TestSessionService {}

        #[async_trait]
        impl SessionServicePort for TestSessionService {
            async fn login(&self, command: LoginCommand) -> Result<IssuedSession, SessionError>;
            async fn register(&self, command: RegisterCommand) -> Result<IssuedSession, SessionError>;
            async fn refresh(&self, user_id: &UserId) -> Result<IssuedToken, SessionError>;
        }
    }

    fn current_user(id: UserId) -> CurrentUser {
        CurrentUser {
            id,
            email: "a@x.com".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
        }
    }

    #[tokio::test]
    async fn test_refresh_token_success() {
        let user_id = UserId::new();
        let mut service = MockTestSessionService::new();
        service
            .expect_refresh()
            .withf(move |id| *id == user_id)
            .times(1)
            .returning(|_| {
                Ok(IssuedToken {
                    token: "new.access.token".to_string(),
                    expires_at: Utc::now(),
                })
            });

        let state = AppState {
            session_service: Arc::new(service),
        };

        let result = refresh_token(State(state), current_user(user_id)).await;

        assert_eq!(
            result,
            Ok(ApiSuccess::new(
                StatusCode::OK,
                "Access token refreshed successfully.",
                TokenResponseData {
                    access_token: "new.access.token".to_string(),
                },
            ))
        );
    }

    #[tokio::test]
    async fn test_refresh_token_unknown_user() {
        let mut service = MockTestSessionService::new();
        service
            .expect_refresh()
            .times(1)
            .returning(|_| Err(SessionError::Unauthorized));

        let state = AppState {
            session_service: Arc::new(service),
        };

        let result = refresh_token(State(state), current_user(UserId::new())).await;

        assert_eq!(
            result.unwrap_err(),
            ApiError::Unauthorized(UNAUTHORIZED.to_string())
        );
    }
}
