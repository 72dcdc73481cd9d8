use std::sync::Arc;

use auth::Authenticator;
use auth::Claims;
use auth::JwtError;
use auth::TokenClass;
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use thiserror::Error;

use super::cookie::read_refresh_cookie;
use super::handlers::ApiError;
use super::handlers::UNAUTHORIZED;
use crate::domain::user::models::UserId;
use crate::user::errors::UserIdError;

/// Access requirement declared for a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAccess {
    /// No token is looked at.
    Public,
    /// A valid token of this class is required.
    Protected(TokenClass),
}

/// Where a guard looks for its token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    AuthorizationBearer,
    RefreshCookie,
}

/// Identity of the caller, decoded from a verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: UserId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl TryFrom<Claims> for CurrentUser {
    type Error = UserIdError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        Ok(Self {
            id: UserId::from_string(&claims.sub)?,
            email: claims.email,
            first_name: claims.first_name,
            last_name: claims.last_name,
        })
    }
}

#[derive(Debug, Error)]
pub enum GuardRejection {
    #[error("No token presented")]
    MissingToken,

    #[error("Authorization header is not a bearer token")]
    MalformedHeader,

    #[error(transparent)]
    Token(#[from] JwtError),

    #[error("Token subject is not a user id: {0}")]
    InvalidSubject(#[from] UserIdError),
}

/// Verifies one token class taken from one source.
pub struct TokenGuard {
    class: TokenClass,
    source: TokenSource,
    authenticator: Arc<Authenticator>,
}

impl TokenGuard {
    pub fn new(class: TokenClass, source: TokenSource, authenticator: Arc<Authenticator>) -> Self {
        Self {
            class,
            source,
            authenticator,
        }
    }

    /// Access tokens come from the `Authorization: Bearer` header.
    pub fn access(authenticator: Arc<Authenticator>) -> Self {
        Self::new(
            TokenClass::Access,
            TokenSource::AuthorizationBearer,
            authenticator,
        )
    }

    /// Refresh tokens come from the refresh cookie and nowhere else.
    pub fn refresh(authenticator: Arc<Authenticator>) -> Self {
        Self::new(TokenClass::Refresh, TokenSource::RefreshCookie, authenticator)
    }

    /// Extract the token, verify it with this class's secret and decode the
    /// caller.
    pub fn check(&self, headers: &HeaderMap) -> Result<CurrentUser, GuardRejection> {
        let token = match self.source {
            TokenSource::AuthorizationBearer => bearer_token(headers)?,
            TokenSource::RefreshCookie => {
                read_refresh_cookie(headers).ok_or(GuardRejection::MissingToken)?
            }
        };

        let claims = self.authenticator.validate_token(self.class, &token)?;

        Ok(CurrentUser::try_from(claims)?)
    }
}

fn bearer_token(headers: &HeaderMap) -> Result<String, GuardRejection> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(GuardRejection::MissingToken)?
        .to_str()
        .map_err(|_| GuardRejection::MalformedHeader)?;

    match value.strip_prefix("Bearer ").map(str::trim) {
        Some(token) if !token.is_empty() => Ok(token.to_string()),
        _ => Err(GuardRejection::MalformedHeader),
    }
}

/// The guard for each token class.
pub struct Guards {
    access: TokenGuard,
    refresh: TokenGuard,
}

impl Guards {
    pub fn new(authenticator: Arc<Authenticator>) -> Self {
        Self {
            access: TokenGuard::access(Arc::clone(&authenticator)),
            refresh: TokenGuard::refresh(authenticator),
        }
    }

    pub fn for_class(&self, class: TokenClass) -> &TokenGuard {
        match class {
            TokenClass::Access => &self.access,
            TokenClass::Refresh => &self.refresh,
        }
    }
}

/// Middleware state: the route's declared access plus the shared guards.
#[derive(Clone)]
pub struct RouteGuard {
    pub access: RouteAccess,
    pub guards: Arc<Guards>,
}

/// Middleware run in front of every route.
///
/// Public routes pass straight through. Protected routes get a
/// [`CurrentUser`] in the request extensions or a 401.
pub async fn guard(
    State(route): State<RouteGuard>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let class = match route.access {
        RouteAccess::Public => return Ok(next.run(req).await),
        RouteAccess::Protected(class) => class,
    };

    let current_user = route
        .guards
        .for_class(class)
        .check(req.headers())
        .map_err(|e| {
            tracing::warn!(
                token_class = %class,
                path = %req.uri().path(),
                "Token verification failed: {}",
                e
            );
            ApiError::Unauthorized(UNAUTHORIZED.to_string())
        })?;

    req.extensions_mut().insert(current_user);

    Ok(next.run(req).await)
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(|| ApiError::Unauthorized(UNAUTHORIZED.to_string()))
    }
}
