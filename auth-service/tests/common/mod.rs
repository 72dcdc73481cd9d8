use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use auth::Authenticator;
use auth::PasswordHasher;
use auth::TokenSettings;
use auth::TokenSigner;
use auth_service::config::TOKEN_AUDIENCE;
use auth_service::config::TOKEN_ISSUER;
use auth_service::domain::session::service::SessionService;
use auth_service::domain::session::workers::PasswordWorkers;
use auth_service::domain::user::models::EmailAddress;
use auth_service::domain::user::models::User;
use auth_service::domain::user::models::UserId;
use auth_service::domain::user::ports::UserRepository;
use auth_service::inbound::http::router::create_router;
use auth_service::user::errors::UserError;
use axum::body::Body;
use axum::http::header;
use axum::http::HeaderMap;
use axum::http::Method;
use axum::http::Request;
use axum::http::StatusCode;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

pub const ACCESS_SECRET: &str = "test-access-secret-for-jwt-signing-32-bytes";
pub const REFRESH_SECRET: &str = "test-refresh-secret-for-jwt-signing-32-bytes";
pub const ACCESS_TTL_SECONDS: i64 = 900;
pub const REFRESH_TTL_SECONDS: i64 = 604800;

/// User store kept in memory, keyed by id.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<UserId, User>>,
}

impl InMemoryUserRepository {
    pub fn count(&self) -> usize {
        self.users.lock().unwrap().len()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<User, UserError> {
        let mut users = self.users.lock().unwrap();
        if users.values().any(|u| u.email == user.email) {
            return Err(UserError::EmailAlreadyExists(user.email.as_str().to_string()));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        Ok(self.users.lock().unwrap().get(id).cloned())
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| &u.email == email)
            .cloned())
    }
}

pub fn token_signer() -> TokenSigner {
    TokenSigner::new(
        TOKEN_ISSUER,
        TOKEN_AUDIENCE,
        TokenSettings {
            secret: ACCESS_SECRET.to_string(),
            ttl: chrono::Duration::seconds(ACCESS_TTL_SECONDS),
        },
        TokenSettings {
            secret: REFRESH_SECRET.to_string(),
            ttl: chrono::Duration::seconds(REFRESH_TTL_SECONDS),
        },
    )
    .expect("Failed to build token signer")
}

/// The real router over an in-memory store.
pub struct TestApp {
    router: Router,
    pub authenticator: Arc<Authenticator>,
    pub repository: Arc<InMemoryUserRepository>,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestApp {
    pub fn new() -> Self {
        let hasher = PasswordHasher::with_cost(1).expect("Failed to build hasher");
        let authenticator = Arc::new(Authenticator::new(hasher, token_signer()));
        let repository = Arc::new(InMemoryUserRepository::default());

        let session_service = Arc::new(SessionService::new(
            Arc::clone(&repository),
            Arc::clone(&authenticator),
            PasswordWorkers::new(2),
        ));

        let router = create_router(session_service, Arc::clone(&authenticator));

        Self {
            router,
            authenticator,
            repository,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to execute request");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read body")
            .to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// POST a JSON body.
    pub async fn post_json(&self, path: &str, body: Value) -> TestResponse {
        let request = Request::builder()
            .method(Method::POST)
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    /// POST without a body, presenting a refresh cookie when given.
    pub async fn post_with_cookie(&self, path: &str, refresh_token: Option<&str>) -> TestResponse {
        let mut builder = Request::builder().method(Method::POST).uri(path);
        if let Some(token) = refresh_token {
            builder = builder.header(header::COOKIE, format!("refresh_token={}", token));
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    /// POST without a body, presenting a bearer token.
    pub async fn post_with_bearer(&self, path: &str, token: &str) -> TestResponse {
        let request = Request::builder()
            .method(Method::POST)
            .uri(path)
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    /// GET, presenting a bearer token when given.
    pub async fn get_with_bearer(&self, path: &str, token: Option<&str>) -> TestResponse {
        let mut builder = Request::builder().method(Method::GET).uri(path);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    pub async fn register(&self, email: &str, password: &str) -> TestResponse {
        self.post_json(
            "/auth/register",
            serde_json::json!({
                "firstName": "Ada",
                "lastName": "Lovelace",
                "email": email,
                "password": password,
                "confirmPassword": password
            }),
        )
        .await
    }

    pub async fn login(&self, email: &str, password: &str) -> TestResponse {
        self.post_json(
            "/auth/login",
            serde_json::json!({ "email": email, "password": password }),
        )
        .await
    }
}

impl TestResponse {
    /// Raw `Set-Cookie` header for the named cookie.
    pub fn set_cookie(&self, name: &str) -> Option<String> {
        let prefix = format!("{}=", name);
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .find(|value| value.starts_with(&prefix))
            .map(str::to_string)
    }

    /// Value of the refresh cookie set by this response.
    pub fn refresh_cookie(&self) -> Option<String> {
        self.set_cookie("refresh_token").map(|raw| {
            raw.split(';')
                .next()
                .unwrap_or_default()
                .trim_start_matches("refresh_token=")
                .to_string()
        })
    }

    pub fn access_token(&self) -> String {
        self.body["data"]["accessToken"]
            .as_str()
            .expect("No access token in body")
            .to_string()
    }
}
