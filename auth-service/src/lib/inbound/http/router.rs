use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use auth::TokenClass;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::routing::MethodRouter;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::guard::guard;
use super::guard::Guards;
use super::guard::RouteAccess;
use super::guard::RouteGuard;
use super::handlers::login::login;
use super::handlers::logout::logout;
use super::handlers::me::me;
use super::handlers::refresh_token::refresh_token;
use super::handlers::register::register;
use crate::domain::session::ports::SessionServicePort;

#[derive(Clone)]
pub struct AppState {
    pub session_service: Arc<dyn SessionServicePort>,
}

/// One route and the access it requires.
pub struct RouteEntry {
    pub path: &'static str,
    pub access: RouteAccess,
    pub handler: MethodRouter<AppState>,
}

/// Every route served, with its access declared up front.
pub fn route_table() -> Vec<RouteEntry> {
    vec![
        RouteEntry {
            path: "/auth/login",
            access: RouteAccess::Public,
            handler: post(login),
        },
        RouteEntry {
            path: "/auth/register",
            access: RouteAccess::Public,
            handler: post(register),
        },
        RouteEntry {
            path: "/auth/refresh-token",
            access: RouteAccess::Protected(TokenClass::Refresh),
            handler: post(refresh_token),
        },
        RouteEntry {
            path: "/auth/logout",
            access: RouteAccess::Protected(TokenClass::Refresh),
            handler: post(logout),
        },
        RouteEntry {
            path: "/auth/me",
            access: RouteAccess::Protected(TokenClass::Access),
            handler: get(me),
        },
    ]
}

pub fn create_router(
    session_service: Arc<dyn SessionServicePort>,
    authenticator: Arc<Authenticator>,
) -> Router {
    let state = AppState { session_service };
    let guards = Arc::new(Guards::new(authenticator));

    let routes = route_table()
        .into_iter()
        .fold(Router::new(), |router, entry| {
            let route_guard = RouteGuard {
                access: entry.access,
                guards: Arc::clone(&guards),
            };
            router.route(
                entry.path,
                entry
                    .handler
                    .route_layer(middleware::from_fn_with_state(route_guard, guard)),
            )
        });

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            // Headers are left out: they carry bearer tokens and cookies
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    routes
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
