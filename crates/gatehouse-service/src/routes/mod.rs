//! Route definitions.

use crate::handlers::{hello, login, AppState};
use crate::middleware::{require_auth, AuthState};
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Build the application router.
///
/// The auth filter wraps every route. The login route and `/health` are on
/// its public list, so they pass through without a token; everything else
/// requires one.
pub fn build_routes(
    state: Arc<AppState>,
    auth_state: Arc<AuthState>,
    login_route: &str,
) -> Router {
    Router::new()
        .route(login_route, post(login))
        .route("/hello", get(hello))
        .route("/health", get(health_check))
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            require_auth,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness probe.
async fn health_check() -> &'static str {
    "OK"
}
