use crate::crypto::TokenCodec;
use crate::errors::GateError;
use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use std::sync::Arc;
use tracing::instrument;

/// Shared state for the request filter.
#[derive(Clone)]
pub struct AuthState {
    codec: Arc<TokenCodec>,
    public_paths: Vec<String>,
}

impl AuthState {
    pub fn new(codec: Arc<TokenCodec>, public_paths: Vec<String>) -> Self {
        Self {
            codec,
            public_paths,
        }
    }

    /// Whether `path` bypasses authentication. Exact match only, no prefix
    /// or glob semantics.
    fn is_public(&self, path: &str) -> bool {
        self.public_paths.iter().any(|public| public == path)
    }
}

/// Request filter that authenticates every protected route.
///
/// Paths on the public list pass through untouched. Everything else must
/// carry `Authorization: Bearer <token>` with a token that verifies; the
/// verified [`Claims`](crate::crypto::Claims) are inserted into request
/// extensions for downstream handlers.
#[instrument(skip_all, name = "gatehouse.middleware.auth")]
pub async fn require_auth(
    State(state): State<Arc<AuthState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, GateError> {
    if state.is_public(req.uri().path()) {
        return Ok(next.run(req).await);
    }

    let token = extract_bearer_token(&req)?;
    let claims = state.codec.verify(token)?;

    tracing::debug!(
        target: "gatehouse.middleware",
        path = %req.uri().path(),
        "Request authenticated"
    );

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

/// Extract the Bearer token from the `Authorization` header.
fn extract_bearer_token(req: &Request) -> Result<&str, GateError> {
    let header = req.headers().get(AUTHORIZATION).ok_or_else(|| {
        tracing::debug!(target: "gatehouse.middleware", "Missing Authorization header");
        GateError::MissingToken
    })?;

    let header = header.to_str().map_err(|_| {
        tracing::debug!(
            target: "gatehouse.middleware",
            "Authorization header is not valid UTF-8"
        );
        GateError::InvalidAuthHeader
    })?;

    header.strip_prefix("Bearer ").ok_or_else(|| {
        tracing::debug!(
            target: "gatehouse.middleware",
            "Authorization header is not a Bearer credential"
        );
        GateError::InvalidAuthHeader
    })
}
