use crate::errors::GateError;
use crate::models::TokenResponse;
use crate::services::Authenticator;
use axum::extract::State;
use axum::Json;
use secrecy::SecretString;
use serde::Deserialize;
use std::sync::Arc;
use tracing::instrument;

/// Shared application state for handlers.
#[derive(Clone)]
pub struct AppState {
    pub authenticator: Arc<Authenticator>,
}

/// Login request body.
///
/// The password deserializes straight into a [`SecretString`] so it never
/// appears in Debug output or logs.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: SecretString,
}

/// POST handler for the login route.
///
/// Returns `200 OK` with a signed token on success and `401 Unauthorized`
/// with one opaque message for every credential failure.
#[instrument(skip_all, name = "gatehouse.handlers.login")]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, GateError> {
    let response = state
        .authenticator
        .authenticate(&request.username, &request.password)
        .await?;

    Ok(Json(response))
}
