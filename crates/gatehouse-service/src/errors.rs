use crate::crypto::VerificationError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// Service-wide error type.
///
/// Every fallible path in the service converges here so that HTTP mapping
/// lives in one place. Client-facing messages are deliberately uniform for
/// the 401 family: login failures never say whether the username or the
/// secret was wrong, and token failures never say why the token was
/// rejected.
#[derive(Debug, Error)]
pub enum GateError {
    /// Login failed. Covers unknown username and wrong secret alike.
    #[error("Incorrect username or password")]
    InvalidCredentials,

    /// No `Authorization` header on a protected route.
    #[error("Missing Authorization header")]
    MissingToken,

    /// `Authorization` header present but not a Bearer credential.
    #[error("Invalid Authorization header format")]
    InvalidAuthHeader,

    /// Bearer token failed verification. The inner error's Display is the
    /// uniform client-facing message.
    #[error("{0}")]
    Unauthorized(#[from] VerificationError),

    /// Token issuance was asked for an empty subject.
    #[error("Token subject must not be empty")]
    InvalidSubject,

    /// Token issuance was asked for a lifetime outside the supported range.
    #[error("Token lifetime is out of range")]
    InvalidTokenTtl,

    /// Signing or secret-hash operation failed.
    #[error("Cryptographic operation failed: {0}")]
    Crypto(String),

    /// Credential store lookup failed.
    #[error("Credential store error: {0}")]
    Store(String),
}

/// JSON error envelope returned to clients.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

impl IntoResponse for GateError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            GateError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "INVALID_CREDENTIALS",
                self.to_string(),
            ),
            GateError::MissingToken | GateError::InvalidAuthHeader => {
                (StatusCode::UNAUTHORIZED, "INVALID_TOKEN", self.to_string())
            }
            GateError::Unauthorized(_) => {
                (StatusCode::UNAUTHORIZED, "INVALID_TOKEN", self.to_string())
            }
            GateError::InvalidSubject => {
                (StatusCode::BAD_REQUEST, "INVALID_SUBJECT", self.to_string())
            }
            GateError::InvalidTokenTtl => (
                StatusCode::BAD_REQUEST,
                "INVALID_TOKEN_TTL",
                self.to_string(),
            ),
            GateError::Crypto(_) => {
                tracing::error!(target: "gatehouse", error = %self, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "CRYPTO_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
            GateError::Store(_) => {
                tracing::error!(target: "gatehouse", error = %self, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORE_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        });

        (status, body).into_response()
    }
}
