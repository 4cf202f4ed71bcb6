use crate::crypto::Claims;
use axum::Extension;

/// Sample protected handler.
///
/// Reads the verified claims the auth filter left in request extensions.
pub async fn hello(Extension(claims): Extension<Claims>) -> String {
    format!("Hello, {}!", claims.sub)
}
