//! Gatehouse service binary.

use gatehouse_service::clock::{Clock, SystemClock};
use gatehouse_service::config::Config;
use gatehouse_service::crypto::TokenCodec;
use gatehouse_service::handlers::AppState;
use gatehouse_service::middleware::AuthState;
use gatehouse_service::routes::build_routes;
use gatehouse_service::services::Authenticator;
use gatehouse_service::store::{Credential, MemoryCredentialStore};
use secrecy::ExposeSecret;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gatehouse_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().map_err(|e| {
        tracing::error!(target: "gatehouse", error = %e, "Configuration error");
        e
    })?;

    tracing::info!(
        target: "gatehouse",
        bind_address = %config.bind_address,
        login_route = %config.login_route,
        token_ttl_seconds = config.token_ttl_seconds,
        clock_skew_seconds = config.clock_skew_seconds,
        password_scheme = %config.password_scheme.as_str(),
        "Starting gatehouse service"
    );

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let codec = Arc::new(TokenCodec::new(
        config.signing_key.expose_secret(),
        config.key_id.clone(),
        clock,
        config.clock_skew_seconds,
    ));

    let store = MemoryCredentialStore::with_users(config.seed_users.iter().map(|user| {
        Credential {
            username: user.username.clone(),
            secret: user.secret.clone(),
        }
    }));
    if store.is_empty() {
        tracing::warn!(
            target: "gatehouse",
            "Credential store is empty; every login will be rejected"
        );
    } else {
        tracing::info!(
            target: "gatehouse",
            user_count = store.len(),
            "Seeded credential store"
        );
    }

    let authenticator = Arc::new(Authenticator::new(
        Arc::new(store),
        codec.clone(),
        config.password_scheme,
        config.token_ttl_seconds,
    ));

    let state = Arc::new(AppState { authenticator });
    let auth_state = Arc::new(AuthState::new(
        codec,
        vec![config.login_route.clone(), "/health".to_string()],
    ));

    let app = build_routes(state, auth_state, &config.login_route);

    let addr: SocketAddr = config.bind_address.parse().map_err(|e| {
        tracing::error!(
            target: "gatehouse",
            bind_address = %config.bind_address,
            error = %e,
            "Invalid bind address"
        );
        e
    })?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(target: "gatehouse", address = %addr, "Listening");

    axum::serve(listener, app).await?;

    Ok(())
}
