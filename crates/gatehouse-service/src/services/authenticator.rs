use crate::crypto::TokenCodec;
use crate::errors::GateError;
use crate::models::{SecretScheme, TokenResponse};
use crate::store::CredentialStore;
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use subtle::ConstantTimeEq;
use tracing::instrument;

/// Bcrypt hash verified when the username is unknown, so that lookup misses
/// and secret mismatches take comparable time.
const DUMMY_BCRYPT_HASH: &str = "$2b$12$LQv3c1yqBWVHxkd0LHAkCOYz6TtxMQJqhN8/LewY5GyYqExt7YD3a";

/// Stand-in secret compared when the username is unknown under the
/// plaintext scheme.
const DUMMY_PLAINTEXT_SECRET: &str = "dummy-credential-for-timing";

/// Validates presented credentials and mints tokens for valid ones.
///
/// Comparison strategy is pluggable through [`SecretScheme`]: stored
/// secrets are either plaintext (compared in constant time) or bcrypt
/// hashes (verified by the library).
pub struct Authenticator {
    store: Arc<dyn CredentialStore>,
    codec: Arc<TokenCodec>,
    scheme: SecretScheme,
    token_ttl_seconds: i64,
}

impl Authenticator {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        codec: Arc<TokenCodec>,
        scheme: SecretScheme,
        token_ttl_seconds: i64,
    ) -> Self {
        Self {
            store,
            codec,
            scheme,
            token_ttl_seconds,
        }
    }

    /// Authenticate `username` with `presented_secret` and issue a token.
    ///
    /// Every failure mode surfaces as [`GateError::InvalidCredentials`] with
    /// one message. An unknown username runs the same secret verification
    /// against a dummy credential, so unknown-user and wrong-secret cases
    /// are not distinguishable by response or by timing.
    #[instrument(skip_all, fields(username = %username))]
    pub async fn authenticate(
        &self,
        username: &str,
        presented_secret: &SecretString,
    ) -> Result<TokenResponse, GateError> {
        let credential = self.store.lookup(username).await?;

        let stored_secret = match &credential {
            Some(credential) => credential.secret.as_str(),
            None => match self.scheme {
                SecretScheme::Plaintext => DUMMY_PLAINTEXT_SECRET,
                SecretScheme::Bcrypt => DUMMY_BCRYPT_HASH,
            },
        };

        let matches = verify_secret(self.scheme, presented_secret.expose_secret(), stored_secret)?;

        // Resolve the lookup result only after the comparison has run
        let credential = credential.ok_or(GateError::InvalidCredentials)?;

        if !matches {
            tracing::debug!(
                target: "gatehouse.auth",
                username = %username,
                "Authentication failed: secret mismatch"
            );
            return Err(GateError::InvalidCredentials);
        }

        let token = self
            .codec
            .issue(&credential.username, self.token_ttl_seconds)?;

        tracing::debug!(
            target: "gatehouse.auth",
            username = %credential.username,
            expires_in = self.token_ttl_seconds,
            "Authentication succeeded"
        );

        Ok(TokenResponse {
            token,
            token_type: "Bearer".to_string(),
            expires_in: self.token_ttl_seconds as u64,
        })
    }
}

/// Compare a presented secret against a stored one under `scheme`.
fn verify_secret(
    scheme: SecretScheme,
    presented: &str,
    stored: &str,
) -> Result<bool, GateError> {
    match scheme {
        SecretScheme::Plaintext => Ok(constant_time_str_eq(presented, stored)),
        SecretScheme::Bcrypt => bcrypt::verify(presented, stored)
            .map_err(|e| GateError::Crypto(format!("Secret hash verification failed: {}", e))),
    }
}

/// Constant-time string equality.
///
/// On length mismatch, compares `a` against itself so the runtime stays
/// proportional to the input instead of returning early.
fn constant_time_str_eq(a: &str, b: &str) -> bool {
    let a = a.as_bytes();
    let b = b.as_bytes();

    if a.len() != b.len() {
        let _ = a.ct_eq(a);
        return false;
    }

    a.ct_eq(b).into()
}
