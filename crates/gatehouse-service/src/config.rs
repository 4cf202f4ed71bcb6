use crate::models::SecretScheme;
use base64::{engine::general_purpose, Engine as _};
use secrecy::SecretBox;
use std::collections::HashMap;
use std::env;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Default token lifetime (1 hour).
pub const DEFAULT_TOKEN_TTL_SECONDS: i64 = 3600;

/// Maximum allowed token lifetime (1 year).
///
/// Bearer tokens are meant to be short-lived. Lifetimes beyond a year are
/// rejected as configuration mistakes before they can overflow the expiry
/// timestamp arithmetic downstream.
pub const MAX_TOKEN_TTL_SECONDS: i64 = 31_536_000;

/// Default clock skew tolerance for token validation.
pub const DEFAULT_CLOCK_SKEW_SECONDS: i64 = 60;

/// Maximum allowed clock skew tolerance.
///
/// Values beyond this would effectively extend every token's lifetime by
/// more than 10 minutes, so configuration rejects them.
pub const MAX_CLOCK_SKEW_SECONDS: i64 = 600;

/// Minimum signing key length in bytes.
///
/// HMAC-SHA256 keys shorter than the hash output weaken the MAC, so keys
/// below 32 bytes are rejected at startup.
pub const MIN_SIGNING_KEY_BYTES: usize = 32;

/// Default login route (exempt from bearer-token enforcement).
pub const DEFAULT_LOGIN_ROUTE: &str = "/authenticate";

/// A username/secret pair seeded into the in-memory credential store at
/// startup. The secret is a bcrypt hash or a plaintext password depending
/// on the configured [`SecretScheme`].
pub struct SeedUser {
    pub username: String,
    pub secret: String,
}

/// Custom Debug implementation that redacts the stored secret.
impl fmt::Debug for SeedUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeedUser")
            .field("username", &self.username)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

/// Service configuration, built once at startup.
///
/// The signing key is wrapped in `SecretBox`, so `Config` is not `Clone`;
/// components that need the key material receive it at construction time.
#[derive(Debug)]
pub struct Config {
    pub bind_address: String,
    pub signing_key: SecretBox<Vec<u8>>,
    pub key_id: Option<String>,
    pub token_ttl_seconds: i64,
    pub clock_skew_seconds: i64,
    pub login_route: String,
    pub password_scheme: SecretScheme,
    pub seed_users: Vec<SeedUser>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid signing key: {0}")]
    InvalidSigningKey(String),

    #[error("Base64 decode error: {0}")]
    Base64Error(#[from] base64::DecodeError),

    #[error("Invalid value for {var}: {reason}")]
    InvalidValue { var: String, reason: String },
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing)
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let bind_address = vars
            .get("BIND_ADDRESS")
            .cloned()
            .unwrap_or_else(|| "0.0.0.0:8080".to_string());

        let signing_key_base64 = vars
            .get("GATEHOUSE_SIGNING_KEY")
            .ok_or_else(|| ConfigError::MissingEnvVar("GATEHOUSE_SIGNING_KEY".to_string()))?;

        let signing_key = general_purpose::STANDARD
            .decode(signing_key_base64)
            .map_err(ConfigError::Base64Error)?;

        if signing_key.len() < MIN_SIGNING_KEY_BYTES {
            return Err(ConfigError::InvalidSigningKey(format!(
                "Expected at least {} bytes, got {}",
                MIN_SIGNING_KEY_BYTES,
                signing_key.len()
            )));
        }

        let key_id = vars.get("GATEHOUSE_KEY_ID").cloned();

        let token_ttl_seconds = parse_seconds(
            vars,
            "GATEHOUSE_TOKEN_TTL_SECONDS",
            DEFAULT_TOKEN_TTL_SECONDS,
        )?;
        if token_ttl_seconds <= 0 {
            return Err(ConfigError::InvalidValue {
                var: "GATEHOUSE_TOKEN_TTL_SECONDS".to_string(),
                reason: "must be positive".to_string(),
            });
        }
        if token_ttl_seconds > MAX_TOKEN_TTL_SECONDS {
            return Err(ConfigError::InvalidValue {
                var: "GATEHOUSE_TOKEN_TTL_SECONDS".to_string(),
                reason: format!("must not exceed {}", MAX_TOKEN_TTL_SECONDS),
            });
        }

        let clock_skew_seconds = parse_seconds(
            vars,
            "GATEHOUSE_CLOCK_SKEW_SECONDS",
            DEFAULT_CLOCK_SKEW_SECONDS,
        )?;
        if !(0..=MAX_CLOCK_SKEW_SECONDS).contains(&clock_skew_seconds) {
            return Err(ConfigError::InvalidValue {
                var: "GATEHOUSE_CLOCK_SKEW_SECONDS".to_string(),
                reason: format!("must be between 0 and {}", MAX_CLOCK_SKEW_SECONDS),
            });
        }

        let login_route = vars
            .get("GATEHOUSE_LOGIN_ROUTE")
            .cloned()
            .unwrap_or_else(|| DEFAULT_LOGIN_ROUTE.to_string());
        if !login_route.starts_with('/') {
            return Err(ConfigError::InvalidValue {
                var: "GATEHOUSE_LOGIN_ROUTE".to_string(),
                reason: "must start with '/'".to_string(),
            });
        }
        // ':' and '*' are pattern syntax to the router; the login route
        // must stay a literal path
        if login_route.contains([':', '*']) {
            return Err(ConfigError::InvalidValue {
                var: "GATEHOUSE_LOGIN_ROUTE".to_string(),
                reason: "must be a literal path without ':' or '*'".to_string(),
            });
        }

        let password_scheme = match vars.get("GATEHOUSE_PASSWORD_SCHEME") {
            Some(raw) => {
                SecretScheme::from_str(raw).map_err(|reason| ConfigError::InvalidValue {
                    var: "GATEHOUSE_PASSWORD_SCHEME".to_string(),
                    reason,
                })?
            }
            None => SecretScheme::Bcrypt,
        };

        let seed_users = match vars.get("GATEHOUSE_USERS") {
            Some(raw) if !raw.trim().is_empty() => parse_seed_users(raw)?,
            _ => Vec::new(),
        };

        Ok(Config {
            bind_address,
            signing_key: SecretBox::new(Box::new(signing_key)),
            key_id,
            token_ttl_seconds,
            clock_skew_seconds,
            login_route,
            password_scheme,
            seed_users,
        })
    }
}

fn parse_seconds(
    vars: &HashMap<String, String>,
    var: &str,
    default: i64,
) -> Result<i64, ConfigError> {
    match vars.get(var) {
        Some(raw) => raw.parse::<i64>().map_err(|e| ConfigError::InvalidValue {
            var: var.to_string(),
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}

/// Parse `GATEHOUSE_USERS` into seed users.
///
/// Format: comma-separated `username:secret` entries. The secret may itself
/// contain `:` (only the first one delimits). Error messages never echo the
/// secret portion of an entry.
fn parse_seed_users(raw: &str) -> Result<Vec<SeedUser>, ConfigError> {
    raw.split(',')
        .map(|entry| {
            let (username, secret) =
                entry
                    .split_once(':')
                    .ok_or_else(|| ConfigError::InvalidValue {
                        var: "GATEHOUSE_USERS".to_string(),
                        reason: "entry is missing the ':' separator".to_string(),
                    })?;
            if username.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    var: "GATEHOUSE_USERS".to_string(),
                    reason: "entry has an empty username".to_string(),
                });
            }
            Ok(SeedUser {
                username: username.trim().to_string(),
                secret: secret.to_string(),
            })
        })
        .collect()
}
