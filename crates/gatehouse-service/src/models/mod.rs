use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Secret comparison scheme for the credential store.
///
/// `Plaintext` exists for demos and tests; production deployments keep the
/// default `Bcrypt`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretScheme {
    Plaintext,
    Bcrypt,
}

impl SecretScheme {
    /// Convert to string
    pub fn as_str(&self) -> &'static str {
        match self {
            SecretScheme::Plaintext => "plaintext",
            SecretScheme::Bcrypt => "bcrypt",
        }
    }
}

impl FromStr for SecretScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "plaintext" => Ok(SecretScheme::Plaintext),
            "bcrypt" => Ok(SecretScheme::Bcrypt),
            _ => Err(format!("Invalid secret scheme: {}", s)),
        }
    }
}

/// Token response returned by the login endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
    pub token_type: String,
    pub expires_in: u64,
}
