//! Builder for hand-crafted tokens.

use crate::fixtures::{test_signing_key, TEST_EPOCH};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::json;

/// Builds signed tokens with arbitrary claims for negative testing.
///
/// Defaults produce a token the standard test codec accepts: subject
/// "alice", issued at [`TEST_EPOCH`], one hour lifetime, signed with
/// `test_signing_key(1)` under HS256. Override whichever part the test
/// needs broken.
#[derive(Debug, Clone)]
pub struct TestTokenBuilder {
    sub: String,
    iat: i64,
    exp: i64,
    key: Vec<u8>,
    kid: Option<String>,
    algorithm: Algorithm,
}

impl Default for TestTokenBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestTokenBuilder {
    pub fn new() -> Self {
        Self {
            sub: "alice".to_string(),
            iat: TEST_EPOCH,
            exp: TEST_EPOCH + 3600,
            key: test_signing_key(1).to_vec(),
            kid: None,
            algorithm: Algorithm::HS256,
        }
    }

    pub fn for_user(mut self, sub: &str) -> Self {
        self.sub = sub.to_string();
        self
    }

    pub fn issued_at(mut self, iat: i64) -> Self {
        self.iat = iat;
        self
    }

    pub fn expires_at(mut self, exp: i64) -> Self {
        self.exp = exp;
        self
    }

    pub fn signed_with(mut self, key: &[u8]) -> Self {
        self.key = key.to_vec();
        self
    }

    pub fn with_kid(mut self, kid: &str) -> Self {
        self.kid = Some(kid.to_string());
        self
    }

    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Sign and serialize the token.
    pub fn build(self) -> String {
        let claims = json!({
            "sub": self.sub,
            "iat": self.iat,
            "exp": self.exp,
        });

        let mut header = Header::new(self.algorithm);
        header.kid = self.kid;

        encode(&header, &claims, &EncodingKey::from_secret(&self.key))
            .expect("Test token should encode")
    }
}
