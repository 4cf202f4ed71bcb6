//! Chainable assertions on serialized tokens.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

/// Structural and cryptographic assertions on a compact serialized token.
///
/// Implemented for `String` so test code reads
/// `token.assert_valid_jwt().assert_for_subject("alice")`.
pub trait TokenAssertions {
    fn assert_valid_jwt(&self) -> &Self;
    fn assert_for_subject(&self, subject: &str) -> &Self;
    fn assert_expires_at(&self, exp: i64) -> &Self;
    fn assert_signed_with(&self, key: &[u8]) -> &Self;
    fn assert_has_kid(&self, kid: &str) -> &Self;
}

impl TokenAssertions for String {
    fn assert_valid_jwt(&self) -> &Self {
        let segments = self.split('.').count();
        assert_eq!(
            segments, 3,
            "Token should have three segments, got {}",
            segments
        );
        jsonwebtoken::decode_header(self).expect("Token header should decode");
        self
    }

    fn assert_for_subject(&self, subject: &str) -> &Self {
        assert_eq!(claims_of(self)["sub"], subject, "Token subject mismatch");
        self
    }

    fn assert_expires_at(&self, exp: i64) -> &Self {
        assert_eq!(claims_of(self)["exp"], exp, "Token expiry mismatch");
        self
    }

    fn assert_signed_with(&self, key: &[u8]) -> &Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        decode::<serde_json::Value>(self, &DecodingKey::from_secret(key), &validation)
            .expect("Token should verify under the given key");
        self
    }

    fn assert_has_kid(&self, kid: &str) -> &Self {
        let header = jsonwebtoken::decode_header(self).expect("Token header should decode");
        assert_eq!(header.kid.as_deref(), Some(kid), "Token kid mismatch");
        self
    }
}

/// Decode the claims segment without verifying the signature.
fn claims_of(token: &str) -> serde_json::Value {
    let segment = token
        .split('.')
        .nth(1)
        .expect("Token should have a claims segment");
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .expect("Claims segment should be base64url");
    serde_json::from_slice(&bytes).expect("Claims should be JSON")
}
