//! Shared test fixtures.

use gatehouse_service::clock::Clock;
use gatehouse_service::crypto::TokenCodec;
use std::sync::Arc;

/// Key id embedded in test tokens.
pub const TEST_KEY_ID: &str = "test-key-2025-01";

/// Canonical test username.
pub const TEST_USERNAME_ALICE: &str = "alice";

/// Canonical test password.
pub const TEST_PASSWORD: &str = "test-secret-do-not-use-in-production";

/// Unix timestamp all fixed clocks start from (2025-01-01T00:00:00Z).
pub const TEST_EPOCH: i64 = 1_735_689_600;

/// Deterministic 32-byte signing key derived from `seed`.
///
/// Different seeds give unrelated keys, so tests can exercise wrong-key
/// rejection without hardcoding key material.
pub fn test_signing_key(seed: u8) -> [u8; 32] {
    let mut key = [0u8; 32];
    key[0] = seed;
    for (i, byte) in key.iter_mut().enumerate().skip(1) {
        *byte = seed.wrapping_mul(i as u8).wrapping_add(i as u8);
    }
    key
}

/// Bcrypt hash of `secret` at minimum cost, to keep tests fast.
pub fn bcrypt_hash_of(secret: &str) -> String {
    bcrypt::hash(secret, 4).expect("Bcrypt hash should succeed")
}

/// Codec wired to the given clock, with the standard test key, the test
/// key id, and no skew tolerance.
pub fn test_codec(clock: Arc<dyn Clock>) -> TokenCodec {
    TokenCodec::new(
        &test_signing_key(1),
        Some(TEST_KEY_ID.to_string()),
        clock,
        0,
    )
}
