//! Test utilities for the gatehouse workspace.
//!
//! Deterministic signing keys, a controllable clock, a builder for
//! hand-crafted tokens, and chainable token assertions. Everything here
//! panics on misuse; it is for tests only.

pub mod assertions;
pub mod clock;
pub mod fixtures;
pub mod token_builders;

pub use assertions::TokenAssertions;
pub use clock::FixedClock;
pub use fixtures::{
    bcrypt_hash_of, test_codec, test_signing_key, TEST_EPOCH, TEST_KEY_ID, TEST_PASSWORD,
    TEST_USERNAME_ALICE,
};
pub use token_builders::TestTokenBuilder;
