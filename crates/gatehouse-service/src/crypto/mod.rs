use crate::clock::Clock;
use crate::errors::GateError;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::instrument;

/// Maximum allowed token size in bytes (4KB).
///
/// This limit prevents Denial-of-Service (DoS) attacks via oversized tokens.
/// Tokens larger than this size are rejected before any parsing or
/// cryptographic operations.
///
/// Rationale:
/// - A standard token here is ~250 bytes (HS256 signature, three claims)
/// - 4KB allows for reasonable future expansion while preventing abuse
/// - Checked BEFORE base64 decode and signature verification
pub const MAX_TOKEN_SIZE_BYTES: usize = 4096; // 4KB

/// Token verification failure.
///
/// Variant names stay distinct so logs and tests can tell rejection causes
/// apart, but every variant shares a single client-facing message. Callers
/// must not be able to learn why a token was rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VerificationError {
    /// Token exceeds [`MAX_TOKEN_SIZE_BYTES`]; rejected before parsing.
    #[error("The access token is invalid or expired")]
    TooLarge,

    /// Wrong segment count, bad base64url or JSON, or unexpected algorithm.
    #[error("The access token is invalid or expired")]
    Malformed,

    /// Signature does not match the header+claims bytes under the current key.
    #[error("The access token is invalid or expired")]
    SignatureMismatch,

    /// `exp` has passed, beyond the clock skew tolerance. Boundary inclusive.
    #[error("The access token is invalid or expired")]
    Expired,

    /// `iat` is further in the future than the clock skew tolerance allows.
    #[error("The access token is invalid or expired")]
    NotYetValid,
}

/// Token claims.
///
/// Field declaration order is the serialization order, which keeps the
/// signed byte sequence canonical. The `sub` field contains usernames and
/// should not be exposed in logs; a custom Debug implementation redacts it.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Subject (username)
    pub iat: i64,    // Issued at timestamp
    pub exp: i64,    // Expiration timestamp
}

/// Custom Debug implementation that redacts the `sub` field.
impl fmt::Debug for Claims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Claims")
            .field("sub", &"[REDACTED]")
            .field("iat", &self.iat)
            .field("exp", &self.exp)
            .finish()
    }
}

/// Signs and verifies bearer tokens (compact JWT, HS256).
///
/// Holds the HMAC key material, the injected clock, and the skew tolerance.
/// Pure given key and clock, so a single instance is shared across requests
/// behind an `Arc`.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    key_id: Option<String>,
    clock: Arc<dyn Clock>,
    clock_skew_seconds: i64,
}

impl TokenCodec {
    /// Create a codec from raw HMAC key bytes.
    ///
    /// The optional `key_id` is embedded in every token header as `kid` so
    /// a future rotation scheme can tell old keys from new ones. Single-key
    /// verification ignores it today.
    pub fn new(
        signing_key: &[u8],
        key_id: Option<String>,
        clock: Arc<dyn Clock>,
        clock_skew_seconds: i64,
    ) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(signing_key),
            decoding_key: DecodingKey::from_secret(signing_key),
            key_id,
            clock,
            clock_skew_seconds,
        }
    }

    /// Issue a signed token for `subject` expiring `ttl_seconds` from now.
    ///
    /// Fails with [`GateError::InvalidSubject`] for an empty or
    /// whitespace-only subject and [`GateError::InvalidTokenTtl`] for a
    /// non-positive lifetime or one that overflows the expiry timestamp
    /// (`exp` must be strictly after `iat`).
    #[instrument(skip_all)]
    pub fn issue(&self, subject: &str, ttl_seconds: i64) -> Result<String, GateError> {
        if subject.trim().is_empty() {
            return Err(GateError::InvalidSubject);
        }
        if ttl_seconds <= 0 {
            return Err(GateError::InvalidTokenTtl);
        }

        let now = self.clock.now().timestamp();
        let exp = now
            .checked_add(ttl_seconds)
            .ok_or(GateError::InvalidTokenTtl)?;
        let claims = Claims {
            sub: subject.to_string(),
            iat: now,
            exp,
        };

        let mut header = Header::new(Algorithm::HS256);
        header.typ = Some("JWT".to_string());
        header.kid = self.key_id.clone();

        encode(&header, &claims, &self.encoding_key)
            .map_err(|e| GateError::Crypto(format!("Token signing operation failed: {}", e)))
    }

    /// Verify a token and return its claims.
    ///
    /// Validates:
    /// - Token size (must be <= [`MAX_TOKEN_SIZE_BYTES`], checked first)
    /// - Signature (HMAC-SHA256, constant-time comparison inside the
    ///   library, checked before claims are decoded)
    /// - Issued-at time (`iat` claim) with clock skew tolerance
    /// - Expiration (`exp` claim) with clock skew tolerance
    ///
    /// Expiry is evaluated against the injected clock rather than the
    /// library's own `Utc::now()`, and the boundary is inclusive: a token is
    /// already expired at exactly `exp + clock_skew`.
    #[instrument(skip_all)]
    pub fn verify(&self, token: &str) -> Result<Claims, VerificationError> {
        // Check token size BEFORE any parsing or cryptographic operations
        if token.len() > MAX_TOKEN_SIZE_BYTES {
            tracing::debug!(
                target: "gatehouse.crypto",
                token_size = token.len(),
                max_size = MAX_TOKEN_SIZE_BYTES,
                "Token rejected: size exceeds maximum allowed"
            );
            return Err(VerificationError::TooLarge);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked below against the injected clock
        validation.validate_exp = false;

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            tracing::debug!(target: "gatehouse.crypto", error = %e, "Token verification failed");
            map_decode_error(&e)
        })?;

        let now = self.clock.now().timestamp();
        let skew = self.clock_skew_seconds;

        // Reject tokens with iat too far in the future (potential
        // pre-generation attack or badly skewed issuer clock)
        if token_data.claims.iat > now.saturating_add(skew) {
            tracing::debug!(
                target: "gatehouse.crypto",
                iat = token_data.claims.iat,
                now = now,
                clock_skew_seconds = skew,
                "Token rejected: iat too far in the future"
            );
            return Err(VerificationError::NotYetValid);
        }

        // `exp` comes off the wire; the skew addition saturates so extreme
        // claim values cannot overflow
        if now >= token_data.claims.exp.saturating_add(skew) {
            tracing::debug!(
                target: "gatehouse.crypto",
                exp = token_data.claims.exp,
                now = now,
                clock_skew_seconds = skew,
                "Token rejected: expired"
            );
            return Err(VerificationError::Expired);
        }

        Ok(token_data.claims)
    }
}

/// Map `jsonwebtoken` decode failures onto the verification taxonomy.
///
/// `InvalidSignature` is the only mismatch case. Every structural problem
/// (segment count, base64, JSON, header algorithm) collapses to `Malformed`.
/// The library verifies the signature before deserializing claims, so a
/// tampered claims segment surfaces as `InvalidSignature`, not a parse error.
fn map_decode_error(err: &jsonwebtoken::errors::Error) -> VerificationError {
    use jsonwebtoken::errors::ErrorKind;

    match err.kind() {
        ErrorKind::InvalidSignature => VerificationError::SignatureMismatch,
        ErrorKind::ExpiredSignature => VerificationError::Expired,
        ErrorKind::ImmatureSignature => VerificationError::NotYetValid,
        _ => VerificationError::Malformed,
    }
}
