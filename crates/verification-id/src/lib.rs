//! Verification identifier generation and validation.
//!
//! Every physical product registered with QualiBev carries a public verification identifier. The
//! identifier is printed into the product's QR code (or written to its NFC tag) and is the key
//! consumers present when checking a bottle.
//!
//! This crate provides:
//! - A wrapper type ([`VerificationId`]) that *guarantees* the canonical format once constructed.
//! - A generator ([`VerificationIdService`]) drawing identifiers from an injected entropy source.
//! - Shared sharding logic to derive storage locations from an identifier.
//!
//! ## Canonical form
//! - Pattern: `VRF-XXXX-XXXX-XXXX`
//! - Length: 18
//! - Characters after the prefix: `0-9` and `A-Z` only, grouped in three blocks of four
//! - Example: `VRF-A1B2-C3D4-E5F6`
//!
//! Notes:
//! - Validation is purely syntactic. Whether a well-formed identifier belongs to a registered
//!   product is a question for the catalog, asked only after validation succeeds.
//! - Lowercase input, other separators and surrounding whitespace are rejected, not normalised.
//! - Generation does not guarantee uniqueness. Storage enforces it on insert and the registration
//!   workflow regenerates on collision.
//!
//! ## Keyspace
//! Each of the 12 body characters is drawn independently and uniformly from 36 symbols, giving
//! 36^12 (about 4.7 × 10^18) identifiers. The format favours a large, human-typeable keyspace; it
//! is not a secret and offers no unforgeability on its own.

mod service;

// Re-export public types
pub use service::{VerificationId, VerificationIdService, ALPHABET, PREFIX, VERIFICATION_ID_LEN};

/// Error type for verification identifier operations.
#[derive(Debug, thiserror::Error)]
pub enum VerificationIdError {
    /// Input did not match the canonical `VRF-XXXX-XXXX-XXXX` form
    #[error(
        "verification id must match VRF-XXXX-XXXX-XXXX using characters 0-9 and A-Z, got: '{0}'"
    )]
    InvalidVerificationId(String),

    /// The entropy source failed to produce random bytes
    #[error("randomness unavailable: {0}")]
    RandomnessUnavailable(#[source] rand::Error),
}

/// Result type for verification identifier operations.
pub type VerificationIdResult<T> = Result<T, VerificationIdError>;
