//! Internal implementation of verification identifier services.

use crate::{VerificationIdError, VerificationIdResult};
use rand::rngs::OsRng;
use rand::RngCore;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use std::{fmt, str::FromStr};

/// Literal prefix of every verification identifier.
pub const PREFIX: &str = "VRF";

/// Symbols a body character is drawn from.
pub const ALPHABET: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Total length of a canonical identifier, hyphens included.
pub const VERIFICATION_ID_LEN: usize = 18;

const SEGMENT_LEN: usize = 4;
const SEGMENT_COUNT: usize = 3;
const BODY_LEN: usize = SEGMENT_LEN * SEGMENT_COUNT;

/// Largest multiple of the alphabet size that fits in a byte. Bytes at or above it are discarded
/// so that `byte % 36` stays uniform.
const REJECTION_BOUND: u8 = (256 / ALPHABET.len() * ALPHABET.len()) as u8;

/// QualiBev's canonical verification identifier (`VRF-XXXX-XXXX-XXXX`).
///
/// This wrapper type guarantees that once constructed, the contained string is in canonical
/// form. Accept identifiers from *outside* the core (QR payloads, typed codes, API requests)
/// through [`VerificationId::parse`]; mint new ones through [`VerificationIdService::generate`].
///
/// # Errors
/// [`VerificationId::parse`] returns [`VerificationIdError::InvalidVerificationId`] if the input
/// is not already canonical.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VerificationId(String);

impl VerificationId {
    /// Validates and wraps an identifier that must already be in canonical form.
    ///
    /// This does **not** normalise near misses (lowercase, underscores, padding). A scanned
    /// payload that needs trimming is not a verification identifier.
    ///
    /// # Errors
    ///
    /// Returns [`VerificationIdError::InvalidVerificationId`] if `input` is not canonical.
    pub fn parse(input: &str) -> VerificationIdResult<Self> {
        if Self::is_valid(input) {
            return Ok(Self(input.to_owned()));
        }
        Err(VerificationIdError::InvalidVerificationId(input.to_owned()))
    }

    /// Returns true if `input` is a canonical verification identifier.
    ///
    /// This is a purely syntactic check that validates:
    /// - Exactly 18 bytes long
    /// - Starts with `VRF`
    /// - Followed by three groups of a hyphen and four characters from `0-9` / `A-Z`
    ///
    /// Total over every `&str`; it never panics and never touches storage.
    pub fn is_valid(input: &str) -> bool {
        let bytes = input.as_bytes();
        bytes.len() == VERIFICATION_ID_LEN
            && bytes.starts_with(PREFIX.as_bytes())
            && bytes[PREFIX.len()..]
                .chunks(SEGMENT_LEN + 1)
                .all(|group| {
                    group[0] == b'-'
                        && group[1..]
                            .iter()
                            .all(|b| matches!(b, b'0'..=b'9' | b'A'..=b'Z'))
                })
    }

    /// Draws a new identifier from `rng`.
    ///
    /// Each of the 12 body characters is chosen independently and uniformly from [`ALPHABET`]
    /// by rejection sampling over raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`VerificationIdError::RandomnessUnavailable`] if `rng` fails to fill a buffer.
    pub fn generate_with<R: RngCore + ?Sized>(rng: &mut R) -> VerificationIdResult<Self> {
        let mut body = [0u8; BODY_LEN];
        let mut filled = 0;
        let mut pool = [0u8; 16];

        while filled < BODY_LEN {
            rng.try_fill_bytes(&mut pool)
                .map_err(VerificationIdError::RandomnessUnavailable)?;
            for &byte in pool.iter().filter(|&&b| b < REJECTION_BOUND) {
                if filled == BODY_LEN {
                    break;
                }
                body[filled] = ALPHABET[usize::from(byte) % ALPHABET.len()];
                filled += 1;
            }
        }

        let mut id = String::with_capacity(VERIFICATION_ID_LEN);
        id.push_str(PREFIX);
        for segment in body.chunks(SEGMENT_LEN) {
            id.push('-');
            id.extend(segment.iter().map(|&b| char::from(b)));
        }
        Ok(Self(id))
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `parent_dir/<s1>/<s2>/<id>/` where `s1`/`s2` are the first two pairs of body
    /// characters.
    ///
    /// Body characters are uniform, so this spreads records evenly across at most 36^4 leaf
    /// directories.
    pub fn sharded_dir(&self, parent_dir: &Path) -> PathBuf {
        let body = &self.0[PREFIX.len() + 1..];
        parent_dir.join(&body[0..2]).join(&body[2..4]).join(&self.0)
    }
}

impl fmt::Display for VerificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for VerificationId {
    type Err = VerificationIdError;

    /// Equivalent to [`VerificationId::parse`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VerificationId::parse(s)
    }
}

impl AsRef<str> for VerificationId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for VerificationId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for VerificationId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        VerificationId::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Mints verification identifiers from an owned entropy source.
///
/// The default service reads from the operating system generator. Tests and tools that need
/// reproducible output inject a seeded generator through [`VerificationIdService::with_rng`].
///
/// The service holds no other state, so one instance can be shared across threads.
#[derive(Debug)]
pub struct VerificationIdService<R = OsRng> {
    rng: Mutex<R>,
}

impl VerificationIdService<OsRng> {
    /// Creates a service backed by the operating system generator.
    pub fn new() -> Self {
        Self::with_rng(OsRng)
    }
}

impl Default for VerificationIdService<OsRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RngCore> VerificationIdService<R> {
    /// Creates a service drawing from `rng`.
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng: Mutex::new(rng),
        }
    }

    /// Generates a new identifier.
    ///
    /// The result always satisfies [`VerificationIdService::validate`]. It is not checked for
    /// uniqueness; pair it with an insert-if-absent at the storage boundary.
    ///
    /// # Errors
    ///
    /// Returns [`VerificationIdError::RandomnessUnavailable`] if the entropy source fails.
    pub fn generate(&self) -> VerificationIdResult<VerificationId> {
        // A panic elsewhere cannot leave a generator in a state worth refusing.
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        VerificationId::generate_with(&mut *rng)
    }

    /// Returns true if `candidate` is a canonical verification identifier.
    pub fn validate(candidate: &str) -> bool {
        VerificationId::is_valid(candidate)
    }
}
