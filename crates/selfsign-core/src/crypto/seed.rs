//! Seed derivation from a user secret.
//!
//! A brainwallet identity is reconstructed from its passphrase alone, so the
//! mapping from secret to seed must never change: the seed is the raw SHA-256
//! digest of the UTF-8 bytes of the secret.

use sha2::{Digest, Sha256};
use zeroize::ZeroizeOnDrop;

/// Length of a seed in bytes (256-bit digest).
pub const SEED_LENGTH: usize = 32;

/// A fixed-length deterministic seed derived from a secret.
///
/// Seed bytes are zeroized from memory when dropped.
#[derive(Clone, PartialEq, Eq, ZeroizeOnDrop)]
pub struct Seed {
    bytes: [u8; SEED_LENGTH],
}

impl Seed {
    /// Create a seed from raw bytes.
    pub fn from_bytes(bytes: [u8; SEED_LENGTH]) -> Self {
        Self { bytes }
    }

    /// Get a reference to the raw seed bytes.
    ///
    /// # Security
    ///
    /// Avoid storing or logging this value.
    pub fn as_bytes(&self) -> &[u8; SEED_LENGTH] {
        &self.bytes
    }
}

impl std::fmt::Debug for Seed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Seed").field("bytes", &"[REDACTED]").finish()
    }
}

/// Derive a seed from a secret string.
///
/// Pure and infallible: any string, including the empty string, is valid.
/// Minimum-entropy policy is the caller's responsibility (see
/// [`validate_passphrase`](super::validate_passphrase)).
///
/// # Examples
///
/// ```
/// use selfsign_core::crypto::derive_seed;
///
/// let a = derive_seed("correct horse battery staple");
/// let b = derive_seed("correct horse battery staple");
/// assert_eq!(a.as_bytes(), b.as_bytes());
/// ```
pub fn derive_seed(secret: &str) -> Seed {
    let digest = Sha256::digest(secret.as_bytes());
    Seed::from_bytes(digest.into())
}
