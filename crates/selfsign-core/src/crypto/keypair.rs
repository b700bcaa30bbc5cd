//! RSA key pair generation.
//!
//! With a [`Seed`] every random decision made while building the key is
//! drawn from a [`SeedStream`] owned by this call, so the same seed always
//! yields bit-identical keys. Without a seed the operating system's secure
//! random source is used.
//!
//! Primes are searched here rather than inside `rsa`, so the derivation of a
//! brainwallet key depends only on the byte stream:
//!
//! ```text
//! candidate = top `bits` bits of the next ceil(bits / 8) stream bytes,
//!             with the two highest bits and the lowest bit set
//! p         = first probable prime with (p - 1) not divisible by e
//! q         = same search continuing on the stream, q != p
//! ```

use num_bigint_dig::prime::probably_prime;
use rand::rngs::OsRng;
use rand_core::CryptoRngCore;
use rsa::pkcs8::{EncodePublicKey, LineEnding};
use rsa::traits::PublicKeyParts;
use rsa::{BigUint, RsaPrivateKey, RsaPublicKey};
use zeroize::Zeroizing;

use super::rng::SeedStream;
use super::seed::Seed;
use crate::error::{Result, SelfSignError};

/// Default RSA modulus size in bits.
pub const DEFAULT_KEY_BITS: usize = 2048;

/// Smallest modulus size accepted.
pub const MIN_KEY_BITS: usize = 1024;

/// Largest modulus size accepted.
pub const MAX_KEY_BITS: usize = 4096;

/// Upper bound on discarded generation attempts.
const MAX_KEYGEN_ATTEMPTS: usize = 4;

/// Prime candidates tried per bit of prime size before giving up.
const PRIME_CANDIDATES_PER_BIT: usize = 8;

/// Miller-Rabin rounds per candidate (followed by a Lucas test).
const PRIME_TEST_ROUNDS: usize = 20;

/// Public exponent.
const PUBLIC_EXPONENT: u32 = 65537;

/// An RSA key pair owned by a single operation.
///
/// The private half is zeroized when the pair is dropped.
#[derive(Clone)]
pub struct KeyPair {
    private_key: RsaPrivateKey,
}

impl KeyPair {
    /// Wrap an existing private key.
    pub fn from_private_key(private_key: RsaPrivateKey) -> Self {
        Self { private_key }
    }

    /// The private half.
    pub fn private_key(&self) -> &RsaPrivateKey {
        &self.private_key
    }

    /// The public half.
    pub fn public_key(&self) -> RsaPublicKey {
        self.private_key.to_public_key()
    }

    /// Modulus size in bits.
    pub fn bits(&self) -> usize {
        self.private_key.n().bits()
    }

    /// The public key as SPKI PEM (`-----BEGIN PUBLIC KEY-----`).
    pub fn public_key_pem(&self) -> Result<String> {
        public_key_to_pem(&self.public_key())
    }
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("bits", &self.bits())
            .field("private_key", &"[REDACTED]")
            .finish()
    }
}

/// Encode an RSA public key as SPKI PEM with LF line endings.
pub fn public_key_to_pem(public_key: &RsaPublicKey) -> Result<String> {
    public_key.to_public_key_pem(LineEnding::LF).map_err(|e| {
        SelfSignError::KeyGenerationFailure(format!("Failed to encode public key: {}", e))
    })
}

/// Generate an RSA key pair.
///
/// # Arguments
///
/// * `seed` - Seed driving deterministic generation, or `None` for OS randomness
/// * `bits` - Modulus size, between [`MIN_KEY_BITS`] and [`MAX_KEY_BITS`]
///
/// # Errors
///
/// Returns `SelfSignError::KeyGenerationFailure` if the size is out of range
/// or no valid key is produced within the attempt bound.
pub fn generate_key_pair(seed: Option<&Seed>, bits: usize) -> Result<KeyPair> {
    if !(MIN_KEY_BITS..=MAX_KEY_BITS).contains(&bits) {
        return Err(SelfSignError::KeyGenerationFailure(format!(
            "Key size must be between {} and {} bits (got {})",
            MIN_KEY_BITS, MAX_KEY_BITS, bits
        )));
    }

    tracing::debug!(bits, seeded = seed.is_some(), "generating RSA key pair");

    match seed {
        Some(seed) => {
            let mut stream = SeedStream::new(seed);
            generate_with_rng(&mut stream, bits)
        }
        None => generate_with_rng(&mut OsRng, bits),
    }
}

/// Generate a key pair from an explicit random source.
///
/// Every step is bounded: each prime gets a fixed number of candidates and
/// the assembled key gets [`MAX_KEYGEN_ATTEMPTS`] tries. Retries reuse the
/// same advancing source, so a deterministic source still yields a
/// deterministic result.
pub fn generate_with_rng<R: CryptoRngCore + ?Sized>(rng: &mut R, bits: usize) -> Result<KeyPair> {
    let exponent = BigUint::from(PUBLIC_EXPONENT);
    let p_bits = (bits + 1) / 2;
    let q_bits = bits - p_bits;
    let mut last_error = String::from("no attempts made");

    for attempt in 1..=MAX_KEYGEN_ATTEMPTS {
        let p = search_prime(rng, p_bits, &exponent, None)?;
        let q = search_prime(rng, q_bits, &exponent, Some(&p))?;

        let candidate = RsaPrivateKey::from_p_q(p, q, exponent.clone()).and_then(|key| {
            key.validate()?;
            Ok(key)
        });

        match candidate {
            Ok(private_key) => return Ok(KeyPair::from_private_key(private_key)),
            Err(err) => {
                tracing::warn!(attempt, error = %err, "discarding RSA key generation attempt");
                last_error = err.to_string();
            }
        }
    }

    Err(SelfSignError::KeyGenerationFailure(format!(
        "No valid key after {} attempts: {}",
        MAX_KEYGEN_ATTEMPTS, last_error
    )))
}

/// Draw candidates from `rng` until one is a usable prime of exactly `bits` bits.
fn search_prime<R: CryptoRngCore + ?Sized>(
    rng: &mut R,
    bits: usize,
    exponent: &BigUint,
    exclude: Option<&BigUint>,
) -> Result<BigUint> {
    let byte_len = (bits + 7) / 8;
    let excess_bits = byte_len * 8 - bits;
    let one = BigUint::from(1u8);
    let zero = BigUint::from(0u8);
    let mask = (BigUint::from(3u8) << (bits - 2)) | &one;
    let limit = bits * PRIME_CANDIDATES_PER_BIT;
    let mut bytes = Zeroizing::new(vec![0u8; byte_len]);

    for _ in 0..limit {
        rng.fill_bytes(&mut bytes);
        let candidate = (BigUint::from_bytes_be(&bytes) >> excess_bits) | &mask;

        if exclude == Some(&candidate) {
            continue;
        }
        if (&candidate - &one) % exponent == zero {
            continue;
        }
        if probably_prime(&candidate, PRIME_TEST_ROUNDS) {
            return Ok(candidate);
        }
    }

    Err(SelfSignError::KeyGenerationFailure(format!(
        "No {}-bit prime found in {} candidates",
        bits, limit
    )))
}
