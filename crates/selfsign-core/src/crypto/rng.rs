//! Deterministic byte generator for seeded key generation.
//!
//! `SeedStream` expands a [`Seed`] into an unbounded byte stream:
//!
//! ```text
//! block(i) = SHA-256(seed || i as u64 big-endian)
//! stream   = block(0) || block(1) || block(2) || ...
//! ```
//!
//! A stream is an ordinary value passed into exactly one key-generation
//! call. It never replaces or reseeds any process-wide random source, so
//! concurrent operations cannot observe each other.

use rand_core::{impls, CryptoRng, Error, RngCore};
use sha2::{Digest, Sha256};
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::seed::{Seed, SEED_LENGTH};

const BLOCK_LENGTH: usize = 32;

/// Hash-counter byte generator seeded from a [`Seed`].
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SeedStream {
    seed: [u8; SEED_LENGTH],
    counter: u64,
    block: [u8; BLOCK_LENGTH],
    position: usize,
}

impl SeedStream {
    /// Create a stream positioned at the start of the expansion.
    pub fn new(seed: &Seed) -> Self {
        Self {
            seed: *seed.as_bytes(),
            counter: 0,
            block: [0u8; BLOCK_LENGTH],
            // Forces a refill on first use.
            position: BLOCK_LENGTH,
        }
    }

    fn refill(&mut self) {
        let mut hasher = Sha256::new();
        hasher.update(self.seed);
        hasher.update(self.counter.to_be_bytes());
        self.block = hasher.finalize().into();
        self.counter = self.counter.wrapping_add(1);
        self.position = 0;
    }
}

impl std::fmt::Debug for SeedStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeedStream")
            .field("seed", &"[REDACTED]")
            .field("counter", &self.counter)
            .finish()
    }
}

impl RngCore for SeedStream {
    fn next_u32(&mut self) -> u32 {
        impls::next_u32_via_fill(self)
    }

    fn next_u64(&mut self) -> u64 {
        impls::next_u64_via_fill(self)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        let mut written = 0;
        while written < dest.len() {
            if self.position == BLOCK_LENGTH {
                self.refill();
            }
            let take = (BLOCK_LENGTH - self.position).min(dest.len() - written);
            dest[written..written + take]
                .copy_from_slice(&self.block[self.position..self.position + take]);
            self.position += take;
            written += take;
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl CryptoRng for SeedStream {}
