//! Key material for SelfSign identities.
//!
//! - **seed**: SHA-256 seed derivation from a user secret
//! - **rng**: Deterministic byte stream scoped to one key generation
//! - **keypair**: RSA key pair generation (seeded or OS-random)
//! - **passphrase**: Passphrase policy and brainwallet word generation
//!
//! ## Security Model
//!
//! - Brainwallet keys are re-derivable from the passphrase alone
//! - Seeded generation never touches a shared random source
//! - Seeds and private keys are zeroized from memory on drop
//!
//! ## Threat Model
//!
//! We defend against:
//! - Theft of a container file (see `container`)
//! - Concurrent operations influencing each other's randomness
//!
//! We do NOT defend against:
//! - Weak brainwallet passphrases chosen by the user
//! - Compromised OS / keylogger

pub mod keypair;
pub mod passphrase;
pub mod rng;
pub mod seed;

pub use keypair::{
    generate_key_pair, generate_with_rng, public_key_to_pem, KeyPair, DEFAULT_KEY_BITS,
    MAX_KEY_BITS, MIN_KEY_BITS,
};
pub use passphrase::{
    generate_passphrase, validate_passphrase, DEFAULT_PASSPHRASE_WORDS, MIN_PASSPHRASE_LENGTH,
};
pub use rng::SeedStream;
pub use seed::{derive_seed, Seed, SEED_LENGTH};
