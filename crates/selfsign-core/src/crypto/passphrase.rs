//! Passphrase policy and brainwallet passphrase generation.
//!
//! Seed derivation accepts any string; the minimum-entropy policy lives here
//! so callers can enforce it before generating an identity.

use bip39::Language;
use rand::rngs::OsRng;
use rand::seq::SliceRandom;

use crate::error::{Result, SelfSignError};

/// Minimum passphrase length in characters.
pub const MIN_PASSPHRASE_LENGTH: usize = 8;

/// Default number of words in a generated passphrase.
pub const DEFAULT_PASSPHRASE_WORDS: usize = 10;

/// Validate a passphrase or password against a minimum length.
///
/// # Requirements
///
/// - Not empty or only whitespace
/// - At least `min_length` characters long
///
/// # Examples
///
/// ```
/// use selfsign_core::crypto::{validate_passphrase, MIN_PASSPHRASE_LENGTH};
///
/// assert!(validate_passphrase("my-secure-passphrase-123", MIN_PASSPHRASE_LENGTH).is_ok());
/// assert!(validate_passphrase("short", MIN_PASSPHRASE_LENGTH).is_err());
/// ```
pub fn validate_passphrase(passphrase: &str, min_length: usize) -> Result<()> {
    if passphrase.trim().is_empty() {
        return Err(SelfSignError::InvalidInput(
            "Passphrase cannot be empty".to_string(),
        ));
    }

    let length = passphrase.chars().count();
    if length < min_length {
        return Err(SelfSignError::InvalidInput(format!(
            "Passphrase must be at least {} characters (got {})",
            min_length, length
        )));
    }

    Ok(())
}

/// Generate a brainwallet passphrase of `word_count` words.
///
/// Words are drawn uniformly and independently from the BIP-39 English word
/// list using the operating system's secure random source, and joined by
/// single spaces. Each word contributes 11 bits of entropy.
pub fn generate_passphrase(word_count: usize) -> Result<String> {
    if word_count == 0 {
        return Err(SelfSignError::InvalidInput(
            "Passphrase must contain at least one word".to_string(),
        ));
    }

    let words = Language::English.word_list();
    let mut rng = OsRng;
    let chosen: Vec<&str> = (0..word_count)
        .filter_map(|_| words.choose(&mut rng).copied())
        .collect();

    Ok(chosen.join(" "))
}
