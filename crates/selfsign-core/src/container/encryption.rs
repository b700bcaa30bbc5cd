//! Age passphrase encryption for containers.
//!
//! Age derives the file key from the passphrase with scrypt and protects the
//! payload with ChaCha20-Poly1305, so a wrong passphrase is rejected by an
//! authentication check rather than producing garbage.

use std::io::{Read, Write};
use std::iter;

use age::secrecy::SecretString;
use zeroize::Zeroizing;

use crate::error::{Result, SelfSignError};

/// Encrypt data using Age passphrase-based encryption.
///
/// # Examples
///
/// ```
/// use selfsign_core::container::encryption::encrypt;
///
/// let plaintext = b"secret data";
/// let encrypted = encrypt(plaintext, "my-secure-passphrase").unwrap();
/// assert_ne!(encrypted.as_slice(), plaintext);
/// ```
pub fn encrypt(data: &[u8], passphrase: &str) -> Result<Vec<u8>> {
    let encryptor =
        age::Encryptor::with_user_passphrase(SecretString::from(passphrase.to_string()));

    let mut encrypted = Vec::new();
    let mut writer = encryptor.wrap_output(&mut encrypted).map_err(|e| {
        SelfSignError::ContainerPackingFailure(format!("Failed to create encryptor: {}", e))
    })?;

    writer.write_all(data).map_err(|e| {
        SelfSignError::ContainerPackingFailure(format!("Encryption write failed: {}", e))
    })?;

    writer.finish().map_err(|e| {
        SelfSignError::ContainerPackingFailure(format!("Encryption finish failed: {}", e))
    })?;

    Ok(encrypted)
}

/// Decrypt data using Age passphrase-based encryption.
///
/// # Errors
///
/// - `SelfSignError::InvalidPassword` if the passphrase does not unlock the data
/// - `SelfSignError::ExcessiveWork` if the data was sealed with a larger scrypt
///   work factor than this device accepts
/// - `SelfSignError::MalformedContainer` if the data is not an age file or is corrupted
pub fn decrypt(encrypted_data: &[u8], passphrase: &str) -> Result<Zeroizing<Vec<u8>>> {
    decrypt_with_work_limit(encrypted_data, passphrase, None)
}

fn decrypt_with_work_limit(
    encrypted_data: &[u8],
    passphrase: &str,
    max_work_factor: Option<u8>,
) -> Result<Zeroizing<Vec<u8>>> {
    let decryptor = age::Decryptor::new(encrypted_data)
        .map_err(|e| SelfSignError::MalformedContainer(format!("Unreadable header: {}", e)))?;

    let mut identity = age::scrypt::Identity::new(SecretString::from(passphrase.to_string()));
    if let Some(limit) = max_work_factor {
        identity.set_max_work_factor(limit);
    }
    let mut reader = decryptor
        .decrypt(iter::once(&identity as &dyn age::Identity))
        .map_err(|e| match e {
            age::DecryptError::NoMatchingKeys
            | age::DecryptError::DecryptionFailed
            | age::DecryptError::KeyDecryptionFailed => SelfSignError::InvalidPassword,
            age::DecryptError::ExcessiveWork { required, target } => {
                SelfSignError::ExcessiveWork { required, target }
            }
            _ => SelfSignError::MalformedContainer(format!("Decryption failed: {}", e)),
        })?;

    let mut decrypted = Zeroizing::new(Vec::new());
    reader.read_to_end(&mut decrypted).map_err(|e| {
        SelfSignError::MalformedContainer(format!("Failed to read decrypted data: {}", e))
    })?;

    Ok(decrypted)
}
