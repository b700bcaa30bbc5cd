//! Exported public identities.
//!
//! Wire format: `base64(json({"publicKey", "alias"})) + "." + hex(sha256(base64))`.
//!
//! The checksum catches transcription errors only. Anyone can recompute it
//! for a modified payload, so it says nothing about who produced the string.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rsa::pkcs8::{DecodePublicKey, EncodePublicKey};
use rsa::RsaPublicKey;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{Result, SelfSignError};

/// Separator between payload and checksum.
pub const CHECKSUM_SEPARATOR: char = '.';

/// A public key and the alias it is published under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedIdentity {
    pub public_key: String,
    pub alias: String,
}

impl ExportedIdentity {
    pub fn new(public_key: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            public_key: public_key.into(),
            alias: alias.into(),
        }
    }

    /// Encode as a checksum-tagged transport string.
    pub fn encode(&self) -> Result<String> {
        let json = serde_json::to_vec(self)?;
        let payload = STANDARD.encode(json);
        let checksum = checksum(&payload);
        Ok(format!("{}{}{}", payload, CHECKSUM_SEPARATOR, checksum))
    }

    /// Parse the embedded public key.
    pub fn rsa_public_key(&self) -> Result<RsaPublicKey> {
        RsaPublicKey::from_public_key_pem(self.public_key.trim())
            .map_err(|e| SelfSignError::InvalidIdentity(format!("Public key is not RSA PEM: {}", e)))
    }

    /// Short hex fingerprint of the public key.
    ///
    /// Taken over the SPKI DER, so PEM line endings and wrapping do not matter.
    pub fn fingerprint(&self) -> Result<String> {
        let der = self.rsa_public_key()?.to_public_key_der().map_err(|e| {
            SelfSignError::InvalidIdentity(format!("Failed to encode public key: {}", e))
        })?;
        Ok(hex::encode(&Sha256::digest(der.as_bytes())[..8]))
    }
}

/// Export `public_key_pem` under `alias`.
///
/// # Examples
///
/// ```
/// use selfsign_core::identity::export_identity;
///
/// let exported = export_identity("-----BEGIN PUBLIC KEY-----\n...", "alice").unwrap();
/// let (payload, checksum) = exported.rsplit_once('.').unwrap();
/// assert!(!payload.is_empty());
/// assert_eq!(checksum.len(), 64);
/// ```
pub fn export_identity(public_key_pem: &str, alias: &str) -> Result<String> {
    ExportedIdentity::new(public_key_pem, alias).encode()
}

/// Parse and verify an exported identity string.
///
/// # Errors
///
/// - `InvalidIdentity` if the string has no checksum, the payload is not
///   base64 JSON, or the public key is not an RSA PEM
/// - `ChecksumMismatch` if the checksum does not match the payload
pub fn import_identity(text: &str) -> Result<ExportedIdentity> {
    let text = text.trim();
    let (payload, expected) = text.rsplit_once(CHECKSUM_SEPARATOR).ok_or_else(|| {
        SelfSignError::InvalidIdentity("Missing checksum separator".to_string())
    })?;

    if payload.is_empty() {
        return Err(SelfSignError::InvalidIdentity("Empty payload".to_string()));
    }
    if checksum(payload) != expected.to_ascii_lowercase() {
        return Err(SelfSignError::ChecksumMismatch);
    }

    let json = STANDARD
        .decode(payload)
        .map_err(|e| SelfSignError::InvalidIdentity(format!("Payload is not base64: {}", e)))?;
    let identity: ExportedIdentity = serde_json::from_slice(&json)
        .map_err(|e| SelfSignError::InvalidIdentity(format!("Payload is not an identity: {}", e)))?;

    identity.rsa_public_key()?;
    Ok(identity)
}

fn checksum(payload: &str) -> String {
    hex::encode(Sha256::digest(payload.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{derive_seed, generate_key_pair};

    fn pem() -> String {
        generate_key_pair(Some(&derive_seed("identity-tests")), 1024)
            .unwrap()
            .public_key_pem()
            .unwrap()
    }

    #[test]
    fn test_export_format() {
        let exported = export_identity("PEM", "alice").unwrap();
        let (payload, tag) = exported.rsplit_once('.').unwrap();

        let json = STANDARD.decode(payload).unwrap();
        assert_eq!(json, br#"{"publicKey":"PEM","alias":"alice"}"#);
        assert_eq!(tag, hex::encode(Sha256::digest(payload.as_bytes())));
    }

    #[test]
    fn test_import_round_trip() {
        let pem = pem();
        let exported = export_identity(&pem, "alice").unwrap();

        let imported = import_identity(&exported).unwrap();
        assert_eq!(imported.public_key, pem);
        assert_eq!(imported.alias, "alice");
    }

    #[test]
    fn test_single_character_flip_detected() {
        let exported = export_identity(&pem(), "alice").unwrap();
        let (payload, _) = exported.rsplit_once('.').unwrap();

        for index in [0, payload.len() / 2, payload.len() - 1] {
            let mut bytes = exported.clone().into_bytes();
            bytes[index] = if bytes[index] == b'A' { b'B' } else { b'A' };
            let tampered = String::from_utf8(bytes).unwrap();

            assert!(
                matches!(import_identity(&tampered), Err(SelfSignError::ChecksumMismatch)),
                "flip at {} not detected",
                index
            );
        }
    }

    #[test]
    fn test_missing_separator() {
        let result = import_identity("no-separator-here");
        assert!(matches!(result, Err(SelfSignError::InvalidIdentity(_))));
    }

    #[test]
    fn test_truncated_checksum() {
        let exported = export_identity(&pem(), "alice").unwrap();
        let truncated = &exported[..exported.len() - 4];
        assert!(matches!(
            import_identity(truncated),
            Err(SelfSignError::ChecksumMismatch)
        ));
    }

    #[test]
    fn test_valid_checksum_non_rsa_key_rejected() {
        let exported = export_identity("not a key", "alice").unwrap();
        assert!(matches!(
            import_identity(&exported),
            Err(SelfSignError::InvalidIdentity(_))
        ));
    }

    #[test]
    fn test_surrounding_whitespace_ignored() {
        let exported = export_identity(&pem(), "alice").unwrap();
        assert!(import_identity(&format!("  {}\n", exported)).is_ok());
    }

    #[test]
    fn test_fingerprint_stable() {
        let identity = ExportedIdentity::new(pem(), "alice");
        let fingerprint = identity.fingerprint().unwrap();
        assert_eq!(fingerprint, identity.clone().fingerprint().unwrap());
        assert_eq!(fingerprint.len(), 16);
    }

    #[test]
    fn test_fingerprint_ignores_line_endings() {
        let pem = pem();
        let lf = ExportedIdentity::new(pem.clone(), "alice");
        let crlf = ExportedIdentity::new(pem.replace('\n', "\r\n"), "alice");

        assert_ne!(lf.public_key, crlf.public_key);
        assert_eq!(lf.fingerprint().unwrap(), crlf.fingerprint().unwrap());
    }

    #[test]
    fn test_fingerprint_requires_rsa_key() {
        let identity = ExportedIdentity::new("not a key", "alice");
        assert!(matches!(
            identity.fingerprint(),
            Err(SelfSignError::InvalidIdentity(_))
        ));
    }
}
