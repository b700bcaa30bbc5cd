//! Hash-then-sign over caller-supplied digest strings.
//!
//! The digest input is treated as opaque UTF-8 text: it is hashed with
//! SHA-256 and the hash is signed with RSA PKCS#1 v1.5. Document hashing is
//! the caller's job.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rsa::pkcs8::DecodePublicKey;
use rsa::{Pkcs1v15Sign, RsaPrivateKey, RsaPublicKey};
use sha2::{Digest, Sha256};

use crate::container;
use crate::error::{Result, SelfSignError};

/// Signature algorithm label for every signature produced here.
pub const SIGNATURE_ALGORITHM: &str = "RSA-SHA256-PKCS1v15";

/// A signature produced by one signing call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureResult {
    pub signature: Vec<u8>,
    pub algorithm: &'static str,
}

impl SignatureResult {
    /// The signature bytes as standard base64.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.signature)
    }
}

/// Unlock `container` and sign `digest_input` with the recovered key.
///
/// Unpack errors are returned unchanged. The private key is dropped, and
/// zeroized, before this function returns.
pub fn sign(container: &str, protecting_secret: &str, digest_input: &str) -> Result<SignatureResult> {
    let unpacked = container::unpack(container, protecting_secret)?;
    tracing::debug!(
        serial = %unpacked.certificate.serial_hex(),
        "signing digest with container key"
    );
    sign_with_key(&unpacked.private_key, digest_input)
}

/// Sign `digest_input` with an already unlocked private key.
pub fn sign_with_key(private_key: &RsaPrivateKey, digest_input: &str) -> Result<SignatureResult> {
    let digest = Sha256::digest(digest_input.as_bytes());
    let signature = private_key
        .sign(Pkcs1v15Sign::new::<Sha256>(), &digest)
        .map_err(|e| SelfSignError::SigningFailure(e.to_string()))?;

    Ok(SignatureResult {
        signature,
        algorithm: SIGNATURE_ALGORITHM,
    })
}

/// Verify a base64 signature over `digest_input` against a public key PEM.
///
/// # Errors
///
/// - `InvalidInput` if the key is not an RSA SPKI PEM or the signature is
///   not base64
/// - `VerificationFailure` if the signature does not match
pub fn verify_signature(public_key_pem: &str, digest_input: &str, signature_base64: &str) -> Result<()> {
    let public_key = RsaPublicKey::from_public_key_pem(public_key_pem.trim())
        .map_err(|e| SelfSignError::InvalidInput(format!("Invalid public key: {}", e)))?;
    let signature = STANDARD
        .decode(signature_base64.trim())
        .map_err(|e| SelfSignError::InvalidInput(format!("Signature is not base64: {}", e)))?;

    verify_with_key(&public_key, digest_input, &signature)
}

/// Verify raw signature bytes over `digest_input`.
pub fn verify_with_key(public_key: &RsaPublicKey, digest_input: &str, signature: &[u8]) -> Result<()> {
    let digest = Sha256::digest(digest_input.as_bytes());
    public_key
        .verify(Pkcs1v15Sign::new::<Sha256>(), &digest, signature)
        .map_err(|_| SelfSignError::VerificationFailure("Signature does not match".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::certificate::{issue_self_signed, SubjectAttributes};
    use crate::crypto::{derive_seed, generate_key_pair, KeyPair};

    fn key_pair() -> KeyPair {
        generate_key_pair(Some(&derive_seed("signing-tests")), 1024).unwrap()
    }

    fn packed(kp: &KeyPair, password: &str) -> String {
        let cert = issue_self_signed(kp, &SubjectAttributes::with_common_name("Alice")).unwrap();
        container::pack(kp, &cert, password).unwrap()
    }

    #[test]
    fn test_sign_and_verify() {
        let kp = key_pair();
        let result = sign_with_key(kp.private_key(), "abc123").unwrap();

        assert_eq!(result.algorithm, SIGNATURE_ALGORITHM);
        assert_eq!(result.signature.len(), 128);
        verify_with_key(&kp.public_key(), "abc123", &result.signature).unwrap();
    }

    #[test]
    fn test_signatures_are_deterministic() {
        let kp = key_pair();
        let a = sign_with_key(kp.private_key(), "abc123").unwrap();
        let b = sign_with_key(kp.private_key(), "abc123").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_sign_from_container_matches_direct_key() {
        let kp = key_pair();
        let container = packed(&kp, "rightpw-123");

        let from_container = sign(&container, "rightpw-123", "abc123").unwrap();
        let direct = sign_with_key(kp.private_key(), "abc123").unwrap();
        assert_eq!(from_container.signature, direct.signature);
    }

    #[test]
    fn test_sign_wrong_password() {
        let kp = key_pair();
        let container = packed(&kp, "rightpw-123");

        let result = sign(&container, "wrongpw", "abc123");
        assert!(matches!(result, Err(SelfSignError::InvalidPassword)));
    }

    #[test]
    fn test_sign_malformed_container() {
        let result = sign("not a container", "pw", "abc123");
        assert!(matches!(result, Err(SelfSignError::MalformedContainer(_))));
    }

    #[test]
    fn test_verify_signature_base64() {
        let kp = key_pair();
        let pem = kp.public_key_pem().unwrap();
        let signature = sign_with_key(kp.private_key(), "abc123").unwrap().to_base64();

        assert!(verify_signature(&pem, "abc123", &signature).is_ok());
    }

    #[test]
    fn test_verify_rejects_other_digest() {
        let kp = key_pair();
        let pem = kp.public_key_pem().unwrap();
        let signature = sign_with_key(kp.private_key(), "abc123").unwrap().to_base64();

        let result = verify_signature(&pem, "abc124", &signature);
        assert!(matches!(result, Err(SelfSignError::VerificationFailure(_))));
    }

    #[test]
    fn test_verify_rejects_other_key() {
        let kp = key_pair();
        let other = generate_key_pair(Some(&derive_seed("signing-tests-other")), 1024).unwrap();
        let signature = sign_with_key(kp.private_key(), "abc123").unwrap().to_base64();

        let result = verify_signature(&other.public_key_pem().unwrap(), "abc123", &signature);
        assert!(matches!(result, Err(SelfSignError::VerificationFailure(_))));
    }

    #[test]
    fn test_verify_bad_inputs() {
        let kp = key_pair();
        let pem = kp.public_key_pem().unwrap();

        assert!(matches!(
            verify_signature("not a key", "abc123", "AAAA"),
            Err(SelfSignError::InvalidInput(_))
        ));
        assert!(matches!(
            verify_signature(&pem, "abc123", "%%%"),
            Err(SelfSignError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_empty_digest_input_is_signable() {
        let kp = key_pair();
        let result = sign_with_key(kp.private_key(), "").unwrap();
        verify_with_key(&kp.public_key(), "", &result.signature).unwrap();
    }
}
