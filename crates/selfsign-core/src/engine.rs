//! Boundary operations: generate an identity, sign a digest.
//!
//! Every call receives all of its inputs explicitly and shares no state with
//! other calls, so the functions here may be invoked from any number of
//! threads at once.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::certificate::{issue_self_signed, Certificate, SubjectAttributes};
use crate::container;
use crate::crypto::{derive_seed, generate_key_pair, DEFAULT_KEY_BITS};
use crate::error::Result;
use crate::signing::{self, SIGNATURE_ALGORITHM};

/// Engine settings passed to each generation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// RSA modulus size in bits.
    pub key_bits: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            key_bits: DEFAULT_KEY_BITS,
        }
    }
}

/// How the key material of a new identity is produced.
pub enum GenerationMethod {
    /// Keys are derived from the passphrase, which also protects the container.
    Brainwallet { passphrase: SecretString },
    /// Keys come from the OS random source; `password` protects the container.
    RandomFile { password: SecretString },
}

impl GenerationMethod {
    pub fn name(&self) -> &'static str {
        match self {
            GenerationMethod::Brainwallet { .. } => "brainwallet",
            GenerationMethod::RandomFile { .. } => "random",
        }
    }

    /// The secret that unlocks the resulting container.
    pub fn protecting_secret(&self) -> &SecretString {
        match self {
            GenerationMethod::Brainwallet { passphrase } => passphrase,
            GenerationMethod::RandomFile { password } => password,
        }
    }
}

impl std::fmt::Debug for GenerationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationMethod")
            .field("method", &self.name())
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

/// A freshly generated identity.
#[derive(Debug, Clone)]
pub struct GeneratedIdentity {
    /// Base64 password-protected container.
    pub container: String,
    /// SPKI PEM of the public key.
    pub public_key_pem: String,
    pub certificate: Certificate,
}

/// Result of [`sign_digest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedDigest {
    pub signature_base64: String,
    pub algorithm: String,
}

/// Generate a key pair, issue its self-signed certificate and pack both.
///
/// # Examples
///
/// ```no_run
/// use secrecy::SecretString;
/// use selfsign_core::certificate::SubjectAttributes;
/// use selfsign_core::engine::{generate_identity, EngineConfig, GenerationMethod};
///
/// let method = GenerationMethod::Brainwallet {
///     passphrase: SecretString::from("correct horse battery staple".to_string()),
/// };
/// let identity = generate_identity(
///     &method,
///     &SubjectAttributes::with_common_name("Alice"),
///     &EngineConfig::default(),
/// )
/// .unwrap();
/// assert!(identity.public_key_pem.starts_with("-----BEGIN PUBLIC KEY-----"));
/// ```
pub fn generate_identity(
    method: &GenerationMethod,
    attrs: &SubjectAttributes,
    config: &EngineConfig,
) -> Result<GeneratedIdentity> {
    tracing::debug!(method = method.name(), bits = config.key_bits, "generating identity");

    let key_pair = match method {
        GenerationMethod::Brainwallet { passphrase } => {
            let seed = derive_seed(passphrase.expose_secret());
            generate_key_pair(Some(&seed), config.key_bits)?
        }
        GenerationMethod::RandomFile { .. } => generate_key_pair(None, config.key_bits)?,
    };

    let certificate = issue_self_signed(&key_pair, attrs)?;
    let container = container::pack(
        &key_pair,
        &certificate,
        method.protecting_secret().expose_secret(),
    )?;
    let public_key_pem = key_pair.public_key_pem()?;

    tracing::info!(
        method = method.name(),
        bits = key_pair.bits(),
        serial = %certificate.serial_hex(),
        "identity generated"
    );

    Ok(GeneratedIdentity {
        container,
        public_key_pem,
        certificate,
    })
}

/// Unlock a container and sign `digest_input`, returning base64.
pub fn sign_digest(container: &str, protecting_secret: &str, digest_input: &str) -> Result<SignedDigest> {
    let result = signing::sign(container, protecting_secret, digest_input)?;
    Ok(SignedDigest {
        signature_base64: result.to_base64(),
        algorithm: SIGNATURE_ALGORITHM.to_string(),
    })
}

/// Re-derive the public key PEM a brainwallet passphrase produces.
pub fn derive_public_key_pem(passphrase: &SecretString, config: &EngineConfig) -> Result<String> {
    let seed = derive_seed(passphrase.expose_secret());
    generate_key_pair(Some(&seed), config.key_bits)?.public_key_pem()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SelfSignError;

    const TEST_CONFIG: EngineConfig = EngineConfig { key_bits: 1024 };

    fn brainwallet(passphrase: &str) -> GenerationMethod {
        GenerationMethod::Brainwallet {
            passphrase: SecretString::from(passphrase.to_string()),
        }
    }

    #[test]
    fn test_default_config() {
        assert_eq!(EngineConfig::default().key_bits, 2048);
    }

    #[test]
    fn test_config_deserialize_defaults() {
        let config: EngineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_brainwallet_container_opens_with_passphrase() {
        let method = brainwallet("correct horse battery staple");
        let attrs = SubjectAttributes::with_common_name("Alice");
        let identity = generate_identity(&method, &attrs, &TEST_CONFIG).unwrap();

        let unpacked = container::unpack(&identity.container, "correct horse battery staple").unwrap();
        assert_eq!(unpacked.certificate, identity.certificate);
        assert_eq!(unpacked.private_key.to_public_key(), identity.certificate.public_key().unwrap());
    }

    #[test]
    fn test_random_file_uses_password() {
        let method = GenerationMethod::RandomFile {
            password: SecretString::from("file-password-1".to_string()),
        };
        let identity =
            generate_identity(&method, &SubjectAttributes::default(), &TEST_CONFIG).unwrap();

        assert!(container::check_password(&identity.container, "file-password-1").is_ok());
        assert!(matches!(
            container::check_password(&identity.container, "other-password"),
            Err(SelfSignError::InvalidPassword)
        ));
    }

    #[test]
    fn test_random_identities_differ() {
        let method = GenerationMethod::RandomFile {
            password: SecretString::from("file-password-1".to_string()),
        };
        let attrs = SubjectAttributes::default();
        let a = generate_identity(&method, &attrs, &TEST_CONFIG).unwrap();
        let b = generate_identity(&method, &attrs, &TEST_CONFIG).unwrap();
        assert_ne!(a.public_key_pem, b.public_key_pem);
    }

    #[test]
    fn test_derive_public_key_matches_generated() {
        let method = brainwallet("correct horse battery staple");
        let identity =
            generate_identity(&method, &SubjectAttributes::default(), &TEST_CONFIG).unwrap();

        let derived = derive_public_key_pem(method.protecting_secret(), &TEST_CONFIG).unwrap();
        assert_eq!(derived, identity.public_key_pem);
    }

    #[test]
    fn test_sign_digest_verifies() {
        let method = brainwallet("rightpw-for-tests");
        let identity =
            generate_identity(&method, &SubjectAttributes::default(), &TEST_CONFIG).unwrap();

        let signed = sign_digest(&identity.container, "rightpw-for-tests", "abc123").unwrap();
        assert_eq!(signed.algorithm, SIGNATURE_ALGORITHM);
        signing::verify_signature(&identity.public_key_pem, "abc123", &signed.signature_base64)
            .unwrap();
    }

    #[test]
    fn test_invalid_key_size_rejected() {
        let config = EngineConfig { key_bits: 512 };
        let result = generate_identity(&brainwallet("whatever-pass"), &SubjectAttributes::default(), &config);
        assert!(matches!(result, Err(SelfSignError::KeyGenerationFailure(_))));
    }

    #[test]
    fn test_method_debug_redacts_secret() {
        let debug = format!("{:?}", brainwallet("super-secret-words"));
        assert!(!debug.contains("super-secret-words"));
        assert!(debug.contains("brainwallet"));
    }
}
