//! Error types for SelfSign core operations.
//!
//! Every operation is all-or-nothing: failures are terminal for the call that
//! raised them and are surfaced verbatim. The CLI layer maps these to
//! user-friendly messages and exit codes.

use thiserror::Error;

/// Result type alias for SelfSign operations.
pub type Result<T> = std::result::Result<T, SelfSignError>;

/// Core error type for SelfSign operations.
#[derive(Debug, Error)]
pub enum SelfSignError {
    /// RSA key construction failed
    #[error("Key generation failed: {0}")]
    KeyGenerationFailure(String),

    /// Building or signing the self-signed certificate failed
    #[error("Certificate generation failed: {0}")]
    CertificateGenerationFailure(String),

    /// Encoding or encrypting a container failed
    #[error("Container packing failed: {0}")]
    ContainerPackingFailure(String),

    /// The container could not be decrypted with the supplied secret
    #[error("Invalid password")]
    InvalidPassword,

    /// The input is not a container, whatever the password
    #[error("Malformed container: {0}")]
    MalformedContainer(String),

    /// The container asks for more scrypt work than this device accepts
    #[error(
        "Container needs more key-stretching work than this device allows \
         (work factor {required}, limit {target})"
    )]
    ExcessiveWork { required: u8, target: u8 },

    /// The container decrypted but holds no private key
    #[error("No private key found in container")]
    NoPrivateKeyFound,

    /// The recovered private key is not an RSA key
    #[error("Unsupported key type: {0}")]
    UnsupportedKeyType(String),

    /// Producing a signature failed
    #[error("Signing failed: {0}")]
    SigningFailure(String),

    /// An exported identity string could not be parsed
    #[error("Invalid identity: {0}")]
    InvalidIdentity(String),

    /// An exported identity checksum does not match its payload
    #[error("Identity checksum mismatch")]
    ChecksumMismatch,

    /// A signature or certificate did not verify
    #[error("Verification failed: {0}")]
    VerificationFailure(String),

    /// Invalid caller input (policy violations, bad parameters)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
}

impl SelfSignError {
    /// True when the failure is a wrong container secret.
    ///
    /// This is the only error expected under normal use; callers re-prompt
    /// instead of reporting a fatal problem.
    pub fn is_invalid_password(&self) -> bool {
        matches!(self, SelfSignError::InvalidPassword)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_password_is_distinguishable() {
        assert!(SelfSignError::InvalidPassword.is_invalid_password());
        assert!(!SelfSignError::MalformedContainer("bad".to_string()).is_invalid_password());
        assert!(!SelfSignError::NoPrivateKeyFound.is_invalid_password());
    }

    #[test]
    fn test_excessive_work_names_both_factors() {
        let err = SelfSignError::ExcessiveWork {
            required: 22,
            target: 18,
        };
        let message = err.to_string();
        assert!(message.contains("22"));
        assert!(message.contains("18"));
        assert!(!message.contains("Malformed"));
    }

    #[test]
    fn test_invalid_password_message_has_no_detail() {
        assert_eq!(SelfSignError::InvalidPassword.to_string(), "Invalid password");
    }
}
