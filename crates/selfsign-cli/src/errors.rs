//! CLI error types for structured error handling.
//!
//! This module provides typed errors that map to specific exit codes,
//! enabling consistent error handling across the CLI.

use std::fmt;

use selfsign_core::SelfSignError;

use crate::constants::exit_codes;

/// CLI-specific errors with associated exit codes.
#[derive(Debug)]
pub enum CliError {
    /// Resource not found (container, key file, etc.)
    NotFound { message: String, hint: String },

    /// Authentication failed (wrong password, too many attempts)
    AuthFailed {
        message: String,
        hint: Option<String>,
    },

    /// Invalid user input
    InvalidInput(String),

    /// Checksum or signature did not verify
    IntegrityFailed(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::NotFound { message, .. } => write!(f, "{}", message),
            CliError::AuthFailed { message, .. } => write!(f, "{}", message),
            CliError::InvalidInput(message) => write!(f, "{}", message),
            CliError::IntegrityFailed(message) => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for CliError {}

impl CliError {
    /// Create a NotFound error with message and hint.
    pub fn not_found(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::NotFound {
            message: message.into(),
            hint: hint.into(),
        }
    }

    /// Create an AuthFailed error with message and hint.
    pub fn auth_failed_with_hint(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::AuthFailed {
            message: message.into(),
            hint: Some(hint.into()),
        }
    }

    /// Create an InvalidInput error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        CliError::InvalidInput(message.into())
    }

    /// Get the hint attached to this error, if any.
    pub fn hint(&self) -> Option<&str> {
        match self {
            CliError::NotFound { hint, .. } => Some(hint.as_str()),
            CliError::AuthFailed { hint, .. } => hint.as_deref(),
            _ => None,
        }
    }

    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::NotFound { .. } => exit_codes::NOT_FOUND,
            CliError::AuthFailed { .. } => exit_codes::AUTH_FAILED,
            CliError::InvalidInput(_) => exit_codes::INVALID_INPUT,
            CliError::IntegrityFailed(_) => exit_codes::INTEGRITY_FAILED,
        }
    }
}

/// Exit code for a core error that reached the top level.
pub fn core_exit_code(err: &SelfSignError) -> i32 {
    match err {
        SelfSignError::InvalidPassword => exit_codes::AUTH_FAILED,
        SelfSignError::ChecksumMismatch | SelfSignError::VerificationFailure(_) => {
            exit_codes::INTEGRITY_FAILED
        }
        SelfSignError::InvalidInput(_)
        | SelfSignError::InvalidIdentity(_)
        | SelfSignError::MalformedContainer(_)
        | SelfSignError::NoPrivateKeyFound
        | SelfSignError::UnsupportedKeyType(_) => exit_codes::INVALID_INPUT,
        _ => exit_codes::GENERAL,
    }
}

/// Exit code and optional hint for any error returned by a command.
pub fn classify(err: &anyhow::Error) -> (i32, Option<String>) {
    if let Some(cli) = err.downcast_ref::<CliError>() {
        return (cli.exit_code(), cli.hint().map(str::to_string));
    }
    if let Some(core) = err.downcast_ref::<SelfSignError>() {
        return (core_exit_code(core), core_hint(core));
    }
    (exit_codes::GENERAL, None)
}

fn core_hint(err: &SelfSignError) -> Option<String> {
    match err {
        SelfSignError::MalformedContainer(_) => {
            Some("Hint: Pass the file written by `selfsign generate`.".to_string())
        }
        SelfSignError::ChecksumMismatch => Some(
            "Hint: The identity string was altered in transit. Copy it again in full.".to_string(),
        ),
        SelfSignError::InvalidPassword => Some(
            "Hint: Brainwallet containers are unlocked with the passphrase itself.".to_string(),
        ),
        SelfSignError::ExcessiveWork { .. } => Some(
            "Hint: The container was sealed on a faster machine. Open it there, or on hardware \
             at least as fast."
                .to_string(),
        ),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_error_exit_codes() {
        assert_eq!(CliError::not_found("x", "y").exit_code(), 3);
        assert_eq!(CliError::invalid_input("x").exit_code(), 4);
        assert_eq!(CliError::auth_failed_with_hint("x", "y").exit_code(), 5);
        assert_eq!(CliError::IntegrityFailed("x".into()).exit_code(), 6);
    }

    #[test]
    fn test_core_error_exit_codes() {
        assert_eq!(core_exit_code(&SelfSignError::InvalidPassword), 5);
        assert_eq!(core_exit_code(&SelfSignError::ChecksumMismatch), 6);
        assert_eq!(core_exit_code(&SelfSignError::MalformedContainer("x".into())), 4);
        assert_eq!(core_exit_code(&SelfSignError::SigningFailure("x".into())), 1);
    }

    #[test]
    fn test_classify_through_anyhow() {
        let err = anyhow::Error::new(SelfSignError::ChecksumMismatch);
        let (code, hint) = classify(&err);
        assert_eq!(code, 6);
        assert!(hint.is_some());

        let err = anyhow::Error::new(CliError::not_found("missing", "Hint: look"));
        assert_eq!(classify(&err), (3, Some("Hint: look".to_string())));

        let err = anyhow::Error::new(SelfSignError::ExcessiveWork {
            required: 22,
            target: 18,
        });
        let (code, hint) = classify(&err);
        assert_eq!(code, 1);
        assert!(hint.unwrap().contains("faster machine"));

        let err = anyhow::anyhow!("plain failure");
        assert_eq!(classify(&err), (1, None));
    }
}
