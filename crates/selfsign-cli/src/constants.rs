//! Constants used throughout the CLI.

/// Exit codes for the CLI.
///
/// These follow common Unix conventions:
/// - 0: Success
/// - 1: General error (used by anyhow for unhandled errors)
/// - 2: Misuse of shell command (reserved by shells)
/// - 3+: Application-specific errors
pub mod exit_codes {
    /// General failure.
    pub const GENERAL: i32 = 1;

    /// Resource not found (container, key file, config).
    pub const NOT_FOUND: i32 = 3;

    /// Invalid user input or arguments.
    pub const INVALID_INPUT: i32 = 4;

    /// Authentication failed (wrong password, too many attempts).
    pub const AUTH_FAILED: i32 = 5;

    /// Integrity check failed (identity checksum, signature verification).
    pub const INTEGRITY_FAILED: i32 = 6;
}

/// Environment variables read by the CLI.
pub mod env_vars {
    /// Brainwallet passphrase.
    pub const PASSPHRASE: &str = "SELFSIGN_PASSPHRASE";

    /// Container password.
    pub const PASSWORD: &str = "SELFSIGN_PASSWORD";

    /// Config file override.
    pub const CONFIG: &str = "SELFSIGN_CONFIG";

    /// Log filter directives.
    pub const LOG: &str = "SELFSIGN_LOG";

    /// Comma-separated password attempts (test-support builds only).
    pub const TEST_PASSWORD_ATTEMPTS: &str = "SELFSIGN_TEST_PASSWORD_ATTEMPTS";
}

/// Maximum interactive password attempts before giving up.
pub const MAX_PASSWORD_ATTEMPTS: u32 = 3;

/// File extension for written containers.
pub const CONTAINER_EXTENSION: &str = "selfsign";
