//! # SelfSign Core
//!
//! Core library for SelfSign - self-owned RSA identities and signatures over
//! caller-supplied digests, with no private key ever leaving the device.
//!
//! This crate provides the credential engine independent of the CLI
//! interface.
//!
//! ## Architecture
//!
//! - **crypto**: Seed derivation, deterministic and random RSA key generation
//! - **certificate**: Self-signed X.509 issuance and inspection
//! - **container**: Password-protected key + certificate containers
//! - **signing**: Hash-then-sign and signature verification
//! - **identity**: Checksum-tagged public identity export and import
//! - **engine**: `generate_identity` / `sign_digest` boundary operations
//!
//! ## Flow
//!
//! ```text
//! secret -> derive_seed -> generate_key_pair -> issue_self_signed -> pack
//! container + secret -> unpack -> sign
//! ```

pub mod certificate;
pub mod container;
pub mod crypto;
pub mod engine;
pub mod error;
pub mod identity;
pub mod signing;

pub use certificate::{Certificate, CertificateSummary, SubjectAttributes};
pub use engine::{
    derive_public_key_pem, generate_identity, sign_digest, EngineConfig, GeneratedIdentity,
    GenerationMethod, SignedDigest,
};
pub use error::{Result, SelfSignError};
pub use identity::{export_identity, import_identity, ExportedIdentity};
pub use signing::{verify_signature, SignatureResult};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
