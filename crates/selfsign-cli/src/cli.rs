use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use selfsign_core::VERSION;

/// SelfSign - self-owned RSA identities and digest signatures
#[derive(Parser)]
#[command(name = "selfsign")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the config file
    #[arg(long, global = true, env = "SELFSIGN_CONFIG")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose logging to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Use ASCII symbols only
    #[arg(long, global = true)]
    pub ascii: bool,
}

/// How key material is produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MethodArg {
    /// Keys derived from a memorized passphrase
    Brainwallet,
    /// Keys from OS randomness, container protected by a password
    Random,
}

/// Subject attributes for the certificate
#[derive(Args, Debug, Default)]
pub struct SubjectArgs {
    /// Common name (CN)
    #[arg(long)]
    pub cn: Option<String>,

    /// Country (C)
    #[arg(long)]
    pub country: Option<String>,

    /// State or province (ST)
    #[arg(long)]
    pub state: Option<String>,

    /// Locality (L)
    #[arg(long)]
    pub locality: Option<String>,

    /// Organization (O)
    #[arg(long)]
    pub org: Option<String>,

    /// Organizational unit (OU)
    #[arg(long)]
    pub org_unit: Option<String>,
}

/// Arguments for the `generate` command
#[derive(Args)]
pub struct GenerateArgs {
    /// Key generation method
    #[arg(long, value_enum)]
    pub method: Option<MethodArg>,

    #[command(flatten)]
    pub subject: SubjectArgs,

    /// Alias for the exported identity (defaults to the common name)
    #[arg(long)]
    pub alias: Option<String>,

    /// Where to write the container
    #[arg(long, value_name = "FILE")]
    pub out: Option<String>,

    /// Also write the public key PEM here
    #[arg(long, value_name = "FILE")]
    pub public_key_out: Option<String>,

    /// Generate a fresh brainwallet passphrase
    #[arg(long)]
    pub new_passphrase: bool,

    /// Overwrite existing files
    #[arg(long)]
    pub force: bool,

    /// Disable interactive prompts
    #[arg(long)]
    pub no_input: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `sign` command
#[derive(Args)]
pub struct SignArgs {
    /// Container file
    #[arg(long, value_name = "FILE")]
    pub container: String,

    /// Digest input to sign (e.g. a document's hex hash)
    #[arg(long, value_name = "TEXT")]
    pub digest: String,

    /// Disable interactive prompts
    #[arg(long)]
    pub no_input: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `check` command
#[derive(Args)]
pub struct CheckArgs {
    /// Container file
    #[arg(long, value_name = "FILE")]
    pub container: String,

    /// Disable interactive prompts
    #[arg(long)]
    pub no_input: bool,
}

/// Arguments for the `inspect` command
#[derive(Args)]
pub struct InspectArgs {
    /// Container file
    #[arg(long, value_name = "FILE")]
    pub container: String,

    /// Disable interactive prompts
    #[arg(long)]
    pub no_input: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `export` command
#[derive(Args)]
pub struct ExportArgs {
    /// Public key PEM file
    #[arg(long, value_name = "FILE")]
    pub public_key: String,

    /// Alias to publish the key under
    #[arg(long)]
    pub alias: String,
}

/// Arguments for the `import` command
#[derive(Args)]
pub struct ImportArgs {
    /// Identity string, or @FILE to read it from a file
    #[arg(value_name = "IDENTITY|@FILE")]
    pub identity: String,

    /// Write the public key PEM here
    #[arg(long, value_name = "FILE")]
    pub public_key_out: Option<String>,

    /// Overwrite existing files
    #[arg(long)]
    pub force: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `verify` command
#[derive(Args)]
pub struct VerifyArgs {
    /// Public key PEM file
    #[arg(long, value_name = "FILE")]
    pub public_key: String,

    /// Digest input that was signed
    #[arg(long, value_name = "TEXT")]
    pub digest: String,

    /// Base64 signature, or @FILE
    #[arg(long, value_name = "B64|@FILE")]
    pub signature: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `passphrase` command
#[derive(Args)]
pub struct PassphraseArgs {
    /// Number of words (defaults to the configured count)
    #[arg(long)]
    pub words: Option<usize>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a new identity (key pair, certificate, container)
    Generate(GenerateArgs),

    /// Sign a digest with a container's private key
    Sign(SignArgs),

    /// Check that a password unlocks a container
    Check(CheckArgs),

    /// Show the certificate inside a container
    Inspect(InspectArgs),

    /// Export a public key as an identity string
    Export(ExportArgs),

    /// Verify and decode an identity string
    Import(ImportArgs),

    /// Verify a signature against a public key
    Verify(VerifyArgs),

    /// Generate a brainwallet passphrase
    Passphrase(PassphraseArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_name = "SHELL")]
        shell: Shell,
    },
}
