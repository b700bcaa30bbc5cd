//! SelfSign CLI - self-owned RSA identities and digest signatures
//!
//! This is the command-line interface for SelfSign. It collects secrets,
//! subject attributes and digests, and drives the core library's
//! `generate_identity` and `sign_digest` operations.

mod app;
mod cli;
mod commands;
mod config;
mod constants;
mod errors;
mod helpers;
mod ui;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::app::AppContext;
use crate::cli::{Cli, Commands};
use crate::commands::{generate, identity, misc, passphrase, sign};
use crate::constants::env_vars;
use crate::ui::{print_error, UiContext};

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(&cli) {
        let ui_ctx = UiContext::from_env(false, cli.no_color, cli.ascii);
        let (code, hint) = errors::classify(&e);
        print_error(&ui_ctx, &format!("{:#}", e), hint.as_deref());
        std::process::exit(code);
    }
}

/// Install the stderr log subscriber.
///
/// `SELFSIGN_LOG` takes `EnvFilter` directives; without it only warnings are
/// shown, or debug output with `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(env_vars::LOG).unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    if let Commands::Completions { shell } = &cli.command {
        return misc::handle_completions(*shell);
    }

    let ctx = AppContext::new(cli)?;
    tracing::debug!(config = %ctx.config_path().display(), "loaded configuration");

    match &cli.command {
        Commands::Generate(args) => generate::handle_generate(&ctx, args),
        Commands::Sign(args) => sign::handle_sign(&ctx, args),
        Commands::Check(args) => sign::handle_check(&ctx, args),
        Commands::Inspect(args) => sign::handle_inspect(&ctx, args),
        Commands::Export(args) => identity::handle_export(&ctx, args),
        Commands::Import(args) => identity::handle_import(&ctx, args),
        Commands::Verify(args) => identity::handle_verify(&ctx, args),
        Commands::Passphrase(args) => passphrase::handle_passphrase(&ctx, args),
        Commands::Completions { shell } => misc::handle_completions(*shell),
    }
}
