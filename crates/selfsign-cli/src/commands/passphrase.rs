//! Passphrase command handler.

use selfsign_core::crypto::generate_passphrase;
use zeroize::Zeroizing;

use crate::app::AppContext;
use crate::cli::PassphraseArgs;
use crate::errors::CliError;

pub fn handle_passphrase(ctx: &AppContext, args: &PassphraseArgs) -> anyhow::Result<()> {
    let words = args.words.unwrap_or(ctx.config().passphrase.words);
    let passphrase = Zeroizing::new(
        generate_passphrase(words).map_err(|e| CliError::invalid_input(e.to_string()))?,
    );
    println!("{}", passphrase.as_str());
    Ok(())
}
