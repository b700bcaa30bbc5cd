//! Application context for the SelfSign CLI.
//!
//! Bundles CLI arguments with the loaded config and owns the password
//! retry policy shared by every command that unlocks a container.

use std::path::PathBuf;

use secrecy::{ExposeSecret, SecretString};
use selfsign_core::SelfSignError;

use crate::cli::Cli;
use crate::config::{load_config, resolve_config_path, SelfSignConfig};
use crate::constants::{env_vars, MAX_PASSWORD_ATTEMPTS};
use crate::errors::CliError;
use crate::helpers::prompt_unlock_secret;
use crate::ui::UiContext;

/// Application context that bundles CLI args with configuration.
pub struct AppContext<'a> {
    cli: &'a Cli,
    config: SelfSignConfig,
    config_path: PathBuf,
}

impl<'a> AppContext<'a> {
    /// Create a new application context, loading the config file.
    pub fn new(cli: &'a Cli) -> anyhow::Result<Self> {
        let config_path = resolve_config_path(cli.config.as_deref())?;
        let config = load_config(&config_path)?;
        Ok(Self {
            cli,
            config,
            config_path,
        })
    }

    /// Check if quiet mode is enabled.
    pub fn quiet(&self) -> bool {
        self.cli.quiet
    }

    pub fn config(&self) -> &SelfSignConfig {
        &self.config
    }

    pub fn config_path(&self) -> &PathBuf {
        &self.config_path
    }

    /// Build the UI context for a command.
    pub fn ui_context(&self, json: bool) -> UiContext {
        UiContext::from_env(json, self.cli.no_color, self.cli.ascii)
    }

    /// Whether prompts may be shown.
    pub fn interactive(&self, ui: &UiContext, no_input: bool) -> bool {
        !no_input && ui.is_interactive()
    }
}

/// Run `op` with a container secret, re-prompting on `InvalidPassword`.
///
/// Interactive sessions get [`MAX_PASSWORD_ATTEMPTS`] tries, and a secret
/// from the environment is only used for the first of them. Otherwise the
/// secret comes from the environment and a single failure is final. Every
/// other error is returned immediately.
pub fn unlock_with_retry<T>(
    interactive: bool,
    mut op: impl FnMut(&str) -> selfsign_core::Result<T>,
) -> anyhow::Result<T> {
    let test_attempts = test_password_attempts(interactive);
    let max_attempts: u32 = if interactive || test_attempts.is_some() {
        MAX_PASSWORD_ATTEMPTS
    } else {
        1
    };
    let mut attempts: u32 = 0;

    loop {
        attempts += 1;
        let secret = match test_attempts.as_ref() {
            Some(values) => values
                .get((attempts - 1) as usize)
                .cloned()
                .map(SecretString::from)
                .ok_or_else(|| anyhow::anyhow!("No password attempts remaining"))?,
            None => prompt_unlock_secret(interactive, attempts)?,
        };

        match op(secret.expose_secret()) {
            Ok(value) => return Ok(value),
            Err(SelfSignError::InvalidPassword) => {
                tracing::debug!(attempts, "container rejected password");
                let remaining = max_attempts.saturating_sub(attempts);
                if remaining == 0 {
                    let message = if max_attempts > 1 {
                        "Too many failed password attempts."
                    } else {
                        "Incorrect password."
                    };
                    return Err(CliError::auth_failed_with_hint(
                        message,
                        "Hint: Brainwallet containers are unlocked with the passphrase itself. \
                         A forgotten random-file password cannot be recovered.",
                    )
                    .into());
                }
                eprintln!(
                    "Incorrect password. {} attempt{} remaining.",
                    remaining,
                    if remaining == 1 { "" } else { "s" }
                );
            }
            Err(err) => return Err(err.into()),
        }
    }
}

fn test_password_attempts(interactive: bool) -> Option<Vec<String>> {
    if interactive || !cfg!(feature = "test-support") {
        return None;
    }
    std::env::var(env_vars::TEST_PASSWORD_ATTEMPTS)
        .ok()
        .map(|value| {
            value
                .split(',')
                .map(|item| item.trim().to_string())
                .filter(|item| !item.is_empty())
                .collect::<Vec<String>>()
        })
}
