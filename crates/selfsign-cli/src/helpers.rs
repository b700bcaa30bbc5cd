//! Input and file helper functions for the CLI.

use std::path::{Path, PathBuf};

use dialoguer::{Input, Password};
use secrecy::SecretString;

use selfsign_core::crypto::validate_passphrase;

use crate::constants::env_vars;
use crate::errors::CliError;

/// Read a non-blank secret from an environment variable.
pub fn secret_from_env(var: &str) -> Option<SecretString> {
    std::env::var(var)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(SecretString::from)
}

/// Prompt for a container password, or read it from the environment.
///
/// `SELFSIGN_PASSWORD` is tried first, then `SELFSIGN_PASSPHRASE` since
/// brainwallet containers are protected by the passphrase itself. The
/// environment only supplies the first attempt; later attempts prompt.
pub fn prompt_unlock_secret(interactive: bool, attempt: u32) -> anyhow::Result<SecretString> {
    if attempt <= 1 {
        if let Some(secret) =
            secret_from_env(env_vars::PASSWORD).or_else(|| secret_from_env(env_vars::PASSPHRASE))
        {
            return Ok(secret);
        }
    }
    if !interactive {
        return Err(CliError::invalid_input(format!(
            "No password provided and no TTY available. Set {}.",
            env_vars::PASSWORD
        ))
        .into());
    }
    Password::new()
        .with_prompt("Container password")
        .interact()
        .map(SecretString::from)
        .map_err(|e| anyhow::anyhow!("Failed to read password: {}", e))
}

/// Prompt for a new secret with confirmation, or read it from `env_var`.
///
/// The secret must satisfy the passphrase policy.
pub fn prompt_new_secret(
    env_var: &str,
    label: &str,
    interactive: bool,
    min_length: usize,
) -> anyhow::Result<SecretString> {
    let value = match std::env::var(env_var).ok().filter(|v| !v.trim().is_empty()) {
        Some(value) => value,
        None if interactive => Password::new()
            .with_prompt(format!("Enter {}", label))
            .with_confirmation(format!("Confirm {}", label), format!("{}s do not match", capitalize(label)))
            .interact()
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", label, e))?,
        None => {
            return Err(CliError::invalid_input(format!(
                "No {} provided and no TTY available. Set {}.",
                label, env_var
            ))
            .into())
        }
    };

    validate_passphrase(&value, min_length).map_err(|e| CliError::invalid_input(e.to_string()))?;
    Ok(SecretString::from(value))
}

/// Prompt for an optional free-text value (empty input means none).
pub fn prompt_optional(label: &str) -> anyhow::Result<Option<String>> {
    let value: String = Input::<String>::new()
        .with_prompt(label)
        .allow_empty(true)
        .interact_text()
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", label, e))?;
    Ok(non_empty(Some(value)))
}

/// Trim a value and drop it if blank.
pub fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Resolve an `@FILE` argument to the file's contents; other values are literal.
pub fn read_arg_or_file(value: &str) -> anyhow::Result<String> {
    match value.strip_prefix('@') {
        Some(path) => read_text_file(Path::new(path), "file"),
        None => Ok(value.to_string()),
    }
}

/// Read a text file, reporting a missing file as not found.
pub fn read_text_file(path: &Path, what: &str) -> anyhow::Result<String> {
    if !path.exists() {
        return Err(CliError::not_found(
            format!("No {} found at {}", what, path.display()),
            "Hint: Check the path, or run `selfsign generate` to create an identity.",
        )
        .into());
    }
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read {} {}: {}", what, path.display(), e))
}

/// Write a file, refusing to overwrite unless `force` is set.
pub fn write_new_file(path: &Path, contents: &str, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        return Err(CliError::invalid_input(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        ))
        .into());
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            anyhow::anyhow!("Failed to create directory {}: {}", parent.display(), e)
        })?;
    }
    std::fs::write(path, contents)
        .map_err(|e| anyhow::anyhow!("Failed to write {}: {}", path.display(), e))?;
    restrict_permissions(path)
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> anyhow::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
        .map_err(|e| anyhow::anyhow!("Failed to set permissions on {}: {}", path.display(), e))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> anyhow::Result<()> {
    Ok(())
}

/// File name stem for an alias: alphanumerics, `-` and `_` only.
pub fn file_stem_for(alias: &str) -> String {
    let stem: String = alias
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    let stem = stem.trim_matches('_').to_lowercase();
    if stem.is_empty() {
        "identity".to_string()
    } else {
        stem
    }
}

/// Default container path inside `dir` for `alias`.
pub fn default_container_path(dir: &Path, alias: &str, extension: &str) -> PathBuf {
    dir.join(format!("{}.{}", file_stem_for(alias), extension))
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
