use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use selfsign_core::crypto::{DEFAULT_KEY_BITS, DEFAULT_PASSPHRASE_WORDS, MIN_PASSPHRASE_LENGTH};
use selfsign_core::EngineConfig;

use crate::constants::env_vars;

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SelfSignConfig {
    pub keys: KeysSection,
    pub passphrase: PassphraseSection,
    pub output: OutputSection,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct KeysSection {
    pub bits: usize,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PassphraseSection {
    pub words: usize,
    pub min_length: usize,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSection {
    pub dir: Option<String>,
}

impl Default for KeysSection {
    fn default() -> Self {
        Self {
            bits: DEFAULT_KEY_BITS,
        }
    }
}

impl Default for PassphraseSection {
    fn default() -> Self {
        Self {
            words: DEFAULT_PASSPHRASE_WORDS,
            min_length: MIN_PASSPHRASE_LENGTH,
        }
    }
}

impl SelfSignConfig {
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            key_bits: self.keys.bits,
        }
    }

    /// Directory for written files; the current directory when unset.
    pub fn output_dir(&self) -> PathBuf {
        self.output
            .dir
            .as_deref()
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Resolve the config path: explicit flag, then `SELFSIGN_CONFIG`, then XDG.
pub fn resolve_config_path(flag: Option<&str>) -> anyhow::Result<PathBuf> {
    if let Some(path) = flag.filter(|p| !p.trim().is_empty()) {
        return Ok(PathBuf::from(path));
    }
    if let Ok(value) = std::env::var(env_vars::CONFIG) {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value));
        }
    }
    default_config_path()
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_config_dir()?.join("config.toml"))
}

/// Load the config at `path`, falling back to defaults when it does not exist.
pub fn load_config(path: &Path) -> anyhow::Result<SelfSignConfig> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(SelfSignConfig::default());
    }
    read_config(path)
}

pub fn read_config(path: &Path) -> anyhow::Result<SelfSignConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
    toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {}", path.display(), e))
}

pub fn xdg_config_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_CONFIG_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("selfsign"));
        }
    }
    Ok(home_dir()?.join(".config").join("selfsign"))
}

fn home_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|_| anyhow::anyhow!("HOME is not set; cannot resolve default paths"))?;
    Ok(PathBuf::from(home))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SelfSignConfig::default();
        assert_eq!(config.keys.bits, 2048);
        assert_eq!(config.passphrase.words, 10);
        assert_eq!(config.passphrase.min_length, 8);
        assert_eq!(config.output_dir(), PathBuf::from("."));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: SelfSignConfig = toml::from_str("[keys]\nbits = 3072\n").unwrap();
        assert_eq!(config.engine_config().key_bits, 3072);
        assert_eq!(config.passphrase.words, 10);
    }

    #[test]
    fn test_full_file() {
        let config: SelfSignConfig = toml::from_str(
            "[keys]\nbits = 4096\n\n[passphrase]\nwords = 12\nmin_length = 12\n\n[output]\ndir = \"/tmp/ids\"\n",
        )
        .unwrap();
        assert_eq!(config.keys.bits, 4096);
        assert_eq!(config.passphrase.words, 12);
        assert_eq!(config.passphrase.min_length, 12);
        assert_eq!(config.output_dir(), PathBuf::from("/tmp/ids"));
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.keys.bits, 2048);
    }

    #[test]
    fn test_bad_file_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[keys\nbits = ").unwrap();

        let err = load_config(&path).unwrap_err().to_string();
        assert!(err.contains("config.toml"));
    }

    #[test]
    fn test_explicit_path_wins() {
        let path = resolve_config_path(Some("/etc/selfsign.toml")).unwrap();
        assert_eq!(path, PathBuf::from("/etc/selfsign.toml"));
    }
}
