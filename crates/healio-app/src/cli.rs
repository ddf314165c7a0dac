//! CLI argument definitions for the Healio terminal client.
//!
//! Uses `clap` with derive macros for ergonomic argument parsing.
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::Parser;
use healio_core::config::{HealioConfig, API_KEY_ENV};
use std::path::PathBuf;

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "HEALIO_CONFIG";

/// Healio: a mental-health support chat in your terminal.
#[derive(Parser, Debug)]
#[command(name = "healio", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// API key for the inference endpoint (prefer HEALIO_API_KEY).
    #[arg(long = "api-key")]
    pub api_key: Option<String>,

    /// Model name, e.g. gemini-1.5-flash-latest.
    #[arg(short = 'm', long = "model")]
    pub model: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,

    /// Remove saved chats without asking for confirmation.
    #[arg(long = "no-confirm")]
    pub no_confirm: bool,

    /// Never read replies aloud.
    #[arg(long = "mute")]
    pub mute: bool,
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > HEALIO_CONFIG env var > platform default (~/.healio/config.toml).
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var(CONFIG_ENV) {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Apply CLI and environment overrides to a loaded configuration.
    pub fn apply_overrides(&self, config: &mut HealioConfig) {
        let env_key = std::env::var(API_KEY_ENV).ok();
        self.apply_overrides_with_env(config, env_key);
    }

    fn apply_overrides_with_env(&self, config: &mut HealioConfig, env_key: Option<String>) {
        // --api-key > HEALIO_API_KEY > config file
        if let Some(key) = self
            .api_key
            .clone()
            .or(env_key)
            .filter(|k| !k.trim().is_empty())
        {
            config.inference.api_key = key;
        }
        if let Some(ref model) = self.model {
            config.inference.model = model.clone();
        }
        if let Some(ref level) = self.log_level {
            config.general.log_level = level.clone();
        }
        if self.no_confirm {
            config.platform.supports_native_confirm = false;
        }
        if self.mute {
            config.speech.enabled = false;
        }
    }
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".healio").join("config.toml");
    }
    #[cfg(not(target_os = "windows"))]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".healio").join("config.toml");
    }
    PathBuf::from("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliArgs {
        CliArgs::parse_from(std::iter::once("healio").chain(args.iter().copied()))
    }

    fn config_with_key(key: &str) -> HealioConfig {
        let mut config = HealioConfig::default();
        config.inference.api_key = key.to_string();
        config
    }

    #[test]
    fn test_cli_key_beats_env_and_file() {
        let args = parse(&["--api-key", "from-cli"]);
        let mut config = config_with_key("from-file");
        args.apply_overrides_with_env(&mut config, Some("from-env".to_string()));
        assert_eq!(config.inference.api_key, "from-cli");
    }

    #[test]
    fn test_env_key_beats_file() {
        let args = parse(&[]);
        let mut config = config_with_key("from-file");
        args.apply_overrides_with_env(&mut config, Some("from-env".to_string()));
        assert_eq!(config.inference.api_key, "from-env");
    }

    #[test]
    fn test_file_key_kept_without_overrides() {
        let args = parse(&[]);
        let mut config = config_with_key("from-file");
        args.apply_overrides_with_env(&mut config, None);
        assert_eq!(config.inference.api_key, "from-file");
    }

    #[test]
    fn test_blank_env_key_ignored() {
        let args = parse(&[]);
        let mut config = config_with_key("from-file");
        args.apply_overrides_with_env(&mut config, Some("  ".to_string()));
        assert_eq!(config.inference.api_key, "from-file");
    }

    #[test]
    fn test_flags_override_config() {
        let args = parse(&[
            "--no-confirm",
            "--mute",
            "--model",
            "gemini-test",
            "--log-level",
            "debug",
        ]);
        let mut config = HealioConfig::default();
        args.apply_overrides_with_env(&mut config, None);

        assert!(!config.platform.supports_native_confirm);
        assert!(!config.speech.enabled);
        assert_eq!(config.inference.model, "gemini-test");
        assert_eq!(config.general.log_level, "debug");
    }

    #[test]
    fn test_explicit_config_path_wins() {
        let args = parse(&["--config", "/tmp/healio-test.toml"]);
        assert_eq!(
            args.resolve_config_path(),
            PathBuf::from("/tmp/healio-test.toml")
        );
    }
}
