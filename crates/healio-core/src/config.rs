use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{HealioError, Result};

/// Default Gemini REST base URL (model name and method are appended).
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
/// Default Gemini model.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash-latest";
/// Environment variable that overrides `inference.api_key`.
pub const API_KEY_ENV: &str = "HEALIO_API_KEY";

/// Top-level configuration for the Healio client.
///
/// Loaded once at startup from `~/.healio/config.toml` by default and never
/// mutated afterwards. Each section corresponds to one component.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HealioConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub inference: InferenceConfig,
    #[serde(default)]
    pub speech: SpeechConfig,
    #[serde(default)]
    pub sidebar: SidebarConfig,
    #[serde(default)]
    pub platform: PlatformConfig,
}

impl HealioConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read, parsed, or validated.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: HealioConfig = toml::from_str(&content)?;
        config.validate()?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.sidebar.max_saved_sessions == 0 {
            return Err(HealioError::Config(
                "sidebar.max_saved_sessions must be at least 1".to_string(),
            ));
        }
        if self.inference.model.trim().is_empty() {
            return Err(HealioError::Config(
                "inference.model must not be empty".to_string(),
            ));
        }
        if self.inference.base_url.trim().is_empty() {
            return Err(HealioError::Config(
                "inference.base_url must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Remote inference endpoint settings.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    /// Gemini API key, sent as the `key` query parameter.
    pub api_key: String,
    /// Model name, e.g. `gemini-1.5-flash-latest`.
    pub model: String,
    /// Base URL the model path is appended to.
    pub base_url: String,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

// Hand-written so the key never ends up in logs.
impl std::fmt::Debug for InferenceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InferenceConfig")
            .field(
                "api_key",
                &if self.api_key.is_empty() {
                    "<unset>"
                } else {
                    "<redacted>"
                },
            )
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Text-to-speech settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// Whether speech playback is available at all.
    pub enabled: bool,
    /// Speak every model reply as soon as it arrives.
    pub auto_speak: bool,
    /// TTS executable, e.g. `espeak` or `say`. `None` selects a silent engine.
    pub program: Option<String>,
    /// Extra arguments placed before the utterance text.
    pub args: Vec<String>,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            auto_speak: true,
            program: None,
            args: Vec::new(),
        }
    }
}

/// Saved-chat sidebar settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SidebarConfig {
    /// Width of the open sidebar.
    pub open_width: u32,
    /// Duration of the open/close width transition in milliseconds.
    pub transition_ms: u64,
    /// Number of saved sessions kept, most recent first.
    pub max_saved_sessions: usize,
}

impl Default for SidebarConfig {
    fn default() -> Self {
        Self {
            open_width: 200,
            transition_ms: 300,
            max_saved_sessions: 5,
        }
    }
}

/// Capabilities of the hosting platform, fixed at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformConfig {
    /// Whether destructive actions go through a Cancel/Remove confirmation.
    /// Web builds have no native modal and remove immediately.
    pub supports_native_confirm: bool,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            supports_native_confirm: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = HealioConfig::default();
        assert_eq!(config.general.log_level, "info");
        assert!(config.inference.api_key.is_empty());
        assert_eq!(config.inference.model, "gemini-1.5-flash-latest");
        assert_eq!(config.inference.base_url, DEFAULT_BASE_URL);
        assert!(config.speech.enabled);
        assert!(config.speech.auto_speak);
        assert!(config.speech.program.is_none());
        assert_eq!(config.sidebar.open_width, 200);
        assert_eq!(config.sidebar.transition_ms, 300);
        assert_eq!(config.sidebar.max_saved_sessions, 5);
        assert!(config.platform.supports_native_confirm);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_valid_config() {
        let content = r#"
[general]
log_level = "debug"

[inference]
api_key = "abc123"
model = "gemini-2.0-flash"

[speech]
program = "espeak"
args = ["-s", "150"]
auto_speak = false

[platform]
supports_native_confirm = false
"#;
        let file = create_temp_config(content);
        let config = HealioConfig::load(file.path()).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.inference.api_key, "abc123");
        assert_eq!(config.inference.model, "gemini-2.0-flash");
        assert_eq!(config.inference.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.speech.program.as_deref(), Some("espeak"));
        assert_eq!(config.speech.args, vec!["-s", "150"]);
        assert!(!config.speech.auto_speak);
        assert!(!config.platform.supports_native_confirm);
        // Untouched section keeps its defaults
        assert_eq!(config.sidebar.max_saved_sessions, 5);
    }

    #[test]
    fn test_load_rejects_zero_saved_sessions() {
        let file = create_temp_config("[sidebar]\nmax_saved_sessions = 0\n");
        let err = HealioConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, HealioError::Config(_)));
        assert!(err.to_string().contains("max_saved_sessions"));
    }

    #[test]
    fn test_load_invalid_toml_is_config_error() {
        let file = create_temp_config("[inference\napi_key = ");
        let err = HealioConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, HealioError::Config(_)));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = HealioConfig::load(Path::new("/nonexistent/healio.toml")).unwrap_err();
        assert!(matches!(err, HealioError::Io(_)));
    }

    #[test]
    fn test_inference_debug_redacts_key() {
        let inference = InferenceConfig {
            api_key: "super-secret".to_string(),
            ..InferenceConfig::default()
        };
        let dbg = format!("{:?}", inference);
        assert!(!dbg.contains("super-secret"));
        assert!(dbg.contains("<redacted>"));
    }
}
