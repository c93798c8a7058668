//! TOML configuration file loading
//!
//! Supports `~/.config/vox/config.toml` as a persistent config source.
//! All fields are optional — the file is a partial overlay on top of
//! defaults.

use std::path::PathBuf;

use serde::Deserialize;

/// Top-level TOML configuration file schema
#[derive(Debug, Default, Deserialize)]
pub struct VoxConfigFile {
    /// LLM configuration
    #[serde(default)]
    pub llm: LlmFileConfig,

    /// Voice (STT/TTS) configuration
    #[serde(default)]
    pub voice: VoiceFileConfig,

    /// Tool configuration
    #[serde(default)]
    pub tools: ToolsFileConfig,

    /// API keys for external services
    #[serde(default)]
    pub api_keys: ApiKeysFileConfig,
}

/// LLM-related configuration
#[derive(Debug, Default, Deserialize)]
pub struct LlmFileConfig {
    /// OpenAI-compatible base URL (e.g. `https://api.openai.com/v1`)
    pub base_url: Option<String>,

    /// Model identifier (e.g. "gpt-4o-mini")
    pub model: Option<String>,

    /// Max tokens per completion
    pub max_tokens: Option<u32>,

    /// Sampling temperature for the first (stable) pass
    pub temperature: Option<f64>,

    /// Conversation turns included in each prompt
    pub history_window: Option<usize>,
}

/// Voice processing configuration
#[derive(Debug, Default, Deserialize)]
pub struct VoiceFileConfig {
    /// STT model (e.g. "whisper-1")
    pub stt_model: Option<String>,

    /// TTS model (e.g. "tts-1")
    pub tts_model: Option<String>,

    /// TTS voice identifier (e.g. "alloy")
    pub tts_voice: Option<String>,

    /// TTS speed multiplier
    pub tts_speed: Option<f64>,
}

/// Tool configuration
#[derive(Debug, Default, Deserialize)]
pub struct ToolsFileConfig {
    /// Fallback location for weather calls without one
    pub default_location: Option<String>,
}

/// API keys configuration
#[derive(Debug, Default, Deserialize)]
pub struct ApiKeysFileConfig {
    /// `OpenAI` key (Whisper, TTS, and the default LLM endpoint)
    pub openai: Option<String>,

    /// Separate key for a non-OpenAI LLM endpoint
    pub llm: Option<String>,
}

/// Load the TOML config file from the standard path
///
/// Returns `VoxConfigFile::default()` if the file doesn't exist or can't be
/// parsed.
#[must_use]
pub fn load_config_file() -> VoxConfigFile {
    let Some(path) = config_file_path() else {
        return VoxConfigFile::default();
    };

    if !path.exists() {
        return VoxConfigFile::default();
    }

    match std::fs::read_to_string(&path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "loaded config file");
                config
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to parse config file, using defaults"
                );
                VoxConfigFile::default()
            }
        },
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to read config file"
            );
            VoxConfigFile::default()
        }
    }
}

/// Return the config file path: `~/.config/vox/config.toml`
#[must_use]
pub fn config_file_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.config_dir().join("vox").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_parses() {
        let file: VoxConfigFile = toml::from_str(
            r#"
            [llm]
            model = "gpt-4o"

            [tools]
            default_location = "Oslo"
            "#,
        )
        .unwrap();

        assert_eq!(file.llm.model.as_deref(), Some("gpt-4o"));
        assert!(file.llm.base_url.is_none());
        assert_eq!(file.tools.default_location.as_deref(), Some("Oslo"));
        assert!(file.voice.stt_model.is_none());
    }

    #[test]
    fn empty_file_parses_to_defaults() {
        let file: VoxConfigFile = toml::from_str("").unwrap();
        assert!(file.llm.model.is_none());
        assert!(file.api_keys.openai.is_none());
    }
}
