//! Configuration management for the vox gateway

pub mod file;

use file::VoxConfigFile;

/// Gateway configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Voice (STT/TTS) configuration
    pub voice: VoiceConfig,

    /// LLM configuration
    pub llm: LlmConfig,

    /// Tool configuration
    pub tools: ToolsConfig,

    /// API keys
    pub api_keys: ApiKeys,
}

/// Voice processing configuration
#[derive(Debug, Clone)]
pub struct VoiceConfig {
    /// STT model identifier
    pub stt_model: String,

    /// TTS model identifier
    pub tts_model: String,

    /// TTS voice identifier
    pub tts_voice: String,

    /// TTS speed multiplier
    pub tts_speed: f64,
}

/// LLM configuration
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// OpenAI-compatible base URL
    pub base_url: String,

    /// Model identifier for chat completions
    pub model: String,

    /// Max tokens per completion
    pub max_tokens: u32,

    /// Sampling temperature for the first (stable) pass
    pub temperature: f64,

    /// Conversation turns included in each prompt
    pub history_window: usize,
}

/// Tool configuration
#[derive(Debug, Clone)]
pub struct ToolsConfig {
    /// Fallback location for weather calls without one
    pub default_location: String,
}

/// API keys for external services
#[derive(Debug, Clone, Default)]
pub struct ApiKeys {
    /// `OpenAI` key (Whisper, TTS, and the default LLM endpoint)
    pub openai: Option<String>,

    /// Separate key for a non-OpenAI LLM endpoint; falls back to `openai`
    pub llm: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            voice: VoiceConfig {
                stt_model: "whisper-1".to_string(),
                tts_model: "tts-1".to_string(),
                tts_voice: "alloy".to_string(),
                tts_speed: 1.0,
            },
            llm: LlmConfig {
                base_url: "https://api.openai.com/v1".to_string(),
                model: "gpt-4o-mini".to_string(),
                max_tokens: 256,
                temperature: 0.2,
                history_window: 4,
            },
            tools: ToolsConfig {
                default_location: "Toronto, ON".to_string(),
            },
            api_keys: ApiKeys::default(),
        }
    }
}

impl Config {
    /// Load configuration: defaults, overlaid by the TOML file, overlaid by
    /// environment variables.
    #[must_use]
    pub fn load() -> Self {
        let mut config = Self::default();
        config.apply_file(file::load_config_file());
        config.apply_env();
        config
    }

    /// Overlay the optional fields of a config file.
    fn apply_file(&mut self, file: VoxConfigFile) {
        if let Some(v) = file.llm.base_url {
            self.llm.base_url = v;
        }
        if let Some(v) = file.llm.model {
            self.llm.model = v;
        }
        if let Some(v) = file.llm.max_tokens {
            self.llm.max_tokens = v;
        }
        if let Some(v) = file.llm.temperature {
            self.llm.temperature = v;
        }
        if let Some(v) = file.llm.history_window {
            self.llm.history_window = v;
        }
        if let Some(v) = file.voice.stt_model {
            self.voice.stt_model = v;
        }
        if let Some(v) = file.voice.tts_model {
            self.voice.tts_model = v;
        }
        if let Some(v) = file.voice.tts_voice {
            self.voice.tts_voice = v;
        }
        if let Some(v) = file.voice.tts_speed {
            self.voice.tts_speed = v;
        }
        if let Some(v) = file.tools.default_location {
            self.tools.default_location = v;
        }
        if file.api_keys.openai.is_some() {
            self.api_keys.openai = file.api_keys.openai;
        }
        if file.api_keys.llm.is_some() {
            self.api_keys.llm = file.api_keys.llm;
        }
    }

    /// Overlay environment variables.
    fn apply_env(&mut self) {
        if let Ok(v) = std::env::var("OPENAI_API_KEY") {
            if !v.is_empty() {
                self.api_keys.openai = Some(v);
            }
        }
        if let Ok(v) = std::env::var("VOX_LLM_API_KEY") {
            if !v.is_empty() {
                self.api_keys.llm = Some(v);
            }
        }
        if let Ok(v) = std::env::var("VOX_LLM_BASE_URL") {
            if !v.is_empty() {
                self.llm.base_url = v;
            }
        }
        if let Ok(v) = std::env::var("VOX_LLM_MODEL") {
            if !v.is_empty() {
                self.llm.model = v;
            }
        }
        if let Ok(v) = std::env::var("VOX_DEFAULT_LOCATION") {
            if !v.is_empty() {
                self.tools.default_location = v;
            }
        }
    }

    /// The key used for the LLM endpoint (dedicated key, else the `OpenAI`
    /// key).
    #[must_use]
    pub fn llm_api_key(&self) -> Option<String> {
        self.api_keys.llm.clone().or_else(|| self.api_keys.openai.clone())
    }
}
