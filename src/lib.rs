//! Vox Gateway - Voice assistant gateway with function-call routing
//!
//! This library provides the core functionality for the vox gateway:
//! - Function-call routing (extraction, alias resolution, dispatch)
//! - Rule-based fallback over the raw user utterance
//! - A closed tool registry (calculate, weather, arXiv search)
//! - Voice processing (STT, TTS) and LLM chat as thin HTTP wrappers
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                   HTTP API (axum)                    │
//! │   /chat  │  /chat/debug  │  /chat/text  │  /tools   │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//!        STT ──► LLM ──► Router ──► TTS
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │                     Router                           │
//! │  CallExtractor │ AliasTable │ Rules │ Normalizer    │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │                     Tools                            │
//! │   calculate  │  get_weather  │  search_arxiv        │
//! └─────────────────────────────────────────────────────┘
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod llm;
pub mod prompt;
pub mod router;
pub mod tools;
pub mod voice;

pub use config::Config;
pub use error::{Error, Result};
pub use llm::{ChatMessage, ConversationHistory, LlmClient};
pub use prompt::build_system_prompt;
pub use router::{
    Router, RuleMatch, ToolCall, contains_operator, extract_call, match_rules,
    normalize_expression,
};
pub use tools::{
    ArxivSearchTool, Calculator, ToolDispatch, ToolName, ToolResult, ToolSet, ToolSpec,
    WeatherTool, resolve_alias, specs_json, tool_specs,
};
pub use voice::{SpeechToText, TextToSpeech};
