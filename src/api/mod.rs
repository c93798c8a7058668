//! HTTP API for the vox gateway
//!
//! One voice request is processed end-to-end sequentially: transcribe →
//! generate → route → synthesize. The transport serves requests
//! concurrently; only the conversation history is shared mutable state, and
//! it sits behind a mutex.

use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use uuid::Uuid;

use crate::config::Config;
use crate::llm::{ConversationHistory, LlmClient};
use crate::prompt::build_system_prompt;
use crate::router::Router;
use crate::tools::{ToolSet, specs_json};
use crate::voice::{SpeechToText, TextToSpeech};

/// Fixed reply when every stage yields empty text
pub const CLARIFICATION_PROMPT: &str = "I didn't catch that. Could you please repeat?";

/// Shared state for API handlers
pub struct ApiState {
    /// Function-call router over the tool set
    pub router: Router,
    /// Speech-to-text backend (absent without an API key)
    pub stt: Option<SpeechToText>,
    /// Text-to-speech backend (absent without an API key)
    pub tts: Option<TextToSpeech>,
    /// Chat completion client (absent → rule-only routing)
    pub llm: Option<LlmClient>,
    /// Bounded conversation window
    pub history: Mutex<ConversationHistory>,
    /// Function-calling system prompt
    pub system_prompt: String,
}

impl ApiState {
    /// Build state from configuration.
    ///
    /// Backends whose keys are missing are left unconfigured rather than
    /// failing startup; their endpoints report 503 instead.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let tools = Arc::new(ToolSet::new(config.tools.default_location.clone()));

        let stt = config.api_keys.openai.clone().and_then(|key| {
            SpeechToText::new(key, config.voice.stt_model.clone()).ok()
        });
        let tts = config.api_keys.openai.clone().and_then(|key| {
            TextToSpeech::new(
                key,
                config.voice.tts_model.clone(),
                config.voice.tts_voice.clone(),
                config.voice.tts_speed,
            )
            .ok()
        });

        // Key-less local endpoints (e.g. Ollama) are allowed; only the
        // default hosted endpoint requires a key to be useful
        let llm_key = config.llm_api_key();
        let llm = if llm_key.is_some() || config.llm.base_url != "https://api.openai.com/v1" {
            Some(LlmClient::new(&config.llm, llm_key))
        } else {
            None
        };

        Self {
            router: Router::new(tools),
            stt,
            tts,
            llm,
            history: Mutex::new(ConversationHistory::new(config.llm.history_window)),
            system_prompt: build_system_prompt(),
        }
    }
}

/// Build the API router
pub fn router(state: Arc<ApiState>) -> axum::Router {
    axum::Router::new()
        .route("/health", get(health))
        .route("/tools", get(tools))
        .route("/chat", post(chat))
        .route("/chat/debug", post(chat_debug))
        .route("/chat/text", post(chat_text))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind and serve until interrupted.
///
/// # Errors
///
/// Returns error if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<ApiState>, port: u16) -> crate::Result<()> {
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "api server listening");

    axum::serve(listener, router(state)).await?;
    Ok(())
}

/// Health check
async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Advertised tool capabilities (same JSON the model sees)
async fn tools() -> Json<serde_json::Value> {
    Json(specs_json())
}

/// One processed exchange
struct Exchange {
    request_text: String,
    llm_raw: String,
    final_text: String,
}

/// Run generate → route → fallback for one utterance.
///
/// Without an LLM the model output is empty, extraction finds nothing, and
/// the rules carry the request — degraded but useful.
async fn run_pipeline(
    state: &ApiState,
    user_text: &str,
    request_id: Uuid,
) -> Result<Exchange, ApiError> {
    let llm_raw = match &state.llm {
        Some(llm) => {
            let messages = state
                .history
                .lock()
                .await
                .messages(&state.system_prompt, user_text);
            llm.generate(&messages)
                .await
                .map_err(|e| ApiError::LlmFailed(e.to_string()))?
        }
        None => String::new(),
    };
    tracing::debug!(request_id = %request_id, llm_raw = %llm_raw, "model output");

    let routed = state.router.route(&llm_raw, user_text).await;
    let mut final_text = routed.unwrap_or_else(|| llm_raw.clone());

    if final_text.trim().is_empty() {
        tracing::debug!(request_id = %request_id, "empty reply after routing, using clarification prompt");
        final_text = CLARIFICATION_PROMPT.to_string();
    }

    if state.llm.is_some() {
        // The raw model reply is recorded, not the routed text
        state.history.lock().await.record(user_text, llm_raw.clone());
    }

    tracing::info!(request_id = %request_id, reply = %final_text, "reply ready");

    Ok(Exchange {
        request_text: user_text.to_string(),
        llm_raw,
        final_text,
    })
}

/// Voice chat: WAV audio in, MP3 audio out
async fn chat(State(state): State<Arc<ApiState>>, body: Bytes) -> Result<Response, ApiError> {
    let stt = state
        .stt
        .as_ref()
        .ok_or(ApiError::NotConfigured("STT not configured (no OpenAI API key)"))?;
    let tts = state
        .tts
        .as_ref()
        .ok_or(ApiError::NotConfigured("TTS not configured (no OpenAI API key)"))?;

    if body.is_empty() {
        return Err(ApiError::BadRequest("Empty audio data"));
    }

    let request_id = Uuid::new_v4();
    let user_text = stt
        .transcribe(&body)
        .await
        .map_err(|e| ApiError::TranscriptionFailed(e.to_string()))?;
    tracing::info!(request_id = %request_id, transcript = %user_text, "transcribed request");

    let exchange = run_pipeline(&state, &user_text, request_id).await?;

    let audio = tts
        .synthesize(&exchange.final_text)
        .await
        .map_err(|e| ApiError::SynthesisFailed(e.to_string()))?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "audio/mpeg")],
        audio,
    )
        .into_response())
}

/// Debug trace response
#[derive(Debug, Serialize)]
pub struct ChatDebugResponse {
    pub request_text: String,
    pub llm_raw: String,
    pub final_text: String,
}

/// Voice chat with a JSON trace instead of audio
async fn chat_debug(
    State(state): State<Arc<ApiState>>,
    body: Bytes,
) -> Result<Json<ChatDebugResponse>, ApiError> {
    let stt = state
        .stt
        .as_ref()
        .ok_or(ApiError::NotConfigured("STT not configured (no OpenAI API key)"))?;

    if body.is_empty() {
        return Err(ApiError::BadRequest("Empty audio data"));
    }

    let request_id = Uuid::new_v4();
    let user_text = stt
        .transcribe(&body)
        .await
        .map_err(|e| ApiError::TranscriptionFailed(e.to_string()))?;

    let exchange = run_pipeline(&state, &user_text, request_id).await?;

    Ok(Json(ChatDebugResponse {
        request_text: exchange.request_text,
        llm_raw: exchange.llm_raw,
        final_text: exchange.final_text,
    }))
}

/// Text chat request
#[derive(Debug, Deserialize)]
pub struct ChatTextRequest {
    pub text: String,
}

/// Text chat response
#[derive(Debug, Serialize)]
pub struct ChatTextResponse {
    pub reply: String,
}

/// Text-only chat: skips STT and TTS entirely
async fn chat_text(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<ChatTextRequest>,
) -> Result<Json<ChatTextResponse>, ApiError> {
    if request.text.trim().is_empty() {
        return Err(ApiError::BadRequest("Empty text"));
    }

    let request_id = Uuid::new_v4();
    let exchange = run_pipeline(&state, request.text.trim(), request_id).await?;

    Ok(Json(ChatTextResponse {
        reply: exchange.final_text,
    }))
}

/// API errors
#[derive(Debug)]
pub enum ApiError {
    NotConfigured(&'static str),
    BadRequest(&'static str),
    TranscriptionFailed(String),
    SynthesisFailed(String),
    LlmFailed(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            error: ErrorBody,
        }

        #[derive(Serialize)]
        struct ErrorBody {
            code: &'static str,
            message: String,
        }

        let (status, code, message) = match self {
            Self::NotConfigured(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, "not_configured", msg.to_string())
            }
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.to_string()),
            Self::TranscriptionFailed(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "transcription_failed",
                msg,
            ),
            Self::SynthesisFailed(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "synthesis_failed", msg)
            }
            Self::LlmFailed(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "llm_failed", msg),
        };

        (
            status,
            Json(ErrorResponse {
                error: ErrorBody { code, message },
            }),
        )
            .into_response()
    }
}
