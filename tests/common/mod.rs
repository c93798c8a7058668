//! Shared test fixtures

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use vox_gateway::api::ApiState;
use vox_gateway::{Config, Router, ToolDispatch, ToolName, ToolResult};

/// Dispatcher that echoes `tool:argument`, making dispatch decisions
/// observable without any network
pub struct EchoDispatch;

#[async_trait]
impl ToolDispatch for EchoDispatch {
    async fn execute(&self, tool: ToolName, argument: &str) -> ToolResult {
        ToolResult::success(format!("{tool}:{argument}"))
    }
}

/// Dispatcher whose every tool reports failure with a fixed message
pub struct FailingDispatch(pub &'static str);

#[async_trait]
impl ToolDispatch for FailingDispatch {
    async fn execute(&self, _tool: ToolName, _argument: &str) -> ToolResult {
        ToolResult::failure(self.0)
    }
}

/// Router over the echo dispatcher
pub fn echo_router() -> Router {
    Router::new(Arc::new(EchoDispatch))
}

/// API state with no STT/TTS/LLM configured.
///
/// Uses in-code defaults only (no config file, no env), so voice endpoints
/// report 503 and `/chat/text` exercises rule-only routing. The calculate
/// tool works fully offline.
pub fn offline_state() -> Arc<ApiState> {
    Arc::new(ApiState::from_config(&Config::default()))
}
