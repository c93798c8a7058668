//! Function-call routing
//!
//! The router decides whether a model's free-text output is a structured
//! tool invocation or a natural-language reply. Extracted calls are
//! alias-normalized and dispatched through the tool registry; when nothing
//! parses, keyword/regex rules over the original user utterance get a
//! chance. By contract the router never panics — every failure mode becomes
//! reply text.

pub mod extract;
pub mod normalize;
pub mod rules;

pub use extract::{ToolCall, extract_call};
pub use normalize::{contains_operator, normalize_expression};
pub use rules::{RuleMatch, match_rules};

use std::sync::Arc;

use futures::FutureExt;

use crate::tools::{ToolDispatch, ToolName, resolve_alias};

/// Routes model output and user utterances to tools.
pub struct Router {
    tools: Arc<dyn ToolDispatch>,
}

impl Router {
    /// Create a router over a tool dispatcher.
    #[must_use]
    pub fn new(tools: Arc<dyn ToolDispatch>) -> Self {
        Self { tools }
    }

    /// Produce the final reply for a model output / user utterance pair.
    ///
    /// `None` means no tool matched anywhere; the caller falls back to the
    /// raw model text.
    pub async fn route(&self, llm_output: &str, utterance: &str) -> Option<String> {
        if let Some(reply) = self.try_function_call(llm_output).await {
            return Some(reply);
        }
        self.route_by_rules(utterance).await
    }

    /// Dispatch a structured tool call embedded in the model output, if any.
    ///
    /// Once a call is extracted this always returns a reply (possibly an
    /// error string) — it never falls through to rule-based routing.
    pub async fn try_function_call(&self, llm_output: &str) -> Option<String> {
        let call = extract_call(llm_output)?;

        let name = resolve_alias(&call.name);
        let Some(tool) = ToolName::parse(name) else {
            tracing::debug!(function = %name, "unknown function in tool call");
            return Some(format!("Error: Unknown function '{name}'"));
        };

        tracing::debug!(tool = %tool, "dispatching extracted tool call");
        let argument = call.argument(tool.argument_key());
        Some(self.run(tool, &argument).await)
    }

    /// Rule-based fallback over the original user utterance.
    pub async fn route_by_rules(&self, utterance: &str) -> Option<String> {
        let (tool, argument) = match match_rules(utterance)? {
            RuleMatch::Calculate(expression) => (ToolName::Calculate, expression),
            RuleMatch::Weather(location) => (ToolName::GetWeather, location),
            RuleMatch::Arxiv(query) => (ToolName::SearchArxiv, query),
        };

        tracing::debug!(tool = %tool, "rule-based fallback matched");
        Some(self.run(tool, &argument).await)
    }

    /// Execute one tool and render its result as reply text.
    ///
    /// Tools report failures through `ToolResult` by contract; the
    /// catch-unwind here is a last-resort net so a panicking tool body still
    /// becomes a reply string instead of tearing down the request.
    async fn run(&self, tool: ToolName, argument: &str) -> String {
        let execution = std::panic::AssertUnwindSafe(self.tools.execute(tool, argument));

        match execution.catch_unwind().await {
            Ok(result) if result.ok => result.content,
            Ok(result) => format!("Error from {tool}: {}", result.content),
            Err(panic) => {
                let details = panic_message(panic.as_ref());
                tracing::error!(tool = %tool, details = %details, "tool dispatch panicked");
                format!("Error: Could not process function call. Details: {details}")
            }
        }
    }
}

/// Best-effort message out of a panic payload
fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::ToolResult;
    use async_trait::async_trait;

    /// Echoes tool + argument so dispatch decisions are observable
    struct EchoTools;

    #[async_trait]
    impl ToolDispatch for EchoTools {
        async fn execute(&self, tool: ToolName, argument: &str) -> ToolResult {
            ToolResult::success(format!("{tool}:{argument}"))
        }
    }

    /// Always reports failure with a fixed message
    struct TimeoutTools;

    #[async_trait]
    impl ToolDispatch for TimeoutTools {
        async fn execute(&self, _tool: ToolName, _argument: &str) -> ToolResult {
            ToolResult::failure("timeout")
        }
    }

    /// Violates the no-panic contract, to exercise the safety net
    struct PanickyTools;

    #[async_trait]
    impl ToolDispatch for PanickyTools {
        async fn execute(&self, _tool: ToolName, _argument: &str) -> ToolResult {
            panic!("boom");
        }
    }

    fn router(tools: impl ToolDispatch + 'static) -> Router {
        Router::new(Arc::new(tools))
    }

    #[tokio::test]
    async fn extracted_call_dispatches() {
        let r = router(EchoTools);
        let reply = r
            .route(
                r#"{"function":"calculate","arguments":{"expression":"2+2"}}"#,
                "irrelevant",
            )
            .await
            .unwrap();
        assert_eq!(reply, "calculate:2+2");
    }

    #[tokio::test]
    async fn alias_resolves_before_dispatch() {
        let r = router(EchoTools);
        let direct = r
            .route(r#"{"function":"search_arxiv","arguments":{"query":"q"}}"#, "")
            .await
            .unwrap();
        let aliased = r
            .route(r#"{"function":"recent_papers","arguments":{"query":"q"}}"#, "")
            .await
            .unwrap();
        assert_eq!(direct, aliased);
    }

    #[tokio::test]
    async fn unknown_function_is_reported() {
        let r = router(EchoTools);
        let reply = r
            .route(r#"{"function":"telepathy","arguments":{}}"#, "")
            .await
            .unwrap();
        assert_eq!(reply, "Error: Unknown function 'telepathy'");
    }

    #[tokio::test]
    async fn tool_failure_formats_with_tool_name() {
        let r = router(TimeoutTools);
        let reply = r.route(r#"{"function":"get_weather"}"#, "").await.unwrap();
        assert_eq!(reply, "Error from get_weather: timeout");
    }

    #[tokio::test]
    async fn extracted_call_never_falls_through_to_rules() {
        // An error reply from dispatch must not be replaced by a rule match
        let r = router(TimeoutTools);
        let reply = r
            .route(r#"{"function":"get_weather"}"#, "what is 2 plus 2")
            .await
            .unwrap();
        assert_eq!(reply, "Error from get_weather: timeout");
    }

    #[tokio::test]
    async fn panic_becomes_reply_text() {
        let r = router(PanickyTools);
        let reply = r.route(r#"{"function":"calculate"}"#, "").await.unwrap();
        assert_eq!(
            reply,
            "Error: Could not process function call. Details: boom"
        );
    }

    #[tokio::test]
    async fn rules_route_the_utterance_not_the_model_output() {
        let r = router(EchoTools);
        let reply = r
            .route("I can't help with that.", "what is five plus three")
            .await
            .unwrap();
        assert_eq!(reply, "calculate:5+3");
    }

    #[tokio::test]
    async fn no_call_no_rules_is_none() {
        let r = router(EchoTools);
        assert!(r.route("Nice talking to you!", "thanks, goodbye").await.is_none());
    }
}
