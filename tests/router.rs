//! Function-call routing integration tests
//!
//! Exercises extraction, alias resolution, dispatch formatting, rule
//! fallback precedence, and the never-panics contract — all without network
//! access (mock dispatchers, or the offline calculate tool).

use std::sync::Arc;

use vox_gateway::{Router, ToolSet};

mod common;
use common::{EchoDispatch, FailingDispatch, echo_router};

/// Router over the real tool set; only calculate is exercised (offline)
fn real_router() -> Router {
    Router::new(Arc::new(ToolSet::new("Toronto, ON".to_string())))
}

#[tokio::test]
async fn bare_json_payload_dispatches() {
    let reply = echo_router()
        .route(
            r#"{"function":"calculate","arguments":{"expression":"2+2"}}"#,
            "",
        )
        .await
        .unwrap();
    assert_eq!(reply, "calculate:2+2");
}

#[tokio::test]
async fn prose_wrapped_payload_dispatches() {
    let reply = echo_router()
        .route(
            r#"Here's the call: {"function":"calculate","arguments":{"expression":"2+2"}} thanks"#,
            "",
        )
        .await
        .unwrap();
    assert_eq!(reply, "calculate:2+2");
}

#[tokio::test]
async fn fenced_payload_dispatches() {
    let output = "Let me check that.\n```json\n{\"function\":\"get_weather\",\"arguments\":{\"location\":\"Oslo\"}}\n```";
    let reply = echo_router().route(output, "").await.unwrap();
    assert_eq!(reply, "get_weather:Oslo");
}

#[tokio::test]
async fn alias_dispatches_identically() {
    let router = echo_router();
    let canonical = router
        .route(
            r#"{"function":"search_arxiv","arguments":{"query":"quantum error correction"}}"#,
            "",
        )
        .await
        .unwrap();
    let aliased = router
        .route(
            r#"{"function":"recent_papers","arguments":{"query":"quantum error correction"}}"#,
            "",
        )
        .await
        .unwrap();
    assert_eq!(canonical, aliased);
    assert_eq!(canonical, "search_arxiv:quantum error correction");
}

#[tokio::test]
async fn unknown_function_exact_error() {
    let reply = echo_router()
        .route(r#"{"function":"X","arguments":{}}"#, "")
        .await
        .unwrap();
    assert_eq!(reply, "Error: Unknown function 'X'");
}

#[tokio::test]
async fn tool_failure_formats_with_name() {
    let router = Router::new(Arc::new(FailingDispatch("timeout")));
    let reply = router
        .route(r#"{"function":"get_weather","arguments":{"location":"Oslo"}}"#, "")
        .await
        .unwrap();
    assert_eq!(reply, "Error from get_weather: timeout");
}

#[tokio::test]
async fn missing_argument_defaults_to_empty() {
    let reply = echo_router()
        .route(r#"{"function":"get_weather"}"#, "")
        .await
        .unwrap();
    assert_eq!(reply, "get_weather:");
}

#[tokio::test]
async fn math_rule_beats_weather_keyword() {
    let reply = echo_router()
        .route("plain text reply", "what is five plus three weather")
        .await
        .unwrap();
    assert_eq!(reply, "calculate:5+3");
}

#[tokio::test]
async fn weather_rule_extracts_location() {
    let reply = echo_router()
        .route("plain text reply", "what's the weather in Toronto today?")
        .await
        .unwrap();
    assert_eq!(reply, "get_weather:toronto");
}

#[tokio::test]
async fn literature_rule_passes_full_utterance() {
    let reply = echo_router()
        .route("plain text reply", "any recent papers on speculative decoding?")
        .await
        .unwrap();
    assert_eq!(
        reply,
        "search_arxiv:any recent papers on speculative decoding?"
    );
}

#[tokio::test]
async fn no_match_returns_none() {
    assert!(
        echo_router()
            .route("Happy to help!", "thank you, that's all")
            .await
            .is_none()
    );
}

#[tokio::test]
async fn calculate_end_to_end() {
    let router = real_router();

    let reply = router
        .route(
            r#"{"function":"calculate","arguments":{"expression":"2+2"}}"#,
            "",
        )
        .await
        .unwrap();
    assert_eq!(reply, "4");

    let reply = router.route("", "what is five plus three").await.unwrap();
    assert_eq!(reply, "8");

    let reply = router.route("", "10 to the power of 2").await.unwrap();
    assert_eq!(reply, "100");
}

#[tokio::test]
async fn calculate_formatting_through_router() {
    let router = real_router();

    let third = router
        .route(r#"{"function":"calculate","arguments":{"expression":"1/3"}}"#, "")
        .await
        .unwrap();
    assert_eq!(third, "0.33");

    let whole = router
        .route(r#"{"function":"calculate","arguments":{"expression":"4/2"}}"#, "")
        .await
        .unwrap();
    assert_eq!(whole, "2");

    let zero = router
        .route(r#"{"function":"calculate","arguments":{"expression":"0/-1"}}"#, "")
        .await
        .unwrap();
    assert_ne!(zero, "-0.00");
}

#[tokio::test]
async fn invalid_expression_is_reported_not_raised() {
    let router = real_router();
    let reply = router
        .route(r#"{"function":"calculate","arguments":{"expression":"))(("}}"#, "")
        .await
        .unwrap();
    assert!(reply.starts_with("Error from calculate:"));
}

/// Tiny deterministic generator so the fuzz pass needs no extra dependency
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self.0.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1_442_695_040_888_963_407);
        self.0
    }

    fn bytes(&mut self, len: usize) -> Vec<u8> {
        (0..len).map(|_| (self.next() >> 33) as u8).collect()
    }
}

#[tokio::test]
async fn router_never_panics_on_random_input() {
    let router = Router::new(Arc::new(EchoDispatch));
    let mut rng = Lcg(0x5eed);

    for i in 0..200 {
        let raw = rng.bytes(i % 64 + 1);
        let output = String::from_utf8_lossy(&raw).into_owned();
        let utterance = String::from_utf8_lossy(&rng.bytes(i % 48 + 1)).into_owned();
        let _ = router.route(&output, &utterance).await;
    }

    // Adversarial fragments around the extraction grammar
    for nasty in [
        "{\"function\"",
        "{\"function\":",
        "{\"function\":}",
        "```json\n{\"function\":\"calculate\"",
        "{{{{{{{{",
        "}}}}}}}}",
        "```````````",
        "{\"function\":\"calculate\",\"arguments\":{\"expression\":\"2+2\"}",
    ] {
        let _ = router.route(nasty, nasty).await;
    }
}
