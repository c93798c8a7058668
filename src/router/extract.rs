//! Tool-call extraction from raw model output
//!
//! A model reply may be pure JSON, JSON wrapped in prose, JSON inside a
//! fenced code block, or no JSON at all. Extraction tries each shape in
//! strict priority order and never fails — "no call found" is the normal
//! outcome for plain-language replies.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

/// Fenced code block, optionally tagged `json`, holding a JSON object
static FENCED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?si)```(?:json)?\s*(\{.*?\})\s*```").expect("valid regex"));

/// Literal opener the brace-matching scan looks for
const CALL_OPENER: &str = r#"{"function""#;

/// A parsed invocation request.
///
/// Only ever constructed from text that parses as a JSON object with a
/// `function` field; `name` is the pre-alias-resolution tool name.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCall {
    /// Requested tool name, as the model wrote it
    pub name: String,
    /// String-keyed arguments; empty when the payload omits them
    pub arguments: serde_json::Map<String, Value>,
}

impl ToolCall {
    /// Fetch an argument as a string.
    ///
    /// Missing or null arguments default to the empty string; non-string
    /// values render as their JSON text.
    #[must_use]
    pub fn argument(&self, key: &str) -> String {
        match self.arguments.get(key) {
            Some(Value::String(s)) => s.clone(),
            None | Some(Value::Null) => String::new(),
            Some(other) => other.to_string(),
        }
    }
}

/// Scan a raw model reply for an embedded tool call.
///
/// Strategies, first success wins:
/// 1. parse the whole trimmed string as one JSON object
/// 2. parse each triple-backtick fenced block, in order of appearance
/// 3. find the literal `{"function"` opener and brace-match the minimal
///    balanced object from there; a failed parse there ends the scan
#[must_use]
pub fn extract_call(text: &str) -> Option<ToolCall> {
    let s = text.trim();

    if let Some(call) = parse_object(s) {
        return Some(call);
    }

    for captures in FENCED_RE.captures_iter(s) {
        let block = captures.get(1).map_or("", |m| m.as_str()).trim();
        if let Some(call) = parse_object(block) {
            return Some(call);
        }
    }

    if let Some(idx) = s.find(CALL_OPENER) {
        if let Some(chunk) = balanced_object(&s[idx..]) {
            return parse_object(chunk);
        }
    }

    None
}

/// Strategy-1 parse: the entire string must be a JSON object carrying a
/// `function` field.
fn parse_object(s: &str) -> Option<ToolCall> {
    let value: Value = serde_json::from_str(s).ok()?;
    let obj = value.as_object()?;
    let name_field = obj.get("function")?;

    let name = name_field
        .as_str()
        .map_or_else(|| name_field.to_string(), ToString::to_string);
    let arguments = obj
        .get("arguments")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();

    Some(ToolCall { name, arguments })
}

/// Depth-counted brace matching from a string starting at `{`.
///
/// Returns the minimal balanced object, or `None` when the braces never
/// balance. Braces are ASCII, so byte slicing stays on char boundaries.
fn balanced_object(s: &str) -> Option<&str> {
    let mut depth: usize = 0;
    for (i, byte) in s.bytes().enumerate() {
        match byte {
            b'{' => depth += 1,
            b'}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(&s[..=i]);
                }
            }
            _ => {}
        }
    }
    None
}
