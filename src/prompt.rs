//! Function-calling system prompt builder
//!
//! The capability list is rendered verbatim as machine-readable JSON. This
//! is a one-way interface: the model is told the schema, but dispatch only
//! applies defensive argument defaults — it never re-validates against it.

use crate::tools::specs_json;

/// Build the system prompt instructing the model to either answer in plain
/// language or emit exactly one JSON tool-call object.
#[must_use]
pub fn build_system_prompt() -> String {
    let specs = serde_json::to_string_pretty(&specs_json())
        .unwrap_or_else(|_| "{}".to_string());

    format!(
        r#"You are a voice assistant that can either reply in natural language OR call a tool.

Available tools:
{specs}

Rules:
- If the user's request is best answered by a tool above, respond with ONLY a JSON object:
  {{"function":"<tool_name>","arguments":{{...}}}}
- Do NOT add any text before/after the JSON. No backticks.
- If a tool is NOT needed, reply normally in plain text."#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_lists_every_tool() {
        let prompt = build_system_prompt();
        assert!(prompt.contains("\"calculate\""));
        assert!(prompt.contains("\"get_weather\""));
        assert!(prompt.contains("\"search_arxiv\""));
    }

    #[test]
    fn prompt_shows_the_payload_shape() {
        let prompt = build_system_prompt();
        assert!(prompt.contains(r#"{"function":"<tool_name>","arguments":{...}}"#));
    }
}
