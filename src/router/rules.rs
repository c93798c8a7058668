//! Keyword/regex fallback rules over the raw user utterance
//!
//! Used when no structured tool call could be parsed from the model's
//! output. Pure matching only — dispatch stays with the router.

use std::sync::LazyLock;

use regex::Regex;

use super::normalize::{contains_operator, normalize_expression};

/// Weather-related trigger words (case-insensitive containment)
const WEATHER_TRIGGERS: &[&str] = &[
    "weather", "forecast", "temperature", "下雨", "天气", "气温", "预报",
];

/// Literature-search trigger words
const LITERATURE_TRIGGERS: &[&str] = &[
    "arxiv",
    "paper",
    "papers",
    "literature",
    "recent research",
    "latest research",
    "论文",
    "检索",
    "文献",
    "最近研究",
];

/// "weather in/at/for <place>" location capture
static LOCATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"weather\s+(?:in|at|for)\s+([a-zA-Z\s,]+)").expect("valid regex"));

/// Trailing time-of-day words stripped from an extracted place
static TIME_WORDS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:today|tomorrow|now|tonight|morning|afternoon|evening|night)\b")
        .expect("valid regex")
});

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// A matched fallback rule, carrying the argument to dispatch with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleMatch {
    /// Normalized arithmetic expression for `calculate`
    Calculate(String),
    /// Extracted location (possibly empty) for `get_weather`
    Weather(String),
    /// Full utterance as the `search_arxiv` query
    Arxiv(String),
}

/// Match the utterance against the fallback rules.
///
/// Arithmetic runs first: an operator-bearing normalized expression is a
/// stronger signal than any single keyword, so "what is five plus three
/// weather" still calculates. Weather outranks literature search.
#[must_use]
pub fn match_rules(utterance: &str) -> Option<RuleMatch> {
    let trimmed = utterance.trim();

    let expression = normalize_expression(trimmed);
    if contains_operator(&expression) {
        return Some(RuleMatch::Calculate(expression));
    }

    let lower = trimmed.to_lowercase();

    if WEATHER_TRIGGERS.iter().any(|t| lower.contains(t)) {
        return Some(RuleMatch::Weather(extract_location(&lower)));
    }

    if LITERATURE_TRIGGERS.iter().any(|t| lower.contains(t)) {
        return Some(RuleMatch::Arxiv(trimmed.to_string()));
    }

    None
}

/// Pull a place name out of "weather in/at/for <place>", stripping trailing
/// time-of-day words. Empty when no pattern matches — the weather tool has
/// its own default.
fn extract_location(lower_utterance: &str) -> String {
    let Some(captures) = LOCATION_RE.captures(lower_utterance) else {
        return String::new();
    };
    let raw = captures.get(1).map_or("", |m| m.as_str()).trim();
    let stripped = TIME_WORDS_RE.replace_all(raw, "");
    WHITESPACE_RE.replace_all(&stripped, " ").trim().to_string()
}
