//! Spoken-language arithmetic normalization
//!
//! Converts phrases like "10 to the power of 2" into the symbolic form
//! `10**2` that the calculate tool evaluates. The whole pipeline is an
//! ordered list of data-driven substitution rules; it is total — any input
//! produces some output, possibly empty or operator-free, and the caller
//! decides usability via [`contains_operator`].

use std::sync::LazyLock;

use regex::Regex;

/// Multi-word phrase substitutions, most specific first
const PHRASE_RULES: &[(&str, &str)] = &[
    ("open parenthesis", "("),
    ("close parenthesis", ")"),
    ("open bracket", "("),
    ("close bracket", ")"),
    ("raised to the power of", "**"),
    ("to the power of", "**"),
    ("multiplied by", "*"),
    ("times", "*"),
    ("divided by", "/"),
    ("divide by", "/"),
    ("all over", "/"),
    ("over", "/"),
    // Common Chinese expressions
    ("加上", "+"),
    ("加", "+"),
    ("减去", "-"),
    ("减", "-"),
    ("乘以", "*"),
    ("乘", "*"),
    ("除以", "/"),
    ("除", "/"),
];

/// Single-word substitutions
const WORD_RULES: &[(&str, &str)] = &[
    ("plus", "+"),
    ("minus", "-"),
    ("mod", "%"),
    ("modulo", "%"),
    ("squared", "**2"),
    ("cubed", "**3"),
];

/// Spoken number words → digits (compounds like "twenty five" are out of
/// scope; they concatenate, as plain speech-to-text rarely produces them for
/// arithmetic anyway)
const NUMBER_WORDS: &[(&str, &str)] = &[
    ("zero", "0"),
    ("one", "1"),
    ("two", "2"),
    ("three", "3"),
    ("four", "4"),
    ("five", "5"),
    ("six", "6"),
    ("seven", "7"),
    ("eight", "8"),
    ("nine", "9"),
    ("ten", "10"),
    ("eleven", "11"),
    ("twelve", "12"),
    ("thirteen", "13"),
    ("fourteen", "14"),
    ("fifteen", "15"),
    ("sixteen", "16"),
    ("seventeen", "17"),
    ("eighteen", "18"),
    ("nineteen", "19"),
    ("twenty", "20"),
    ("thirty", "30"),
    ("forty", "40"),
    ("fifty", "50"),
    ("sixty", "60"),
    ("seventy", "70"),
    ("eighty", "80"),
    ("ninety", "90"),
];

/// Filler phrases stripped to a single space
const NOISE_PHRASES: &[&str] = &[
    "what is",
    "what's",
    "whats",
    "result",
    "equals",
    "calculate",
    "compute",
    "请问",
    "等于多少",
    "结果是多少",
    "计算一下",
    "帮我算",
];

static COMPILED_PHRASES: LazyLock<Vec<(Regex, &'static str)>> =
    LazyLock::new(|| compile(PHRASE_RULES));
static COMPILED_WORDS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| compile(WORD_RULES));
static COMPILED_NUMBERS: LazyLock<Vec<(Regex, &'static str)>> =
    LazyLock::new(|| compile(NUMBER_WORDS));
static COMPILED_NOISE: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    NOISE_PHRASES
        .iter()
        .map(|phrase| bounded(phrase))
        .collect()
});

static COLLAPSE_PLUS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\+{2,}").expect("valid regex"));
static COLLAPSE_MINUS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-{2,}").expect("valid regex"));
static COLLAPSE_SLASH: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"/{2,}").expect("valid regex"));

/// Arithmetic operator presence: `**` or any of `+ - * / % ^`
static OPERATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*|[+\-*/%^]").expect("valid regex"));

/// Word-boundary-anchored literal pattern, so substrings inside other words
/// are never corrupted
fn bounded(literal: &str) -> Regex {
    Regex::new(&format!(r"\b{}\b", regex::escape(literal))).expect("valid rule pattern")
}

fn compile(table: &'static [(&'static str, &'static str)]) -> Vec<(Regex, &'static str)> {
    table
        .iter()
        .map(|(pattern, replacement)| (bounded(pattern), *replacement))
        .collect()
}

/// Normalize a spoken arithmetic phrase into a symbolic expression string.
///
/// Ordered pipeline: lowercase → phrase rules → word rules → number words →
/// noise stripping → character filter → whitespace removal → duplicate
/// operator collapse. Total; never fails.
#[must_use]
pub fn normalize_expression(input: &str) -> String {
    let mut s = input.to_lowercase();

    for (pattern, replacement) in COMPILED_PHRASES.iter() {
        s = pattern.replace_all(&s, *replacement).into_owned();
    }
    for (pattern, replacement) in COMPILED_WORDS.iter() {
        s = pattern.replace_all(&s, *replacement).into_owned();
    }
    for (pattern, replacement) in COMPILED_NUMBERS.iter() {
        s = pattern.replace_all(&s, *replacement).into_owned();
    }
    for pattern in COMPILED_NOISE.iter() {
        s = pattern.replace_all(&s, " ").into_owned();
    }

    // Keep only digits, decimals, operators, parentheses, whitespace
    let mut filtered: String = s
        .chars()
        .map(|c| {
            if c.is_ascii_digit() || ".+-*/%()".contains(c) || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();

    filtered.retain(|c| !c.is_whitespace());

    // Collapse operator runs produced by noise-substitution artifacts
    let collapsed = COLLAPSE_PLUS.replace_all(&filtered, "+");
    let collapsed = COLLAPSE_MINUS.replace_all(&collapsed, "-");
    let collapsed = COLLAPSE_SLASH.replace_all(&collapsed, "/");

    collapsed.replace("**+", "**")
}

/// Whether a normalized expression carries at least one arithmetic operator.
#[must_use]
pub fn contains_operator(expression: &str) -> bool {
    OPERATOR_RE.is_match(expression)
}
