//! Arithmetic expression evaluation
//!
//! Evaluates the symbolic expressions produced by the spoken-language
//! normalizer (or passed through from a model tool call) with `meval`.

use super::ToolResult;

/// Tolerance for treating a float result as an integer
const INTEGER_EPSILON: f64 = 1e-12;

/// Evaluates symbolic arithmetic expressions.
pub struct Calculator;

impl Calculator {
    /// Create a calculator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Evaluate an expression and format the result.
    ///
    /// Integers render with no decimal point ("2"); everything else rounds
    /// half-away-from-zero to exactly two decimals ("0.33"). A result of
    /// negative zero normalizes to "0.00". All failure modes (empty input,
    /// syntax errors, non-finite results) are reported, never raised.
    #[must_use]
    pub fn evaluate(&self, expression: &str) -> ToolResult {
        // The normalizer emits `**` for exponentiation; meval wants `^`
        let expr = expression.trim().replace("**", "^");
        if expr.is_empty() {
            return ToolResult::failure("Math calculation error: empty expression");
        }

        match meval::eval_str(&expr) {
            Ok(value) if value.is_finite() => ToolResult::success(format_value(value)),
            Ok(_) => ToolResult::failure("Math calculation error: result is not finite"),
            Err(e) => ToolResult::failure(format!("Math calculation error: {e}")),
        }
    }
}

impl Default for Calculator {
    fn default() -> Self {
        Self::new()
    }
}

/// Render a value: integer form when within epsilon of an integer,
/// otherwise two decimals with ties rounded away from zero.
#[allow(clippy::cast_possible_truncation)]
fn format_value(value: f64) -> String {
    let nearest = value.round();
    if (value - nearest).abs() < INTEGER_EPSILON {
        return format!("{}", nearest as i64);
    }

    let rounded = (value * 100.0).round() / 100.0;
    let text = format!("{rounded:.2}");
    if text == "-0.00" {
        "0.00".to_string()
    } else {
        text
    }
}
