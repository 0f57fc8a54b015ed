//! # Result Formatting
//!
//! Renders a batch of results as one plain-text report.

use crate::result::ValidationResult;

/// Concatenate the report blocks of `results`, in order.
///
/// Valid results render as `<name>: ok`; invalid ones as `FAIL: <name>`
/// followed by one indented line per error. Every line ends with `\n`.
pub fn format_results(results: &[ValidationResult]) -> String {
    results.iter().map(ToString::to_string).collect()
}
