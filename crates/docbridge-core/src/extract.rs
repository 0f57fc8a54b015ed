//! # Error Extraction
//!
//! Flattens an engine failure, leaf or composite, into an ordered list of
//! [`ValidationError`] records. Missing metadata degrades to `0` / `""`;
//! extraction itself never fails and never returns an empty list.

use docbridge_engine::{Diagnostic, EngineError};

use crate::options::PathFilter;
use crate::result::ValidationError;

/// Normalize `err` into one record per sub-error, in engine order.
///
/// An error with no sub-errors yields a single record carrying its full
/// text and no position or path.
pub fn extract_errors(err: &dyn EngineError, filter: &PathFilter) -> Vec<ValidationError> {
    let sub_errors = err.errors();
    if sub_errors.is_empty() {
        return vec![ValidationError::message(err.to_string())];
    }
    sub_errors
        .into_iter()
        .map(|diagnostic| extract_one(diagnostic, filter))
        .collect()
}

fn extract_one(diagnostic: &dyn Diagnostic, filter: &PathFilter) -> ValidationError {
    let positions = diagnostic.positions();
    let line = positions.iter().map(|p| p.line).find(|&l| l > 0).unwrap_or(0);
    let column = positions.iter().map(|p| p.column).find(|&c| c > 0).unwrap_or(0);
    let mut message = diagnostic.to_string();
    if message.is_empty() {
        message = "validation failed".to_string();
    }
    ValidationError {
        line,
        column,
        path: filter.format_path(&diagnostic.path()),
        message,
    }
}
