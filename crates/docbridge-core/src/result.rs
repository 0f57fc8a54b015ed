//! # Validation Results
//!
//! The outcome of validating one document, and the normalized error
//! records it carries. Both types render as the fixed text report lines
//! through `Display`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One normalized validation failure.
///
/// `line` and `column` are 1-based; 0 means the engine reported no
/// position. `path` is dot-joined; empty means root or unknown.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValidationError {
    /// Source line, or 0 if unknown.
    pub line: usize,
    /// Source column, or 0 if unknown.
    pub column: usize,
    /// Dot-joined field path, or empty.
    pub path: String,
    /// Human-readable reason. Never empty.
    pub message: String,
}

impl ValidationError {
    /// An error with no position and no path.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            line: 0,
            column: 0,
            path: String::new(),
            message: message.into(),
        }
    }
}

/// Renders the indented report line, without the trailing newline.
impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.line > 0, self.path.is_empty()) {
            (true, false) => write!(f, "  line {}, field \"{}\": {}", self.line, self.path, self.message),
            (true, true) => write!(f, "  line {}: {}", self.line, self.message),
            (false, false) => write!(f, "  field \"{}\": {}", self.path, self.message),
            (false, true) => write!(f, "  {}", self.message),
        }
    }
}

/// Outcome of validating one document.
///
/// `errors` is empty exactly when `valid` is true. Build with
/// [`ValidationResult::ok`] or [`ValidationResult::failed`] to keep that
/// invariant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// The caller-supplied label.
    pub name: String,
    /// Whether the document satisfied the definition.
    pub valid: bool,
    /// Failures in engine order.
    pub errors: Vec<ValidationError>,
}

impl ValidationResult {
    /// A passing result.
    pub fn ok(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            valid: true,
            errors: Vec::new(),
        }
    }

    /// A failing result. An empty `errors` list is replaced by a single
    /// unknown-reason record.
    pub fn failed(name: impl Into<String>, mut errors: Vec<ValidationError>) -> Self {
        if errors.is_empty() {
            errors.push(ValidationError::message("validation failed"));
        }
        Self {
            name: name.into(),
            valid: false,
            errors,
        }
    }
}

/// Renders the result's report block, every line newline-terminated.
impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.valid {
            return writeln!(f, "{}: ok", self.name);
        }
        writeln!(f, "FAIL: {}", self.name)?;
        for error in &self.errors {
            writeln!(f, "{error}")?;
        }
        Ok(())
    }
}
