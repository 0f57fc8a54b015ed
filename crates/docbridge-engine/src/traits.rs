//! # Engine Capability Traits
//!
//! The abstract interface between the validation pipeline and a
//! schema/constraint engine. The pipeline never inspects engine values;
//! it only moves them between these operations and interprets errors
//! through [`EngineError`] and [`Diagnostic`].
//!
//! ## Invariant
//!
//! `unify` is infallible. Conflicts between a definition and a document
//! surface from `validate_concrete`, never earlier.

use std::fmt;

/// A source position reported by an engine. Both fields are 1-based;
/// `0` means the engine did not know the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    /// Line number, 1-based.
    pub line: usize,
    /// Column number, 1-based.
    pub column: usize,
}

impl Position {
    /// Create a position from a line and column.
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A single reportable error with optional location metadata.
///
/// `Display` renders the engine's own message text.
pub trait Diagnostic: fmt::Display {
    /// Source positions associated with the error, most relevant first.
    /// May be empty.
    fn positions(&self) -> Vec<Position>;

    /// Raw field-path segments, outermost first. May be empty.
    ///
    /// Segments are reported exactly as the engine spells them: a leading
    /// definition label such as `#Config`, quoted labels such as
    /// `"my-field"` and index segments such as `[0]` are all possible.
    fn path(&self) -> Vec<String>;
}

/// An engine failure: either a leaf error, or a composite of
/// independently reportable errors.
pub trait EngineError: Diagnostic + std::error::Error + Send + Sync + 'static {
    /// The constituent errors in engine order. Empty for a leaf error.
    fn errors(&self) -> Vec<&dyn Diagnostic>;
}

/// Abstract interface for a schema/constraint engine.
///
/// An engine instance is an evaluation context. Values produced by one
/// instance are only meaningful to that same instance.
pub trait Engine {
    /// A compiled schema document.
    type Schema;
    /// An evaluated value: a definition, a document, or their unification.
    type Value;
    /// The engine's error type.
    type Error: EngineError;

    /// Compile schema source text. `filename` tags the source for
    /// diagnostics and relative resolution.
    fn compile(&self, source: &[u8], filename: &str) -> Result<Self::Schema, Self::Error>;

    /// Resolve a path (usually a definition name) inside a compiled schema.
    /// Returns `None` if nothing exists at that path.
    fn lookup(&self, schema: &Self::Schema, path: &str) -> Option<Self::Value>;

    /// Extract a JSON document into an engine value under `label`.
    fn extract_json(&self, label: &str, data: &[u8]) -> Result<Self::Value, Self::Error>;

    /// Extract a YAML document into an engine value under `label`.
    fn extract_yaml(&self, label: &str, data: &[u8]) -> Result<Self::Value, Self::Error>;

    /// Unify two values. Never fails eagerly.
    fn unify(&self, a: &Self::Value, b: &Self::Value) -> Self::Value;

    /// Check that a value is valid and fully concrete.
    fn validate_concrete(&self, value: &Self::Value) -> Result<(), Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_display() {
        assert_eq!(Position::new(5, 12).to_string(), "5:12");
    }

    #[test]
    fn position_default_is_unknown() {
        let pos = Position::default();
        assert_eq!(pos.line, 0);
        assert_eq!(pos.column, 0);
    }
}
