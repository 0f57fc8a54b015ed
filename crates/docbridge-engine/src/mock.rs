//! # Mock Engine
//!
//! A deterministic, scripted engine for exercising the validation
//! pipeline without a real constraint language.
//!
//! - Schema source is read line by line; every line starting with `#`
//!   declares the definition named by the text before the first `:`.
//!   Source containing `syntax error` fails to compile.
//! - Documents whose text starts with `!` fail to extract.
//! - `validate_concrete` returns the scripted failure if one is set,
//!   fails on values with no document, and succeeds otherwise.

use std::sync::atomic::{AtomicUsize, Ordering};

use thiserror::Error;

use crate::traits::{Diagnostic, Engine, EngineError, Position};

/// A scripted engine error: a leaf, or a composite of child errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct MockError {
    /// Rendered message.
    pub message: String,
    /// Reported positions.
    pub positions: Vec<Position>,
    /// Raw path segments.
    pub path: Vec<String>,
    /// Constituent errors; empty for a leaf.
    pub children: Vec<MockError>,
}

impl MockError {
    /// A leaf error with no position or path.
    pub fn leaf(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            positions: Vec::new(),
            path: Vec::new(),
            children: Vec::new(),
        }
    }

    /// A composite error over `children`.
    pub fn composite(message: impl Into<String>, children: Vec<MockError>) -> Self {
        Self {
            children,
            ..Self::leaf(message)
        }
    }

    /// Append a reported position.
    pub fn at(mut self, line: usize, column: usize) -> Self {
        self.positions.push(Position::new(line, column));
        self
    }

    /// Set the raw path segments.
    pub fn with_path<I, S>(mut self, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.path = segments.into_iter().map(Into::into).collect();
        self
    }
}

impl Diagnostic for MockError {
    fn positions(&self) -> Vec<Position> {
        self.positions.clone()
    }

    fn path(&self) -> Vec<String> {
        self.path.clone()
    }
}

impl EngineError for MockError {
    fn errors(&self) -> Vec<&dyn Diagnostic> {
        self.children.iter().map(|c| c as &dyn Diagnostic).collect()
    }
}

/// A compiled mock schema: the declared definition names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockSchema {
    definitions: Vec<String>,
}

impl MockSchema {
    /// Declared definition names, in source order.
    pub fn definitions(&self) -> &[String] {
        &self.definitions
    }
}

/// A mock engine value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockValue {
    /// A definition resolved from a schema.
    Definition(String),
    /// An extracted document.
    Document {
        /// Document label.
        label: String,
        /// Declared format (`json` or `yaml`).
        format: &'static str,
        /// Document text.
        text: String,
    },
    /// The unification of two or more values, flattened.
    Unified(Vec<MockValue>),
}

impl MockValue {
    fn has_document(&self) -> bool {
        match self {
            Self::Definition(_) => false,
            Self::Document { .. } => true,
            Self::Unified(parts) => parts.iter().any(MockValue::has_document),
        }
    }

    fn flatten(self) -> Vec<MockValue> {
        match self {
            Self::Unified(parts) => parts,
            other => vec![other],
        }
    }
}

/// Scripted in-memory engine.
#[derive(Debug, Default)]
pub struct MockEngine {
    failure: Option<MockError>,
    lookup_budget: Option<usize>,
    lookups: AtomicUsize,
}

impl MockEngine {
    /// An engine under which every complete document is valid.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `validate_concrete` fail with `error` for every value.
    pub fn failing_with(mut self, error: MockError) -> Self {
        self.failure = Some(error);
        self
    }

    /// Let only the first `budget` lookups succeed.
    pub fn forgetting_after(mut self, budget: usize) -> Self {
        self.lookup_budget = Some(budget);
        self
    }

    /// Number of lookups performed so far.
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    fn extract(&self, label: &str, format: &'static str, data: &[u8]) -> Result<MockValue, MockError> {
        let text = String::from_utf8_lossy(data).into_owned();
        if text.trim_start().starts_with('!') {
            return Err(MockError::leaf(format!("{label}: malformed {format} document")).at(1, 1));
        }
        Ok(MockValue::Document {
            label: label.to_string(),
            format,
            text,
        })
    }
}

impl Engine for MockEngine {
    type Schema = MockSchema;
    type Value = MockValue;
    type Error = MockError;

    fn compile(&self, source: &[u8], filename: &str) -> Result<MockSchema, MockError> {
        let text = String::from_utf8_lossy(source);
        if text.contains("syntax error") {
            return Err(MockError::leaf(format!("{filename}: syntax error")).at(1, 1));
        }
        let definitions = text
            .lines()
            .map(str::trim)
            .filter(|line| line.starts_with('#'))
            .map(|line| line.split(':').next().unwrap_or(line).trim().to_string())
            .collect();
        Ok(MockSchema { definitions })
    }

    fn lookup(&self, schema: &MockSchema, path: &str) -> Option<MockValue> {
        let performed = self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.lookup_budget.is_some_and(|budget| performed >= budget) {
            return None;
        }
        schema
            .definitions
            .iter()
            .find(|d| d.as_str() == path)
            .map(|d| MockValue::Definition(d.clone()))
    }

    fn extract_json(&self, label: &str, data: &[u8]) -> Result<MockValue, MockError> {
        self.extract(label, "json", data)
    }

    fn extract_yaml(&self, label: &str, data: &[u8]) -> Result<MockValue, MockError> {
        self.extract(label, "yaml", data)
    }

    fn unify(&self, a: &MockValue, b: &MockValue) -> MockValue {
        let mut parts = a.clone().flatten();
        parts.extend(b.clone().flatten());
        MockValue::Unified(parts)
    }

    fn validate_concrete(&self, value: &MockValue) -> Result<(), MockError> {
        if let Some(failure) = &self.failure {
            return Err(failure.clone());
        }
        if !value.has_document() {
            return Err(MockError::leaf("incomplete value"));
        }
        Ok(())
    }
}
