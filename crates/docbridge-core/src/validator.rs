//! # Validator
//!
//! Orchestrates one validation call: read the input, parse it, resolve the
//! definition, unify, check concreteness and normalize any failure.
//!
//! Process failures (unreadable input, a definition that stopped
//! resolving) are returned as `Err`. A document that cannot be parsed or
//! does not satisfy the definition is an `Ok` result with `valid = false`.

use std::path::{Path, PathBuf};

use docbridge_engine::{Engine, JsonSchemaEngine};

use crate::error::{BridgeError, Result};
use crate::extract::extract_errors;
use crate::input::{read_input, ValidationInput};
use crate::loader::CompiledSchema;
use crate::options::{PathFilter, ValidatorOptions};
use crate::parser::parse_document;
use crate::result::{ValidationError, ValidationResult};

/// Validates documents against one definition of one compiled schema.
///
/// Each validator owns its engine context; validators for different
/// schemas are independent. `validate` takes `&self`, so a validator whose
/// engine is `Sync` can serve concurrent calls.
#[derive(Debug)]
pub struct Validator<E: Engine = JsonSchemaEngine> {
    schema: CompiledSchema<E>,
    filter: PathFilter,
}

impl Validator<JsonSchemaEngine> {
    /// Compile `schema_path` with the JSON Schema engine and bind
    /// `definition`.
    pub fn new(schema_path: impl Into<PathBuf>, definition: impl Into<String>) -> Result<Self> {
        Self::with_options(schema_path, definition, ValidatorOptions::default())
    }

    /// Like [`Validator::new`], with explicit options.
    pub fn with_options(
        schema_path: impl Into<PathBuf>,
        definition: impl Into<String>,
        options: ValidatorOptions,
    ) -> Result<Self> {
        Self::with_engine(JsonSchemaEngine::new(), schema_path, definition, options)
    }
}

impl<E: Engine> Validator<E> {
    /// Compile `schema_path` with `engine` and bind `definition`.
    pub fn with_engine(
        engine: E,
        schema_path: impl Into<PathBuf>,
        definition: impl Into<String>,
        options: ValidatorOptions,
    ) -> Result<Self> {
        let schema = CompiledSchema::load(engine, schema_path, definition)?;
        let filter = options.path_filter(schema.definition());
        Ok(Self { schema, filter })
    }

    /// Schema file the validator was built from.
    pub fn schema_path(&self) -> &Path {
        self.schema.path()
    }

    /// Definition documents are checked against.
    pub fn definition(&self) -> &str {
        self.schema.definition()
    }

    /// Validate one document.
    pub fn validate(&self, input: ValidationInput<'_>) -> Result<ValidationResult> {
        let ValidationInput { source, format, name } = input;
        let data = read_input(source)?;
        let engine = self.schema.engine();

        let document = match parse_document(engine, &data, format, &name) {
            Ok(document) => document,
            Err(e) => {
                tracing::debug!(input = %name, format = %format, error = %e, "document failed to parse");
                let error = ValidationError::message(format!("failed to parse: parsing {format}: {e}"));
                return Ok(ValidationResult::failed(name, vec![error]));
            }
        };

        let definition = self.schema.definition_value().ok_or_else(|| {
            tracing::warn!(definition = %self.schema.definition(), "definition no longer resolves");
            BridgeError::DefinitionUnresolved {
                path: self.schema.path().to_path_buf(),
                definition: self.schema.definition().to_string(),
            }
        })?;

        let unified = engine.unify(&definition, &document);
        match engine.validate_concrete(&unified) {
            Ok(()) => {
                tracing::debug!(input = %name, definition = %self.definition(), "document valid");
                Ok(ValidationResult::ok(name))
            }
            Err(e) => {
                let errors = extract_errors(&e, &self.filter);
                tracing::debug!(input = %name, errors = errors.len(), "document invalid");
                Ok(ValidationResult::failed(name, errors))
            }
        }
    }
}
