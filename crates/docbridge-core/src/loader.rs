//! # Schema Loading
//!
//! Reads and compiles a schema file once and confirms that the requested
//! definition exists. The result owns its engine context for as long as
//! it lives.

use std::fmt;
use std::path::{Path, PathBuf};

use docbridge_engine::Engine;

use crate::error::{BridgeError, Result};

/// A compiled schema together with the engine that compiled it.
///
/// Construction fails unless the definition resolves, so a
/// `CompiledSchema` always names an existing definition.
pub struct CompiledSchema<E: Engine> {
    path: PathBuf,
    definition: String,
    engine: E,
    schema: E::Schema,
}

impl<E: Engine> CompiledSchema<E> {
    /// Read `path`, compile it with `engine` and check `definition`.
    pub fn load(engine: E, path: impl Into<PathBuf>, definition: impl Into<String>) -> Result<Self> {
        let path = path.into();
        let definition = definition.into();

        let source = std::fs::read(&path).map_err(|source| BridgeError::SchemaRead {
            path: path.clone(),
            source,
        })?;

        let filename = path.display().to_string();
        let schema = engine
            .compile(&source, &filename)
            .map_err(|e| BridgeError::SchemaCompile {
                path: path.clone(),
                source: Box::new(e),
            })?;

        if engine.lookup(&schema, &definition).is_none() {
            return Err(BridgeError::DefinitionNotFound { path, definition });
        }

        tracing::debug!(schema = %filename, definition = %definition, "schema loaded");
        Ok(Self {
            path,
            definition,
            engine,
            schema,
        })
    }

    /// Resolve the definition again, as needed for each validation.
    pub fn definition_value(&self) -> Option<E::Value> {
        self.engine.lookup(&self.schema, &self.definition)
    }

    /// Schema file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Definition name.
    pub fn definition(&self) -> &str {
        &self.definition
    }

    /// The engine context that compiled the schema.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// The compiled schema value.
    pub fn schema(&self) -> &E::Schema {
        &self.schema
    }
}

impl<E: Engine> fmt::Debug for CompiledSchema<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledSchema")
            .field("path", &self.path)
            .field("definition", &self.definition)
            .finish_non_exhaustive()
    }
}
