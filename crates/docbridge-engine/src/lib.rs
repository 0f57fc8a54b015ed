//! # docbridge-engine — Constraint Engine Capability
//!
//! Defines the narrow interface the docbridge pipeline uses to talk to a
//! schema/constraint engine, and ships one implementation of it.
//!
//! ## Architecture
//!
//! - **Traits** (`traits.rs`): [`Engine`] covers compile, lookup,
//!   JSON/YAML extraction, unification and the concreteness check.
//!   [`EngineError`] and [`Diagnostic`] describe the shape of the engine's
//!   failures (leaf or composite, with optional positions and field paths)
//!   without naming a concrete error type.
//!
//! - **JSON Schema** (`json_schema.rs`): [`JsonSchemaEngine`] backs the
//!   traits with the `jsonschema` crate (Draft 2020-12). Named definitions
//!   are looked up under `$defs`/`definitions`. Violations carry the
//!   line and column of the offending value in the document text.
//!
//! - **Mock** (`mock.rs`): [`MockEngine`] is a scripted in-memory engine
//!   for exercising pipeline control flow without a real schema.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `docbridge-*` crates (leaf of the DAG).
//! - Engines never panic on malformed input; every failure is an
//!   `Engine::Error` value.

mod locate;
pub mod json_schema;
pub mod mock;
pub mod traits;
mod yaml;

pub use json_schema::{Constraint, JsonSchemaEngine, JsonSchemaError, SchemaDocument, Value, Violation};
pub use mock::{MockEngine, MockError, MockValue};
pub use traits::{Diagnostic, Engine, EngineError, Position};
