//! # docbridge-core — Document Validation Pipeline
//!
//! Validates JSON/YAML documents against a named definition of a compiled
//! schema and reports failures as stable line/column/path/message records.
//!
//! ## Pipeline
//!
//! read → parse → unify → check-concrete → extract errors → format
//!
//! - **Input** (`input.rs`): [`ValidationInput`] names a file, a reader or
//!   an in-memory buffer plus its [`DataFormat`]; [`read_input`] turns any
//!   of them into bytes.
//! - **Parser** (`parser.rs`): [`parse_document`] hands the bytes to the
//!   engine's JSON or YAML extractor.
//! - **Loader** (`loader.rs`): [`CompiledSchema`] compiles a schema file
//!   once and checks that the definition exists.
//! - **Validator** (`validator.rs`): [`Validator::validate`] runs one
//!   document through the pipeline.
//! - **Extractor** (`extract.rs`): [`extract_errors`] flattens an engine
//!   failure into [`ValidationError`] records.
//! - **Formatter** (`format.rs`): [`format_results`] renders a batch of
//!   [`ValidationResult`]s as text.
//!
//! ## Usage
//!
//! ```no_run
//! use docbridge_core::{format_results, DataFormat, ValidationInput, Validator};
//!
//! let validator = Validator::new("schema.json", "#Config")?;
//! let result = validator.validate(ValidationInput::file("config.yaml", DataFormat::Yaml))?;
//! print!("{}", format_results(&[result]));
//! # Ok::<(), docbridge_core::BridgeError>(())
//! ```
//!
//! ## Crate Policy
//!
//! - Depends only on `docbridge-engine` internally, and talks to the
//!   engine exclusively through the [`Engine`](docbridge_engine::Engine)
//!   trait.
//! - `Err(BridgeError)` means the machinery failed. A document that does
//!   not parse or does not satisfy the definition is an `Ok` result with
//!   `valid = false` and at least one error.

pub mod error;
pub mod extract;
pub mod format;
pub mod input;
pub mod loader;
pub mod options;
pub mod parser;
pub mod result;
pub mod validator;

pub use error::{BridgeError, Result};
pub use extract::extract_errors;
pub use format::format_results;
pub use input::{read_input, DataFormat, InputSource, ValidationInput};
pub use loader::CompiledSchema;
pub use options::{PathFilter, ValidatorOptions};
pub use parser::parse_document;
pub use result::{ValidationError, ValidationResult};
pub use validator::Validator;
