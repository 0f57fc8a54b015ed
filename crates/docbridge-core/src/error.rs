//! # Process Errors
//!
//! Failures of the validation machinery itself. A [`BridgeError`] means a
//! schema or input could not be processed at all; it is never used for a
//! document that was read and found invalid. Those outcomes are reported
//! through [`ValidationResult`](crate::ValidationResult).

use std::path::PathBuf;

use thiserror::Error;

/// Result type for docbridge operations.
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Process-level error for construction and validation calls.
#[derive(Error, Debug)]
pub enum BridgeError {
    /// The schema file could not be read.
    #[error("reading schema file {}: {source}", .path.display())]
    SchemaRead {
        /// Path to the schema file.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The schema engine rejected the schema source.
    #[error("compiling schema {}: {source}", .path.display())]
    SchemaCompile {
        /// Path to the schema file.
        path: PathBuf,
        /// The engine's compilation error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The schema compiled but does not define the requested definition.
    #[error("schema {} does not define {definition}", .path.display())]
    DefinitionNotFound {
        /// Path to the schema file.
        path: PathBuf,
        /// The requested definition name.
        definition: String,
    },

    /// A definition present at construction no longer resolves.
    #[error("schema {} no longer resolves {definition}", .path.display())]
    DefinitionUnresolved {
        /// Path to the schema file.
        path: PathBuf,
        /// The definition name fixed at construction.
        definition: String,
    },

    /// An input file could not be read.
    #[error("reading input: reading file {}: {source}", .path.display())]
    ReadFile {
        /// Path to the input file.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// An input stream failed while being drained.
    #[error("reading input: reading from reader: {source}")]
    ReadStream {
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// A reader source was selected but no reader was supplied.
    #[error("reading input: reader is absent")]
    MissingReader,

    /// A byte-buffer source was selected but no buffer was supplied.
    #[error("reading input: data is absent")]
    MissingData,

    /// A format tag that names neither JSON nor YAML.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),
}
