//! # Document Parser
//!
//! Turns document bytes into an engine value according to the declared
//! format. Syntax checking is left to the engine; a malformed document is
//! returned as the engine's own error.

use docbridge_engine::Engine;

use crate::input::DataFormat;

/// Extract `data` as a value of `engine`, labelled `label`.
pub fn parse_document<E: Engine>(
    engine: &E,
    data: &[u8],
    format: DataFormat,
    label: &str,
) -> Result<E::Value, E::Error> {
    match format {
        DataFormat::Json => engine.extract_json(label, data),
        DataFormat::Yaml => engine.extract_yaml(label, data),
    }
}
