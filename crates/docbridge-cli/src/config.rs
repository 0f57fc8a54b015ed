//! # Configuration File
//!
//! Loads [`ValidatorOptions`] from the YAML file named by `--config`.
//!
//! ```yaml
//! root_marker: "#Config"
//! keep_index_segments: true
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use docbridge_core::ValidatorOptions;

/// Read options from `path`, or return the defaults when no file is given.
pub fn load_options(path: Option<&Path>) -> Result<ValidatorOptions> {
    let Some(path) = path else {
        return Ok(ValidatorOptions::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;
    if text.trim().is_empty() {
        return Ok(ValidatorOptions::default());
    }
    let options = serde_yaml::from_str(&text)
        .with_context(|| format!("failed to parse config file: {}", path.display()))?;
    tracing::debug!(config = %path.display(), ?options, "loaded configuration");
    Ok(options)
}
