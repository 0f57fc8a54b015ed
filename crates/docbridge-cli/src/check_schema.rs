//! # Check-Schema Subcommand
//!
//! Compiles a schema and confirms the definition exists, without
//! validating any document. Useful as a CI gate on schema changes.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use docbridge_core::{Validator, ValidatorOptions};

use crate::EXIT_OK;

/// Arguments for the check-schema subcommand.
#[derive(Args, Debug)]
pub struct CheckSchemaArgs {
    /// Schema file (JSON or YAML).
    #[arg(long)]
    pub schema: PathBuf,

    /// Definition that must exist (e.g. `#Config`).
    #[arg(long)]
    pub definition: String,
}

/// Execute the check-schema subcommand.
pub fn run_check_schema(args: &CheckSchemaArgs, options: ValidatorOptions) -> Result<u8> {
    let validator = Validator::with_options(&args.schema, &args.definition, options)
        .with_context(|| format!("failed to load schema {}", args.schema.display()))?;
    println!(
        "{}: defines {}",
        validator.schema_path().display(),
        validator.definition()
    );
    Ok(EXIT_OK)
}
