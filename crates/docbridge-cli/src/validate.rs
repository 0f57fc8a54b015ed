//! # Validate Subcommand
//!
//! Validates one or more documents against a schema definition and prints
//! the text report.
//!
//! ## Usage
//!
//! ```bash
//! docbridge validate --schema schema.json --definition '#Config' app.yaml base.json
//! cat app.yaml | docbridge validate --schema schema.json --definition '#Config' --format yaml -
//! ```
//!
//! Exit status is 0 when every document is valid, 1 when at least one is
//! invalid, and 2 when any input could not be processed at all.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use docbridge_core::{format_results, DataFormat, ValidationInput, ValidationResult, Validator, ValidatorOptions};

use crate::{EXIT_INVALID, EXIT_OK, EXIT_PROCESS_ERROR};

/// Arguments for the validate subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Schema file (JSON or YAML).
    #[arg(long)]
    pub schema: PathBuf,

    /// Definition to validate against (e.g. `#Config`).
    #[arg(long)]
    pub definition: String,

    /// Document format (json or yaml). Overrides extension detection;
    /// required when reading from stdin.
    #[arg(long)]
    pub format: Option<DataFormat>,

    /// Keep list indices in error paths (`items[2].name`).
    #[arg(long)]
    pub keep_index_segments: bool,

    /// Documents to validate. `-` reads standard input.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

/// Execute the validate subcommand, writing the report to stdout.
pub fn run_validate(args: &ValidateArgs, options: ValidatorOptions) -> Result<u8> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    run_validate_to(args, options, &mut out)
}

/// Execute the validate subcommand, writing the report to `out`.
pub fn run_validate_to<W: Write>(args: &ValidateArgs, mut options: ValidatorOptions, out: &mut W) -> Result<u8> {
    if args.keep_index_segments {
        options.keep_index_segments = true;
    }
    let validator = Validator::with_options(&args.schema, &args.definition, options)
        .with_context(|| format!("failed to load schema {}", args.schema.display()))?;

    let mut results: Vec<ValidationResult> = Vec::with_capacity(args.files.len());
    let mut process_errors = 0usize;

    for file in &args.files {
        match validate_one(&validator, file, args.format) {
            Ok(result) => results.push(result),
            Err(e) => {
                tracing::error!("{e:#}");
                process_errors += 1;
            }
        }
    }

    out.write_all(format_results(&results).as_bytes())
        .context("failed to write report")?;
    out.flush().context("failed to write report")?;

    let invalid = results.iter().filter(|r| !r.valid).count();
    tracing::info!(
        checked = results.len(),
        invalid,
        process_errors,
        "validation finished"
    );

    Ok(if process_errors > 0 {
        EXIT_PROCESS_ERROR
    } else if invalid > 0 {
        EXIT_INVALID
    } else {
        EXIT_OK
    })
}

fn validate_one(validator: &Validator, file: &Path, format: Option<DataFormat>) -> Result<ValidationResult> {
    let input = if file.as_os_str() == "-" {
        let format = format.context("--format is required when reading from stdin")?;
        ValidationInput::reader(io::stdin().lock(), format).named("<stdin>")
    } else {
        let format = match format {
            Some(format) => format,
            None => detect_format(file)?,
        };
        ValidationInput::file(file, format)
    };
    let result = validator
        .validate(input)
        .with_context(|| format!("failed to validate {}", file.display()))?;
    Ok(result)
}

/// Infer the document format from the file extension.
pub fn detect_format(path: &Path) -> Result<DataFormat> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .with_context(|| format!("cannot detect format of {}: no file extension", path.display()))?;
    extension
        .parse::<DataFormat>()
        .with_context(|| format!("cannot detect format of {}", path.display()))
}
