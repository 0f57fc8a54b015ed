//! # docbridge CLI entry point
//!
//! Parses command-line arguments, initializes logging and dispatches to
//! the subcommand handlers in the library crate.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use docbridge_cli::check_schema::{run_check_schema, CheckSchemaArgs};
use docbridge_cli::config::load_options;
use docbridge_cli::validate::{run_validate, ValidateArgs};
use docbridge_cli::EXIT_PROCESS_ERROR;

/// Validate JSON and YAML documents against a schema definition.
#[derive(Parser, Debug)]
#[command(name = "docbridge", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a YAML configuration file with validator options.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate documents against a schema definition.
    Validate(ValidateArgs),

    /// Compile a schema and check that a definition exists.
    CheckSchema(CheckSchemaArgs),
}

/// Log filter for a `-v` count.
fn log_filter(verbose: u8) -> EnvFilter {
    match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(cli.verbose))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("docbridge v{} starting", env!("CARGO_PKG_VERSION"));

    let result = load_options(cli.config.as_deref()).and_then(|options| match &cli.command {
        Commands::Validate(args) => run_validate(args, options),
        Commands::CheckSchema(args) => run_check_schema(args, options),
    });

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(EXIT_PROCESS_ERROR)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docbridge_core::DataFormat;

    #[test]
    fn cli_parse_validate_files() {
        let cli = Cli::try_parse_from([
            "docbridge",
            "validate",
            "--schema",
            "schema.json",
            "--definition",
            "#Config",
            "a.yaml",
            "b.json",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 0);
        assert!(cli.config.is_none());
        if let Commands::Validate(args) = cli.command {
            assert_eq!(args.schema, PathBuf::from("schema.json"));
            assert_eq!(args.definition, "#Config");
            assert_eq!(args.files, vec![PathBuf::from("a.yaml"), PathBuf::from("b.json")]);
            assert!(args.format.is_none());
            assert!(!args.keep_index_segments);
        } else {
            panic!("expected validate");
        }
    }

    #[test]
    fn cli_parse_validate_stdin_with_format() {
        let cli = Cli::try_parse_from([
            "docbridge",
            "-vv",
            "validate",
            "--schema",
            "s.json",
            "--definition",
            "#Config",
            "--format",
            "yaml",
            "--keep-index-segments",
            "-",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        if let Commands::Validate(args) = cli.command {
            assert_eq!(args.format, Some(DataFormat::Yaml));
            assert!(args.keep_index_segments);
            assert_eq!(args.files, vec![PathBuf::from("-")]);
        } else {
            panic!("expected validate");
        }
    }

    #[test]
    fn cli_parse_rejects_unknown_format() {
        let result = Cli::try_parse_from([
            "docbridge",
            "validate",
            "--schema",
            "s.json",
            "--definition",
            "#Config",
            "--format",
            "toml",
            "a.toml",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn cli_parse_validate_requires_files() {
        let result = Cli::try_parse_from(["docbridge", "validate", "--schema", "s.json", "--definition", "#Config"]);
        assert!(result.is_err());
    }

    #[test]
    fn log_filter_follows_verbosity() {
        assert_eq!(log_filter(0).to_string(), "warn");
        assert_eq!(log_filter(1).to_string(), "info");
        assert_eq!(log_filter(2).to_string(), "debug");
        assert_eq!(log_filter(7).to_string(), "trace");
    }

    #[test]
    fn cli_parse_check_schema_with_config() {
        let cli = Cli::try_parse_from([
            "docbridge",
            "check-schema",
            "--schema",
            "s.yaml",
            "--definition",
            "#Service",
            "--config",
            "docbridge.yaml",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("docbridge.yaml")));
        if let Commands::CheckSchema(args) = cli.command {
            assert_eq!(args.schema, PathBuf::from("s.yaml"));
            assert_eq!(args.definition, "#Service");
        } else {
            panic!("expected check-schema");
        }
    }
}
