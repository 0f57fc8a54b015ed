//! # docbridge-cli — Command-Line Interface
//!
//! Provides the `docbridge` command. The library crate holds the
//! subcommand handlers so they can be tested without spawning a process;
//! `main.rs` only parses arguments, sets up logging and maps the outcome
//! to an exit code.
//!
//! ## Subcommands
//!
//! - `docbridge validate`: validate documents against a schema definition.
//! - `docbridge check-schema`: compile a schema and check a definition.
//!
//! ## Exit Codes
//!
//! | code | meaning |
//! |------|---------|
//! | 0    | every document valid |
//! | 1    | at least one document invalid |
//! | 2    | a schema or input could not be processed |

pub mod check_schema;
pub mod config;
pub mod validate;

/// Every document was valid.
pub const EXIT_OK: u8 = 0;

/// At least one document failed validation.
pub const EXIT_INVALID: u8 = 1;

/// A schema, config or input could not be processed.
pub const EXIT_PROCESS_ERROR: u8 = 2;
