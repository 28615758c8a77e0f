//! CLI module for formforge
//!
//! Provides command-line interface for:
//! - serve: Load schema, connect, migrate and serve the web interface
//! - migrate: Create the table (or print its DDL)
//! - check: Summarize the schema
//! - validate: Run the validation pipeline over stdin

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command, Settings};
pub use commands::{check, migrate, run, run_command, schema_summary, serve, validate};
pub use config::{mask_password, Config, DatabaseConfig, MAX_CONNECTIONS};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_form_from, write_json_to};
