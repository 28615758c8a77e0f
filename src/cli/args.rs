//! CLI argument definitions using clap
//!
//! Commands:
//! - formforge serve [--in-memory]   (default when no command is given)
//! - formforge migrate [--dry-run]
//! - formforge check
//! - formforge validate
//!
//! Every setting falls back to its environment variable, then to its
//! default.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::observability::LogFormat;

/// formforge - serve a CRUD interface for a table described by a JSON schema
#[derive(Parser, Debug)]
#[command(name = "formforge")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub settings: Settings,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Args, Debug, Clone)]
pub struct Settings {
    /// Database host
    #[arg(long, env = "DB_HOST", default_value = "localhost", global = true)]
    pub db_host: String,

    /// Database port
    #[arg(long, env = "DB_PORT", default_value_t = 3306, global = true)]
    pub db_port: u16,

    /// Database user
    #[arg(long, env = "DB_USER", global = true)]
    pub db_user: Option<String>,

    /// Database password
    #[arg(long, env = "DB_PSW", default_value = "", hide_env_values = true, global = true)]
    pub db_psw: String,

    /// Database name
    #[arg(long, env = "DB_NAME", global = true)]
    pub db_name: Option<String>,

    /// Address the HTTP server binds to
    #[arg(long, env = "HOST", default_value = "0.0.0.0", global = true)]
    pub host: String,

    /// Port the HTTP server listens on
    #[arg(long, env = "PORT", default_value_t = 8080, global = true)]
    pub port: u16,

    /// Path to the JSON schema file
    #[arg(long, env = "JSON_SCHEMA", global = true)]
    pub json_schema: Option<PathBuf>,

    /// Log output format
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty, global = true)]
    pub log_format: LogFormat,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Create the table if needed and serve the web interface
    Serve {
        /// Keep records in process memory instead of MySQL
        #[arg(long)]
        in_memory: bool,
    },

    /// Create the table described by the schema
    Migrate {
        /// Print the CREATE TABLE statement instead of executing it
        #[arg(long)]
        dry_run: bool,
    },

    /// Load the schema and print a summary of its fields
    Check,

    /// Validate one JSON object of form values read from stdin
    Validate,
}

impl Default for Command {
    fn default() -> Self {
        Command::Serve { in_memory: false }
    }
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    /// The requested command, `serve` when none was given
    pub fn command_or_default(&self) -> Command {
        self.command.clone().unwrap_or_default()
    }
}
