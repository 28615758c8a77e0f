//! CLI command implementations
//!
//! Startup order for `serve`:
//! 1. Configuration
//! 2. Schema load
//! 3. Database connection and ping (skipped with `--in-memory`)
//! 4. Table migration
//! 5. HTTP server

use std::sync::Arc;

use serde_json::{json, Value};
use tokio::runtime::Runtime;

use super::args::{Cli, Command, Settings};
use super::config::{Config, DatabaseConfig};
use super::errors::{CliError, CliResult};
use super::io::{read_form, write_invalid, write_response};
use crate::http_server::{AppState, HttpServer};
use crate::observability::init_logging;
use crate::schema::{Schema, SchemaLoader};
use crate::store::{migration, MemoryRepository, MySqlRepository, RecordRepository};
use crate::validation;

/// Main CLI entry point
///
/// Parses arguments, installs logging and dispatches to the command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    init_logging(cli.settings.log_format).map_err(CliError::config_error)?;
    run_command(&cli.settings, cli.command_or_default())
}

pub fn run_command(settings: &Settings, command: Command) -> CliResult<()> {
    match command {
        Command::Serve { in_memory } => serve(settings, in_memory),
        Command::Migrate { dry_run } => migrate(settings, dry_run),
        Command::Check => check(settings),
        Command::Validate => validate(settings),
    }
}

/// Serve the web interface until interrupted
pub fn serve(settings: &Settings, in_memory: bool) -> CliResult<()> {
    let config = Config::resolve(settings, !in_memory)?;
    config.log_summary();
    let schema = load_schema(&config)?;

    runtime()?.block_on(async move {
        let repo: Arc<dyn RecordRepository> = match &config.database {
            Some(db) => {
                let repo = connect(db, schema.clone()).await?;
                repo.auto_migrate().await?;
                tracing::info!(table = %schema.table_name, "table ensured");
                Arc::new(repo)
            }
            None => {
                tracing::warn!("records are kept in memory and lost on exit");
                Arc::new(MemoryRepository::new(schema.clone()))
            }
        };

        let state = AppState::new(schema, repo, config.http.page_size)
            .map_err(|e| CliError::serve_failed(format!("Failed to load templates: {}", e)))?;

        HttpServer::new(config.http.clone(), state)
            .start()
            .await
            .map_err(|e| CliError::serve_failed(format!("HTTP server failed: {}", e)))
    })
}

/// Create the schema's table, or print the statement with `--dry-run`
pub fn migrate(settings: &Settings, dry_run: bool) -> CliResult<()> {
    let config = Config::resolve(settings, !dry_run)?;
    let schema = load_schema(&config)?;
    let ddl = migration::create_table(&schema);

    let db = match (&config.database, dry_run) {
        (Some(db), false) => db,
        _ => {
            println!("{}", ddl);
            return Ok(());
        }
    };

    config.log_summary();
    runtime()?.block_on(async {
        let repo = connect(db, schema.clone()).await?;
        repo.auto_migrate().await?;
        repo.disconnect().await?;
        Ok::<_, CliError>(())
    })?;

    tracing::info!(table = %schema.table_name, "table ensured");
    write_response(&json!({ "table": schema.table_name, "statement": ddl }))
}

/// Load the schema and print its fields
pub fn check(settings: &Settings) -> CliResult<()> {
    let config = Config::resolve(settings, false)?;
    let schema = load_schema(&config)?;
    write_response(&schema_summary(&schema))
}

/// Run the validation pipeline over form values read from stdin
pub fn validate(settings: &Settings) -> CliResult<()> {
    let config = Config::resolve(settings, false)?;
    let schema = load_schema(&config)?;
    let form = read_form()?;

    match validation::validate(&form, &schema).into_result() {
        Ok(clean) => write_response(&clean),
        Err(errors) => write_invalid(&errors),
    }
}

fn load_schema(config: &Config) -> CliResult<Arc<Schema>> {
    let schema = SchemaLoader::load(&config.schema_path)?;
    tracing::info!(
        table = %schema.table_name,
        fields = schema.fields.len(),
        "schema loaded"
    );
    Ok(Arc::new(schema))
}

async fn connect(db: &DatabaseConfig, schema: Arc<Schema>) -> CliResult<MySqlRepository> {
    let repo = MySqlRepository::connect(db.connection_options(), schema)
        .await
        .map_err(|e| CliError::database_error(format!("Failed to connect to {}:{}: {}", db.host, db.port, e)))?;
    tracing::info!(host = %db.host, database = %db.name, "database connected");
    Ok(repo)
}

fn runtime() -> CliResult<Runtime> {
    Runtime::new().map_err(|e| CliError::io_error(format!("Failed to create tokio runtime: {}", e)))
}

/// Field listing printed by `check`
pub fn schema_summary(schema: &Schema) -> Value {
    let fields: Vec<Value> = schema
        .fields
        .iter()
        .map(|f| {
            json!({
                "name": f.name,
                "type": f.field_type.type_name(),
                "primary_key": f.primary_key,
                "required": f.required,
                "validation": f.validation.kind.name(),
                "regex_rules": f.validation.regex_rules.len(),
                "mask": f.mask,
            })
        })
        .collect();

    json!({
        "table": schema.table_name,
        "primary_key": schema.primary_key().map(|f| f.name.as_str()),
        "fields": fields,
    })
}
