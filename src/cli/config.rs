//! Resolved process configuration
//!
//! Built from parsed flags (which already carry environment fallbacks)
//! and checked before anything is loaded or connected.

use std::path::PathBuf;

use super::args::Settings;
use super::errors::{CliError, CliResult};
use crate::http_server::HttpServerConfig;
use crate::observability::LogFormat;
use crate::store::ConnectionOptions;

/// Connections kept by the MySQL pool
pub const MAX_CONNECTIONS: usize = 25;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
}

impl DatabaseConfig {
    pub fn connection_options(&self) -> ConnectionOptions {
        ConnectionOptions {
            host: self.host.clone(),
            port: self.port,
            user: self.user.clone(),
            password: self.password.clone(),
            database: self.name.clone(),
            max_connections: MAX_CONNECTIONS,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub schema_path: PathBuf,
    /// `None` when the command runs without a database
    pub database: Option<DatabaseConfig>,
    pub http: HttpServerConfig,
    pub log_format: LogFormat,
}

impl Config {
    /// Checks required settings. Database settings are only required when
    /// `needs_database` is set.
    pub fn resolve(settings: &Settings, needs_database: bool) -> CliResult<Self> {
        let database = if needs_database {
            let name = required(settings.db_name.as_deref(), "DB_NAME", "--db-name")?;
            let user = required(settings.db_user.as_deref(), "DB_USER", "--db-user")?;
            Some(DatabaseConfig {
                host: settings.db_host.clone(),
                port: settings.db_port,
                user,
                password: settings.db_psw.clone(),
                name,
            })
        } else {
            None
        };

        let schema_path = settings
            .json_schema
            .clone()
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or_else(|| missing("JSON_SCHEMA", "--json-schema"))?;

        Ok(Self {
            schema_path,
            database,
            http: HttpServerConfig::new(settings.host.clone(), settings.port),
            log_format: settings.log_format,
        })
    }

    /// Logs the loaded settings with the password masked.
    pub fn log_summary(&self) {
        tracing::info!(
            schema = %self.schema_path.display(),
            bind = %self.http.socket_addr(),
            log_format = %self.log_format,
            "configuration loaded"
        );
        match &self.database {
            Some(db) => tracing::info!(
                db_host = %db.host,
                db_port = db.port,
                db_user = %db.user,
                db_password = %mask_password(&db.password),
                db_name = %db.name,
                "database settings"
            ),
            None => tracing::info!("running without a database"),
        }
    }
}

fn required(value: Option<&str>, env: &str, flag: &str) -> CliResult<String> {
    match value {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(missing(env, flag)),
    }
}

fn missing(env: &str, flag: &str) -> CliError {
    CliError::config_error(format!(
        "{} is required (use {} or the {} environment variable)",
        env, flag, env
    ))
}

/// Password as shown in logs
pub fn mask_password(password: &str) -> String {
    let chars: Vec<char> = password.chars().collect();
    match chars.len() {
        0 => "(vazia)".to_string(),
        1..=3 => "***".to_string(),
        n => format!("{}{}***{}", chars[0], chars[1], chars[n - 1]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::CliErrorCode;

    fn settings() -> Settings {
        Settings {
            db_host: "localhost".into(),
            db_port: 3306,
            db_user: Some("root".into()),
            db_psw: "secret".into(),
            db_name: Some("loja".into()),
            host: "0.0.0.0".into(),
            port: 8080,
            json_schema: Some(PathBuf::from("schema.json")),
            log_format: LogFormat::Pretty,
        }
    }

    #[test]
    fn test_mask_password() {
        assert_eq!(mask_password(""), "(vazia)");
        assert_eq!(mask_password("abc"), "***");
        assert_eq!(mask_password("secret"), "se***t");
        assert_eq!(mask_password("çãoé"), "çã***é");
    }

    #[test]
    fn test_resolve_with_database() {
        let config = Config::resolve(&settings(), true).unwrap();
        let db = config.database.unwrap();
        assert_eq!(db.name, "loja");
        assert_eq!(db.connection_options().max_connections, 25);
        assert_eq!(config.http.socket_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_missing_database_settings() {
        let mut s = settings();
        s.db_name = None;
        let err = Config::resolve(&s, true).unwrap_err();
        assert_eq!(err.code(), CliErrorCode::ConfigError);
        assert!(err.message().starts_with("DB_NAME"));

        let mut s = settings();
        s.db_user = Some(String::new());
        assert!(Config::resolve(&s, true).unwrap_err().message().starts_with("DB_USER"));

        // Not needed without a database
        assert!(Config::resolve(&s, false).unwrap().database.is_none());
    }

    #[test]
    fn test_schema_path_always_required() {
        let mut s = settings();
        s.json_schema = None;
        let err = Config::resolve(&s, false).unwrap_err();
        assert!(err.message().starts_with("JSON_SCHEMA"));
    }
}
