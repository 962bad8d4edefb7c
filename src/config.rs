use anyhow::{bail, Result};
use std::path::PathBuf;
use std::str::FromStr;

/// When the `quote_requests` schema is provisioned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaMode {
    /// Once, before the server starts accepting requests.
    Startup,
    /// Before every insert, on the request's own connection.
    PerRequest,
}

impl FromStr for SchemaMode {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "startup" => Ok(SchemaMode::Startup),
            "per-request" | "per_request" | "request" => Ok(SchemaMode::PerRequest),
            other => bail!("Unknown SCHEMA_MODE '{}'. Expected 'startup' or 'per-request'", other),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub user: String,
    pub password: String,
    pub name: String,
    pub port: u16,
    pub charset: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    // MySQL
    pub database: DatabaseConfig,
    pub schema_mode: SchemaMode,

    // HTTP server
    pub host: String,
    pub port: u16,

    // Append-only audit trail of storage outcomes
    pub submission_log_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let config = Self {
            database: DatabaseConfig {
                host: std::env::var("DB_HOST").unwrap_or_else(|_| "localhost".to_string()),
                user: std::env::var("DB_USER").unwrap_or_else(|_| "root".to_string()),
                password: std::env::var("DB_PASS").unwrap_or_default(),
                name: std::env::var("DB_NAME").unwrap_or_else(|_| "three_x".to_string()),
                port: std::env::var("DB_PORT")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(3306),
                charset: std::env::var("DB_CHARSET").unwrap_or_else(|_| "utf8mb4".to_string()),
            },
            schema_mode: match std::env::var("SCHEMA_MODE") {
                Ok(value) => value.parse()?,
                Err(_) => SchemaMode::Startup,
            },

            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),

            submission_log_path: std::env::var("SUBMISSION_LOG_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("storage/quote_requests.log")),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.database.name.trim().is_empty() {
            bail!("DB_NAME cannot be empty");
        }
        if self.database.port == 0 {
            bail!("DB_PORT must be greater than 0");
        }
        // The charset is spliced into CREATE DATABASE, so it must be a bare identifier
        if self.database.charset.is_empty()
            || !self
                .database
                .charset
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            bail!("DB_CHARSET '{}' is not a valid character set name", self.database.charset);
        }
        Ok(())
    }
}
