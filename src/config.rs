use clap::Parser;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Command-line flags. All three are required; clap exits with a usage
/// message when any is missing.
#[derive(Debug, Clone, Parser)]
#[command(name = "inventory-service")]
#[command(about = "Inventory HTTP service", version)]
#[command(disable_help_flag = true)]
pub struct Cli {
    /// Server host
    #[arg(short = 'h', long)]
    pub host: String,

    /// Server port
    #[arg(short, long)]
    pub port: u16,

    /// Cache directory path
    #[arg(short, long)]
    pub cache: String,

    /// Print help
    #[arg(long, action = clap::ArgAction::Help)]
    pub help: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    /// Directory holding uploaded photos
    pub cache_dir: String,
    /// Maximum upload size in bytes
    pub max_upload_size: u64,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Connection settings read from `DB_*` variables. Anything left unset falls
/// back to the driver's defaults.
#[derive(Debug, Clone, Default)]
pub struct DatabaseConfig {
    pub user: Option<String>,
    pub host: Option<String>,
    pub name: Option<String>,
    pub password: Option<String>,
    pub port: Option<u16>,
    pub max_connections: u32,
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Config {
    /// Combine parsed flags with environment variables (and `.env`, if present).
    pub fn load(cli: Cli) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let db_port = match non_empty_var("DB_PORT") {
            Some(raw) => Some(raw.parse::<u16>().map_err(|_| {
                ConfigError::ValidationError(format!("DB_PORT must be a port number, got '{raw}'"))
            })?),
            None => None,
        };

        let max_connections = std::env::var("DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(10);

        let max_upload_size = std::env::var("MAX_UPLOAD_SIZE")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(50 * 1024 * 1024); // 50MB

        let config = Config {
            server: ServerConfig {
                host: cli.host,
                port: cli.port,
            },
            database: DatabaseConfig {
                user: non_empty_var("DB_USER"),
                host: non_empty_var("DB_HOST"),
                name: non_empty_var("DB_NAME"),
                password: non_empty_var("DB_PASSWORD"),
                port: db_port,
                max_connections,
            },
            cache_dir: cli.cache,
            max_upload_size,
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.host.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "host cannot be empty".to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "port must be between 1 and 65535".to_string(),
            ));
        }

        if self.cache_dir.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "cache directory cannot be empty".to_string(),
            ));
        }

        if self.max_upload_size == 0 {
            return Err(ConfigError::ValidationError(
                "MAX_UPLOAD_SIZE must be greater than 0".to_string(),
            ));
        }

        if self.database.max_connections == 0 {
            tracing::warn!("DB_MAX_CONNECTIONS is 0; falling back to a single connection");
        }

        Ok(())
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}
