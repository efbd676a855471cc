use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;
use std::time::Duration;
use thiserror::Error;

use crate::config::DatabaseConfig;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

/// Build the connection pool without opening a connection.
///
/// Connections are established on first use, so a missing or unreachable
/// database shows up as a failed query instead of a startup error.
pub fn create_pool(config: &DatabaseConfig) -> PgPool {
    PgPoolOptions::new()
        .max_connections(config.max_connections.max(1))
        .acquire_timeout(Duration::from_secs(30))
        .connect_lazy_with(connect_options(config))
}

fn connect_options(config: &DatabaseConfig) -> PgConnectOptions {
    // Starts from the PG* environment defaults; DB_* values take precedence.
    let mut options = PgConnectOptions::new();
    if let Some(ref host) = config.host {
        options = options.host(host);
    }
    if let Some(port) = config.port {
        options = options.port(port);
    }
    if let Some(ref user) = config.user {
        options = options.username(user);
    }
    if let Some(ref password) = config.password {
        options = options.password(password);
    }
    if let Some(ref name) = config.name {
        options = options.database(name);
    }
    options
}
