//! inventory-service - A small HTTP service for registering and looking up inventory items
//!
//! This crate provides:
//! - CRUD over a Postgres `items` table (sqlx connection pool)
//! - Photo uploads kept in a local cache directory
//! - Search with an optional photo link, HTML forms and bundled API docs

pub mod api;
pub mod config;
pub mod file_store;
pub mod storage;
#[cfg(test)]
pub mod testutil;

use std::sync::Arc;

use config::Config;
use file_store::FileStore;
use storage::ItemRepository;

/// Shared application state
pub struct AppState {
    pub config: Config,
    pub items: Arc<dyn ItemRepository>,
    pub files: Arc<dyn FileStore>,
}
