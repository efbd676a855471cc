pub mod db;
mod items;
pub mod models;

pub use db::{create_pool, DatabaseError};
pub use items::{ItemRepository, PgItemRepository};
