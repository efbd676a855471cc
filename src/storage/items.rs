use async_trait::async_trait;
use sqlx::PgPool;

use super::db::DatabaseError;
use super::models::{Item, ItemUpdate, NewItem};

const ITEM_COLUMNS: &str = "id::int8 AS id, name, description, photo";

/// Persistence for inventory items. Each method issues a single statement.
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// Insert a row and return its generated id.
    async fn create(&self, item: &NewItem) -> Result<i64, DatabaseError>;

    async fn get_all(&self) -> Result<Vec<Item>, DatabaseError>;

    async fn get_by_id(&self, id: i64) -> Result<Option<Item>, DatabaseError>;

    /// Returns `false` when no row has this id.
    async fn update(&self, id: i64, update: &ItemUpdate) -> Result<bool, DatabaseError>;

    /// Remove a row. `None` when no row has this id, otherwise the stored
    /// photo name the row held.
    async fn delete(&self, id: i64) -> Result<Option<Option<String>>, DatabaseError>;

    /// `None` when the row is missing or has no photo.
    async fn get_photo_name(&self, id: i64) -> Result<Option<String>, DatabaseError>;
}

/// `ItemRepository` over the shared Postgres pool.
#[derive(Clone)]
pub struct PgItemRepository {
    pool: PgPool,
}

impl PgItemRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ItemRepository for PgItemRepository {
    async fn create(&self, item: &NewItem) -> Result<i64, DatabaseError> {
        debug_assert!(!item.name.is_empty(), "item name must not be empty");

        let id: i64 = sqlx::query_scalar(
            "INSERT INTO items (name, description, photo) VALUES ($1, $2, $3) RETURNING id::int8",
        )
        .bind(&item.name)
        .bind(item.description.as_deref())
        .bind(item.photo.as_deref())
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn get_all(&self) -> Result<Vec<Item>, DatabaseError> {
        let items = sqlx::query_as::<_, Item>(&format!(
            "SELECT {ITEM_COLUMNS} FROM items ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Item>, DatabaseError> {
        let item = sqlx::query_as::<_, Item>(&format!(
            "SELECT {ITEM_COLUMNS} FROM items WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    async fn update(&self, id: i64, update: &ItemUpdate) -> Result<bool, DatabaseError> {
        // Existence is judged by the update itself so a concurrent delete
        // cannot slip between a lookup and the write.
        let rows_affected = sqlx::query(
            "UPDATE items SET name = COALESCE($1, name), description = COALESCE($2, description) \
             WHERE id = $3",
        )
        .bind(update.name.as_deref())
        .bind(update.description.as_deref())
        .bind(id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(rows_affected > 0)
    }

    async fn delete(&self, id: i64) -> Result<Option<Option<String>>, DatabaseError> {
        let photo: Option<Option<String>> =
            sqlx::query_scalar("DELETE FROM items WHERE id = $1 RETURNING photo")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(photo)
    }

    async fn get_photo_name(&self, id: i64) -> Result<Option<String>, DatabaseError> {
        let photo: Option<Option<String>> =
            sqlx::query_scalar("SELECT photo FROM items WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(photo.flatten().filter(|name| !name.is_empty()))
    }
}
