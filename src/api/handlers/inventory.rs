use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use std::sync::Arc;

use crate::api::response::{ApiError, ItemId, JsonOrDefault, DELETED, UPDATED};
use crate::storage::models::{Item, ItemUpdate};
use crate::AppState;

pub async fn list_items(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Item>>, ApiError> {
    let items = state.items.get_all().await?;
    Ok(Json(items))
}

pub async fn get_item(
    State(state): State<Arc<AppState>>,
    ItemId(id): ItemId,
) -> Result<Json<Item>, ApiError> {
    let item = state.items.get_by_id(id).await?.ok_or(ApiError::NotFound)?;
    Ok(Json(item))
}

pub async fn update_item(
    State(state): State<Arc<AppState>>,
    ItemId(id): ItemId,
    JsonOrDefault(update): JsonOrDefault<ItemUpdate>,
) -> Result<(StatusCode, &'static str), ApiError> {
    if !state.items.update(id, &update).await? {
        return Err(ApiError::NotFound);
    }

    tracing::debug!(item_id = id, "Updated item");
    Ok((StatusCode::OK, UPDATED))
}

pub async fn delete_item(
    State(state): State<Arc<AppState>>,
    ItemId(id): ItemId,
) -> Result<(StatusCode, &'static str), ApiError> {
    // Phase 1: remove the row
    let photo = state.items.delete(id).await?.ok_or(ApiError::NotFound)?;

    // Phase 2: remove its photo (best-effort)
    if let Some(ref stored) = photo {
        if let Err(e) = state.files.remove(stored).await {
            tracing::warn!(item_id = id, stored_name = %stored, error = %e, "Failed to remove photo");
        }
    }

    tracing::debug!(item_id = id, "Deleted item");
    Ok((StatusCode::OK, DELETED))
}
