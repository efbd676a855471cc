use axum::extract::State;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

use crate::api::response::{ApiError, ItemId};
use crate::file_store::FileStoreError;
use crate::AppState;

/// Serve the stored photo of an item.
/// Route: GET /inventory/:id/photo
pub async fn get_photo(
    State(state): State<Arc<AppState>>,
    ItemId(id): ItemId,
) -> Result<Response, ApiError> {
    let stored = state
        .items
        .get_photo_name(id)
        .await?
        .ok_or(ApiError::NotFound)?;

    let data = state.files.retrieve(&stored).await.map_err(|e| match e {
        FileStoreError::NotFound(_) | FileStoreError::InvalidName(_) => {
            tracing::warn!(item_id = id, stored_name = %stored, "Photo referenced by item is missing");
            ApiError::NotFound
        }
        _ => ApiError::internal(format!("Failed to read photo: {e}")),
    })?;

    let content_type = mime_guess::from_path(&stored)
        .first()
        .and_then(|m| HeaderValue::from_str(m.as_ref()).ok())
        .unwrap_or(HeaderValue::from_static("application/octet-stream"));

    let mut response = (StatusCode::OK, data).into_response();
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, content_type);
    if let Ok(value) = format!("inline; filename=\"{stored}\"").parse() {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }

    Ok(response)
}
