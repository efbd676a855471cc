use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use std::sync::Arc;

use crate::api::response::{ApiError, JsonOrForm, RawId};
use crate::storage::models::Item;
use crate::AppState;

/// Body of `POST /search`.
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub id: Option<RawId>,
    /// Checkbox value; only the string `"on"` asks for the photo link.
    /// Any other value, of any JSON type, is ignored.
    #[serde(default, rename = "includePhoto")]
    pub include_photo: Option<serde_json::Value>,
}

impl SearchRequest {
    fn wants_photo(&self) -> bool {
        matches!(self.include_photo, Some(serde_json::Value::String(ref v)) if v == "on")
    }
}

pub async fn search(
    State(state): State<Arc<AppState>>,
    JsonOrForm(req): JsonOrForm<SearchRequest>,
) -> Result<Json<Item>, ApiError> {
    let id = req.id.as_ref().ok_or_else(ApiError::invalid_id)?.parse()?;

    let mut item = state.items.get_by_id(id).await?.ok_or(ApiError::NotFound)?;

    if req.wants_photo() && item.photo.is_some() {
        append_photo_link(&mut item);
    }

    Ok(Json(item))
}

fn append_photo_link(item: &mut Item) {
    let link = format!(" (Photo: /inventory/{}/photo)", item.id);
    let description = item.description.get_or_insert_with(String::new);
    description.push_str(&link);
}
