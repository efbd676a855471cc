use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use std::sync::Arc;

use crate::api::response::{ApiError, CREATED};
use crate::storage::models::NewItem;
use crate::AppState;

/// Fields of the registration form. Every field is optional on the wire;
/// only `inventory_name` is required to register.
#[derive(Debug, Default)]
struct RegisterForm {
    inventory_name: Option<String>,
    description: Option<String>,
    photo: Option<UploadedPhoto>,
}

#[derive(Debug)]
struct UploadedPhoto {
    file_name: String,
    data: Bytes,
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let form = read_form(multipart, state.config.max_upload_size).await?;

    let name = form
        .inventory_name
        .filter(|n| !n.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("inventory_name is required"))?;

    // Phase 1: write the photo to the cache directory
    let photo = match form.photo {
        Some(upload) => Some(
            state
                .files
                .store(upload.data, &upload.file_name)
                .await
                .map_err(|e| ApiError::internal(format!("Failed to store photo: {e}")))?,
        ),
        None => None,
    };

    // Phase 2: insert the row
    let new_item = NewItem {
        name,
        description: form.description,
        photo: photo.clone(),
    };
    let id = match state.items.create(&new_item).await {
        Ok(id) => id,
        Err(e) => {
            if let Some(ref stored) = photo {
                if let Err(cleanup) = state.files.remove(stored).await {
                    tracing::warn!(stored_name = %stored, error = %cleanup, "Failed to remove orphaned photo");
                }
            }
            return Err(ApiError::internal(e));
        }
    };

    tracing::debug!(item_id = id, photo = ?photo, "Registered item");

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/inventory/{id}"))],
        CREATED,
    )
        .into_response())
}

async fn read_form(mut multipart: Multipart, max_upload_size: u64) -> Result<RegisterForm, ApiError> {
    let mut form = RegisterForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "inventory_name" => {
                form.inventory_name = Some(field.text().await.map_err(multipart_error)?);
            }
            "description" => {
                form.description = Some(field.text().await.map_err(multipart_error)?);
            }
            "photo" => {
                let file_name = field.file_name().unwrap_or("").to_string();
                let data = field.bytes().await.map_err(multipart_error)?;

                if data.len() as u64 > max_upload_size {
                    return Err(ApiError::PayloadTooLarge);
                }

                // Browsers send an empty part when no file was chosen
                if file_name.is_empty() && data.is_empty() {
                    continue;
                }

                form.photo = Some(UploadedPhoto { file_name, data });
            }
            _ => {
                // Ignore unknown fields
            }
        }
    }

    Ok(form)
}

fn multipart_error(e: MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge
    } else {
        ApiError::bad_request(format!("invalid multipart data: {}", e.body_text()))
    }
}
