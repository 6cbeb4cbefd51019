use crate::{
    AppState,
    errors::AppError,
    models::UploadResponse,
    storage::{JPEG_CONTENT_TYPE, new_object_key},
};
use axum::{
    Json,
    extract::{Multipart, State},
};
use std::sync::Arc;
use tracing;

/// Handler for `POST /api/upload`.
///
/// Reads the `file` field of the multipart form, stores the bytes under a
/// fresh `<uuid>.jpg` key, and records the object's public URL. The record is
/// written only once the binary is durably stored; if the insert fails the
/// stored object is deleted again so no orphan remains.
pub async fn upload_photo(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let mut file_data: Option<Vec<u8>> = None;

    while let Some(field) = multipart.next_field().await? {
        let field_name = match field.name() {
            Some(name) => name.to_string(),
            None => continue,
        };
        match field_name.as_str() {
            "file" => file_data = Some(field.bytes().await?.to_vec()),
            _ => tracing::debug!("Ignoring unknown multipart field: {}", field_name),
        }
    }

    let file_data = file_data.ok_or(AppError::MissingFile)?;

    let object_key = new_object_key();
    tracing::debug!(s3_key = %object_key, size_bytes = file_data.len(), "Storing captured photo");

    state
        .storage
        .upload(&object_key, file_data, JPEG_CONTENT_TYPE)
        .await?;

    let url = state.storage.public_url(&object_key).await?;

    match state.photos.create(&url).await {
        Ok(photo) => {
            tracing::info!(photo_id = photo.id, url = %photo.url, "Photo recorded");
            Ok(Json(UploadResponse {
                success: true,
                url: photo.url,
            }))
        }
        Err(e) => {
            // The object has no referencing record; remove it again.
            if let Err(del_err) = state.storage.delete(&object_key).await {
                tracing::warn!(stage = "compensate", s3_key = %object_key, error = ?del_err,
                    "Failed to delete stored object after insert failure");
            }
            Err(AppError::RepositoryError(e))
        }
    }
}
