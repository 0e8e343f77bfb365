//! Image upload route.

use axum::{
    Json,
    extract::{
        Multipart, State,
        multipart::MultipartRejection,
    },
    http::StatusCode,
};
use serde_json::{Value, json};

use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::services::media::{self, MediaError};
use crate::state::AppState;

/// Multipart field carrying the file.
pub const IMAGE_FIELD: &str = "image";

/// POST /api/images/upload
///
/// Accepts one `image` field and returns the URL it is served from.
pub async fn upload(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<Value>)> {
    let mut multipart = multipart.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let mut upload = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_owned();
        let bytes = field.bytes().await?;
        upload = Some((file_name, bytes));
        break;
    }

    let (file_name, bytes) = upload.ok_or(MediaError::MissingFile)?;
    let stored = media::store_image(&state.config().upload_dir, &file_name, &bytes).await?;
    tracing::info!(user_id = %user.id, url = %stored.url, "Image uploaded");

    Ok((StatusCode::CREATED, Json(json!({ "url": stored.url }))))
}
