use super::error::UploadError;
use crate::{AppState, admin};
use axum::{
    body::Body,
    extract::{Multipart, Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use std::time::UNIX_EPOCH;
use tokio::fs::File;
use tokio_util::io::ReaderStream;
use tracing::{debug, error};

/// Served when a stored image reference cannot be resolved, so a stale or
/// broken `image` field degrades to a placeholder instead of a broken-image
/// state.
const PLACEHOLDER_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="800" height="450" viewBox="0 0 800 450"><rect width="800" height="450" fill="#e9ecef"/><path d="M330 165h140a10 10 0 0 1 10 10v100a10 10 0 0 1-10 10H330a10 10 0 0 1-10-10V175a10 10 0 0 1 10-10zm10 95 35-40 25 28 20-22 40 44z" fill="#adb5bd"/><circle cx="365" cy="200" r="12" fill="#adb5bd"/></svg>"##;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub success: bool,
    pub image_url: String,
}

/// Accepts a multipart `image` field, validates it, and stores it under a
/// stable relative URL. Admin-gated: attachments exist only for the admin
/// editor.
pub async fn upload_image_handler(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, admin::AdminError> {
    let email = admin::require_admin(&headers, &app_state).await?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(UploadError::Multipart)?
    {
        if field.name() != Some("image") {
            continue;
        }

        let content_type = field
            .content_type()
            .map(str::to_string)
            .ok_or_else(|| UploadError::UnsupportedMediaType("unknown".to_string()))?;

        // Reject on the declared type before buffering the payload
        if !content_type.starts_with("image/") {
            return Err(UploadError::UnsupportedMediaType(content_type).into());
        }

        let bytes = field.bytes().await.map_err(UploadError::Multipart)?;
        let stored = app_state.images.store(&content_type, &bytes).await?;

        debug!("Admin {} uploaded image {}", email, stored.url);
        return Ok(Json(UploadResponse {
            success: true,
            image_url: stored.url,
        }));
    }

    Err(UploadError::MissingImage.into())
}

/// Streams a stored image. Unresolvable paths fall back to the placeholder
/// rather than a 404.
pub async fn serve_image_handler(
    State(app_state): State<AppState>,
    Path(path): Path<String>,
) -> Response {
    let file_path = match app_state.images.resolve(&path).await {
        Some(file_path) => file_path,
        None => return placeholder_response(),
    };

    let metadata = match tokio::fs::metadata(&file_path).await {
        Ok(metadata) => metadata,
        Err(e) => {
            debug!("Failed to stat image {:?}: {}", file_path, e);
            return placeholder_response();
        }
    };

    let file = match File::open(&file_path).await {
        Ok(file) => file,
        Err(e) => {
            error!("Failed to open image {:?}: {}", file_path, e);
            return placeholder_response();
        }
    };

    let content_type = mime_guess::from_path(&file_path)
        .first_or_octet_stream()
        .to_string();

    let mut response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CACHE_CONTROL, "public, max-age=31536000");

    if let Ok(modified) = metadata.modified()
        && let Ok(duration) = modified.duration_since(UNIX_EPOCH)
    {
        response = response
            .header(header::LAST_MODIFIED, httpdate::fmt_http_date(modified))
            .header(
                header::ETAG,
                format!("\"{}-{}\"", duration.as_secs(), metadata.len()),
            );
    }

    let body = Body::from_stream(ReaderStream::new(file));
    response.body(body).unwrap()
}

fn placeholder_response() -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "image/svg+xml"),
            (header::CACHE_CONTROL, "no-store"),
        ],
        PLACEHOLDER_SVG,
    )
        .into_response()
}
