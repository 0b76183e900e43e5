use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("image exceeds the maximum size of {max} bytes")]
    PayloadTooLarge { size: usize, max: usize },

    #[error("unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("request is missing an image field")]
    MissingImage,

    #[error("malformed upload request: {0}")]
    Multipart(#[from] axum::extract::multipart::MultipartError),

    #[error("upload failed: {0}")]
    IoError(#[from] std::io::Error),
}

impl UploadError {
    pub fn status(&self) -> StatusCode {
        match self {
            UploadError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            UploadError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            UploadError::MissingImage | UploadError::Multipart(_) => StatusCode::BAD_REQUEST,
            UploadError::IoError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "success": false,
            "message": self.to_string(),
        });
        (self.status(), Json(body)).into_response()
    }
}
