use crate::{store::StoreError, uploads::UploadError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdminError {
    #[error("administrator session required")]
    Unauthorized,

    #[error("confirmation required for destructive operation")]
    ConfirmationRequired,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Upload(#[from] UploadError),
}

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        let status = match &self {
            AdminError::Unauthorized => StatusCode::UNAUTHORIZED,
            AdminError::ConfirmationRequired => StatusCode::BAD_REQUEST,
            AdminError::Store(StoreError::Validation(_)) => StatusCode::BAD_REQUEST,
            AdminError::Store(StoreError::NotFound(_)) => StatusCode::NOT_FOUND,
            AdminError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AdminError::Upload(upload) => upload.status(),
        };

        let body = serde_json::json!({
            "success": false,
            "message": self.to_string(),
        });
        (status, Json(body)).into_response()
    }
}
