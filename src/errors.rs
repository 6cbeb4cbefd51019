use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

// --- Domain/Infrastructure Errors ---

#[derive(Error, Debug)]
pub enum RepoError {
    #[error("Database backend error: {0}")]
    BackendError(#[from] anyhow::Error),
}

#[derive(Error, Debug)]
pub enum StorageError {
    // Carries the provider's own message; it is surfaced verbatim to the
    // caller on a failed write
    #[error("{0}")]
    UploadFailed(String),

    #[error("No public URL available for object '{0}'")]
    PublicUrlUnavailable(String),

    #[error("Storage backend error: {0}")]
    BackendError(#[from] anyhow::Error),
}

// --- Web Layer Error ---

#[derive(Error, Debug)]
pub enum AppError {
    // Client input errors
    #[error("Upload form contained no file field")]
    MissingFile,
    #[error("Error processing multipart form data: {0}")]
    MultipartError(#[from] axum::extract::multipart::MultipartError),

    // Pipeline-stage errors (mapped from StorageError/RepoError)
    #[error("Could not perform file storage operation")]
    StorageError(#[source] StorageError),
    #[error("Could not save photo record")]
    RepositoryError(#[source] RepoError),

    // Configuration / Startup errors
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Initialization error: {0}")]
    InitError(String),

    #[error("Internal server error: {0}")]
    InternalServerError(String),
}

// --- Conversions from Domain Errors to AppError ---

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        AppError::StorageError(err)
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        AppError::RepositoryError(err)
    }
}

impl From<crate::config::ConfigError> for AppError {
    fn from(err: crate::config::ConfigError) -> Self {
        AppError::ConfigError(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalServerError(format!("IO error: {}", err))
    }
}

// --- Axum Response Implementation ---
//
// Response bodies follow the upload contract: a missing file answers
// `{"success": false}`, a failed storage write exposes the provider message,
// everything else collapses into a generic internal error.

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            // 4xx Client Errors
            AppError::MissingFile => {
                tracing::error!(stage = "parse", "Upload request carried no file field");
                (StatusCode::BAD_REQUEST, serde_json::json!({ "success": false }))
            }
            AppError::MultipartError(e) => {
                tracing::error!(stage = "parse", error = %e, "Failed to read multipart form data");
                (StatusCode::BAD_REQUEST, serde_json::json!({ "success": false }))
            }

            // 5xx Server Errors
            AppError::StorageError(e) => {
                let stage = match e {
                    StorageError::PublicUrlUnavailable(_) => "public_url",
                    _ => "storage",
                };
                tracing::error!(stage = stage, error.source = ?e, "Storage operation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    serde_json::json!({ "error": e.to_string() }),
                )
            }
            AppError::RepositoryError(e) => {
                tracing::error!(stage = "database", error.source = ?e, "Photo record insert failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    serde_json::json!({ "error": "Internal server error" }),
                )
            }
            AppError::ConfigError(msg)
            | AppError::InitError(msg)
            | AppError::InternalServerError(msg) => {
                tracing::error!(error = %msg, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    serde_json::json!({ "error": "Internal server error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
