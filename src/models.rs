use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A recorded upload: one row per photo that made it into the bucket.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Photo {
    pub id: i64,
    pub url: String,
}

/// Success payload returned by `POST /api/upload`.
#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub success: bool,
    pub url: String,
}
