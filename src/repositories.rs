use crate::{domain::PhotoRepository, errors::RepoError, models::Photo};
use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{self, info};

#[derive(Debug, Clone)]
pub struct PgPhotoRepository {
    pool: PgPool,
}

impl PgPhotoRepository {
    /// Creates a new repository instance over an existing connection pool.
    ///
    /// The pool is constructed once at startup and passed in; the repository
    /// never reaches for an ambient handle.
    pub fn new(pool: PgPool) -> Self {
        info!("Initializing PgPhotoRepository");
        Self { pool }
    }
}

#[async_trait]
impl PhotoRepository for PgPhotoRepository {
    /// Inserts one photo row and returns it with its assigned id.
    async fn create(&self, url: &str) -> Result<Photo, RepoError> {
        let photo =
            sqlx::query_as::<_, Photo>("INSERT INTO photos (url) VALUES ($1) RETURNING id, url")
                .bind(url)
                .fetch_one(&self.pool)
                .await
                .context(format!("Postgres: failed to insert photo record for '{}'", url))
                .map_err(RepoError::BackendError)?;

        tracing::debug!(photo_id = photo.id, "Postgres: photo record inserted");
        Ok(photo)
    }
}
