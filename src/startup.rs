use crate::errors::AppError;
use aws_sdk_s3::{
    Client as S3Client,
    error::SdkError as S3SdkError,
    types::{BucketLocationConstraint, CreateBucketConfiguration},
};
use sqlx::PgPool;
use tracing;

/// Creates the photos table if it doesn't exist.
async fn ensure_photos_table(pool: &PgPool) -> Result<(), AppError> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS photos (
            id BIGSERIAL PRIMARY KEY,
            url TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await
    .map_err(|e| AppError::InitError(format!("Startup: failed to create photos table: {}", e)))?;

    tracing::info!("Startup: photos table ready.");
    Ok(())
}

/// Ensures the S3 bucket exists, creating it with the correct location constraint if needed.
async fn ensure_photo_bucket_exists(
    client: &S3Client,
    bucket_name: &str,
    region_str: &str,
) -> Result<(), AppError> {
    let bucket_config = if region_str != "us-east-1" {
        Some(
            CreateBucketConfiguration::builder()
                .location_constraint(BucketLocationConstraint::from(region_str))
                .build(),
        )
    } else {
        None
    };

    let mut create_bucket_req_builder = client.create_bucket().bucket(bucket_name);
    if let Some(config) = bucket_config {
        create_bucket_req_builder = create_bucket_req_builder.create_bucket_configuration(config);
    }

    match create_bucket_req_builder.send().await {
        Ok(_) => {
            tracing::info!("Startup: S3 bucket '{}' created.", bucket_name);
            Ok(())
        }
        Err(sdk_err) => {
            if let S3SdkError::ServiceError(service_err) = &sdk_err {
                let code = service_err.err().meta().code();
                if code == Some("BucketAlreadyOwnedByYou") || code == Some("BucketAlreadyExists") {
                    tracing::info!("Startup: S3 bucket '{}' already exists.", bucket_name);
                    return Ok(());
                }
            }
            let context = format!("Startup: failed to create S3 bucket '{}'", bucket_name);
            tracing::error!("{}: {}", context, sdk_err);
            Err(AppError::InitError(format!("{}: {}", context, sdk_err)))
        }
    }
}

/// Initializes backing resources (photos table, S3 bucket).
pub async fn init_resources(
    pool: &PgPool,
    s3_client: &S3Client,
    bucket_name: &str,
    region_str: &str,
) -> Result<(), AppError> {
    tracing::info!("Startup: initializing backing resources...");
    ensure_photos_table(pool).await?;
    ensure_photo_bucket_exists(s3_client, bucket_name, region_str).await?;
    tracing::info!("Startup: resource initialization complete.");
    Ok(())
}
