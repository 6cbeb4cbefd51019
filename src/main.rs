use std::sync::Arc;
use std::time::Duration;

use photobooth::AppState;
use photobooth::aws_clients::{create_s3_client, create_sdk_config};
use photobooth::config::Config;
use photobooth::errors::AppError;
use photobooth::repositories::PgPhotoRepository;
use photobooth::routes::create_router;
use photobooth::startup::init_resources;
use photobooth::storage::S3ObjectStorage;

use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Initialize tracing (logging)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "photobooth=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load()?;

    tracing::info!("Initializing S3 client...");
    let sdk_config = create_sdk_config(&config).await;
    let s3_client = create_s3_client(&sdk_config);

    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(30))
        .connect(&config.database_url)
        .await
        .map_err(|e| AppError::InitError(format!("Failed to connect to Postgres: {}", e)))?;
    tracing::info!("Database connection established");

    init_resources(&pool, &s3_client, &config.photo_bucket_name, &config.aws_region).await?;

    // --- Application State ---
    let state = Arc::new(AppState {
        storage: Arc::new(S3ObjectStorage::new(s3_client, &config)),
        photos: Arc::new(PgPhotoRepository::new(pool.clone())),
    });

    let app = create_router(state, &config.static_dir);

    // --- Server Startup ---
    tracing::info!("Server listening on http://{}", config.bind_address);
    let listener = tokio::net::TcpListener::bind(config.bind_address).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // The pool has process-scoped lifetime: close it once the server is done.
    pool.close().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
