use std::{env, net::SocketAddr, str::FromStr};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVar(String),
    #[error("Invalid environment variable format for {0}: {1}")]
    InvalidVar(String, String),
    #[error(transparent)]
    DotEnvError(#[from] dotenvy::Error),
}

#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub database_url: String,
    pub photo_bucket_name: String,
    // Store region as string for simplicity here, aws_clients can convert
    pub aws_region: String,
    // Optional endpoint for MinIO/LocalStack style deployments
    pub storage_endpoint: Option<String>,
    // Explicit base for public object URLs; derived from the endpoint or
    // region when absent
    pub public_base_url: Option<String>,
    pub static_dir: String,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (ignores errors, relies on env vars otherwise)
        dotenvy::dotenv().ok();

        let bind_address_str =
            env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let bind_address = SocketAddr::from_str(&bind_address_str)
            .map_err(|e| ConfigError::InvalidVar("BIND_ADDRESS".into(), e.to_string()))?;

        let database_url =
            env::var("DATABASE_URL").map_err(|_| ConfigError::MissingVar("DATABASE_URL".into()))?;

        let photo_bucket_name = env::var("PHOTO_BUCKET_NAME")
            .map_err(|_| ConfigError::MissingVar("PHOTO_BUCKET_NAME".into()))?;

        let aws_region =
            env::var("AWS_DEFAULT_REGION").unwrap_or_else(|_| "us-east-1".to_string());

        let storage_endpoint = env::var("AWS_ENDPOINT_URL").ok();

        let public_base_url = env::var("PUBLIC_BASE_URL").ok();

        let static_dir = env::var("STATIC_DIR").unwrap_or_else(|_| "static".to_string());

        Ok(Config {
            bind_address,
            database_url,
            photo_bucket_name,
            aws_region,
            storage_endpoint,
            public_base_url,
            static_dir,
        })
    }
}
