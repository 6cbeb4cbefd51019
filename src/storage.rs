use crate::{config::Config, domain::ObjectStorage, errors::StorageError};
use async_trait::async_trait;
use aws_sdk_s3::{Client as S3Client, primitives::ByteStream};
use tracing;
use uuid::Uuid;

/// Content type declared on every stored capture.
pub const JPEG_CONTENT_TYPE: &str = "image/jpeg";

/// Generates a fresh object key for an uploaded capture.
///
/// Uniqueness rests on the UUID; a collision is treated as impossible.
pub fn new_object_key() -> String {
    format!("{}.jpg", Uuid::new_v4())
}

/// How public object URLs are derived for the bucket.
#[derive(Debug, Clone)]
enum PublicUrlStyle {
    /// Explicitly configured prefix: `<base>/<key>`.
    BaseUrl(String),
    /// Path-style against a custom endpoint: `<endpoint>/<bucket>/<key>`.
    Endpoint(String),
    /// Virtual-hosted AWS form: `https://<bucket>.s3.<region>.amazonaws.com/<key>`.
    VirtualHosted { region: String },
}

impl PublicUrlStyle {
    fn from_config(config: &Config) -> Self {
        if let Some(base) = &config.public_base_url {
            PublicUrlStyle::BaseUrl(base.trim_end_matches('/').to_string())
        } else if let Some(endpoint) = &config.storage_endpoint {
            PublicUrlStyle::Endpoint(endpoint.trim_end_matches('/').to_string())
        } else {
            PublicUrlStyle::VirtualHosted {
                region: config.aws_region.clone(),
            }
        }
    }

    fn render(&self, bucket: &str, key: &str) -> String {
        match self {
            PublicUrlStyle::BaseUrl(base) => format!("{}/{}", base, key),
            PublicUrlStyle::Endpoint(endpoint) => format!("{}/{}/{}", endpoint, bucket, key),
            PublicUrlStyle::VirtualHosted { region } => {
                format!("https://{}.s3.{}.amazonaws.com/{}", bucket, region, key)
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct S3ObjectStorage {
    client: S3Client,
    bucket_name: String,
    url_style: PublicUrlStyle,
}

impl S3ObjectStorage {
    pub fn new(client: S3Client, config: &Config) -> Self {
        Self {
            client,
            bucket_name: config.photo_bucket_name.clone(),
            url_style: PublicUrlStyle::from_config(config),
        }
    }
}

#[async_trait]
impl ObjectStorage for S3ObjectStorage {
    /// Uploads data to S3 using PutObject. Sets Content-Type.
    async fn upload(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        tracing::debug!(s3_key = %key, bucket = %self.bucket_name, content_type = %content_type, "S3: Uploading object");

        let body = ByteStream::from(data);
        self.client
            .put_object()
            .bucket(&self.bucket_name)
            .key(key)
            .body(body)
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| StorageError::UploadFailed(e.to_string()))?;

        tracing::debug!(s3_key = %key, bucket = %self.bucket_name, "S3: Upload successful");
        Ok(())
    }

    /// Resolves the object's public URL from the configured addressing style.
    async fn public_url(&self, key: &str) -> Result<String, StorageError> {
        if key.is_empty() {
            return Err(StorageError::PublicUrlUnavailable(key.to_string()));
        }
        Ok(self.url_style.render(&self.bucket_name, key))
    }

    /// Deletes an object from S3 using DeleteObject.
    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        tracing::debug!(s3_key = %key, bucket = %self.bucket_name, "S3: Deleting object");

        self.client
            .delete_object()
            .bucket(&self.bucket_name)
            .key(key)
            .send()
            .await
            .map_err(|sdk_err| {
                tracing::error!(s3_key = %key, bucket = %self.bucket_name, error = %sdk_err, "S3: Error deleting object");
                StorageError::BackendError(anyhow::Error::new(sdk_err).context(format!(
                    "S3: Failed to delete object with key '{}'",
                    key
                )))
            })?;

        tracing::debug!(s3_key = %key, bucket = %self.bucket_name, "S3: Delete request successful");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(
        storage_endpoint: Option<&str>,
        public_base_url: Option<&str>,
    ) -> Config {
        Config {
            bind_address: "127.0.0.1:3000".parse().unwrap(),
            database_url: "postgres://localhost/photobooth".to_string(),
            photo_bucket_name: "photos".to_string(),
            aws_region: "us-east-1".to_string(),
            storage_endpoint: storage_endpoint.map(String::from),
            public_base_url: public_base_url.map(String::from),
            static_dir: "static".to_string(),
        }
    }

    #[test]
    fn object_keys_are_distinct_and_jpg_suffixed() {
        let keys: Vec<String> = (0..64).map(|_| new_object_key()).collect();
        for (i, key) in keys.iter().enumerate() {
            assert!(key.ends_with(".jpg"), "key {} lacks .jpg suffix", key);
            for other in &keys[i + 1..] {
                assert_ne!(key, other);
            }
        }
    }

    #[test]
    fn public_url_prefers_explicit_base() {
        let style = PublicUrlStyle::from_config(&test_config(
            Some("http://localhost:9000"),
            Some("https://cdn.example.com/photos/"),
        ));
        assert_eq!(
            style.render("photos", "abc.jpg"),
            "https://cdn.example.com/photos/abc.jpg"
        );
    }

    #[test]
    fn public_url_uses_path_style_for_endpoint_override() {
        let style = PublicUrlStyle::from_config(&test_config(Some("http://localhost:9000/"), None));
        assert_eq!(
            style.render("photos", "abc.jpg"),
            "http://localhost:9000/photos/abc.jpg"
        );
    }

    #[test]
    fn public_url_defaults_to_virtual_hosted_form() {
        let style = PublicUrlStyle::from_config(&test_config(None, None));
        assert_eq!(
            style.render("photos", "abc.jpg"),
            "https://photos.s3.us-east-1.amazonaws.com/abc.jpg"
        );
    }
}
