use async_trait::async_trait;
use serde::Deserialize;
use tracing;

use super::CaptureError;

/// Receipt returned by the upload endpoint for a stored capture.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadReceipt {
    pub url: String,
}

/// The HTTP leg of the capture flow, abstracted for testing.
#[async_trait]
pub trait UploadTransport: Send + Sync {
    /// Submits one JPEG blob. Implementations issue at most one request per
    /// call; retrying is the caller's decision.
    async fn send(&self, jpeg: &[u8]) -> Result<UploadReceipt, CaptureError>;
}

/// Response body of `POST /api/upload`.
#[derive(Debug, Deserialize)]
struct UploadResponseBody {
    success: bool,
    #[serde(default)]
    url: Option<String>,
}

/// Uploads captures to the photobooth endpoint as multipart form data.
#[derive(Debug, Clone)]
pub struct HttpUploader {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpUploader {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl UploadTransport for HttpUploader {
    async fn send(&self, jpeg: &[u8]) -> Result<UploadReceipt, CaptureError> {
        let part = reqwest::multipart::Part::bytes(jpeg.to_vec())
            .file_name("capture.jpg")
            .mime_str("image/jpeg")?;
        let form = reqwest::multipart::Form::new().part("file", part);

        tracing::debug!(endpoint = %self.endpoint, size_bytes = jpeg.len(), "Submitting capture");

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CaptureError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let body: UploadResponseBody = response.json().await?;
        match body.url {
            Some(url) if body.success => Ok(UploadReceipt { url }),
            _ => Err(CaptureError::Rejected {
                status: status.as_u16(),
                body: "response carried no upload URL".to_string(),
            }),
        }
    }
}
