use anyhow::{Context, Result, bail};
use photobooth::capture::{
    CameraConstraints, CaptureSession, HttpUploader, JpegPassthrough, StillFileSource,
};

/// Camera-less capture client: pushes an existing JPEG through the full
/// capture session against a running photobooth server.
#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "photobooth=info".into()),
        )
        .init();

    let path = match std::env::args().nth(1) {
        Some(path) => path,
        None => bail!("usage: capture <path-to-jpeg>"),
    };
    let endpoint = std::env::var("UPLOAD_ENDPOINT")
        .unwrap_or_else(|_| "http://127.0.0.1:3000/api/upload".to_string());

    let mut session = CaptureSession::new(
        StillFileSource::new(&path),
        JpegPassthrough,
        CameraConstraints::Fixed {
            width: 640,
            height: 480,
        },
    );

    session.start();
    session.capture().context("Failed to capture a frame")?;

    let uploader = HttpUploader::new(&endpoint);
    let receipt = session.upload(&uploader).await.context("Upload failed")?;

    println!("{}", receipt.url);
    Ok(())
}
