use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use tracing;

use super::CaptureError;
use super::frame::{CameraConstraints, FrameEncoder, FrameSource};
use super::uploader::{UploadReceipt, UploadTransport};

/// Phases of one capture cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapturePhase {
    /// Live preview; the stream is bound (or failed to bind and stays dark).
    Streaming,
    /// A frame has been captured and awaits confirmation.
    Captured,
    /// The confirmed blob is being sent. Further confirmations are blocked.
    Uploading,
    /// The upload succeeded; terminal for this cycle.
    Done,
}

struct CapturedShot {
    jpeg: Vec<u8>,
    preview_uri: String,
}

/// Drives the capture → preview → upload flow over a frame source and an
/// encoder.
///
/// Transitions: `Streaming` --capture--> `Captured` --upload--> `Done`, with
/// a failed upload falling back to `Captured` and `retake` restarting the
/// cycle. `upload` takes the session exclusively, so a second confirmation
/// cannot race one already in flight.
pub struct CaptureSession<S, E> {
    source: S,
    encoder: E,
    constraints: CameraConstraints,
    phase: CapturePhase,
    shot: Option<CapturedShot>,
    receipt: Option<UploadReceipt>,
}

impl<S: FrameSource, E: FrameEncoder> CaptureSession<S, E> {
    pub fn new(source: S, encoder: E, constraints: CameraConstraints) -> Self {
        Self {
            source,
            encoder,
            constraints,
            phase: CapturePhase::Streaming,
            shot: None,
            receipt: None,
        }
    }

    pub fn phase(&self) -> CapturePhase {
        self.phase
    }

    /// Whether the underlying stream is currently bound.
    pub fn streaming(&self) -> bool {
        self.source.is_open()
    }

    /// The local preview of the captured frame, as a `data:image/jpeg` URI.
    pub fn preview_uri(&self) -> Option<&str> {
        self.shot.as_ref().map(|s| s.preview_uri.as_str())
    }

    /// The URL recorded by a completed upload.
    pub fn recorded_url(&self) -> Option<&str> {
        self.receipt.as_ref().map(|r| r.url.as_str())
    }

    /// Requests the stream. An open failure is logged and leaves the session
    /// stream-less; there is no recovery action beyond `retake`.
    pub fn start(&mut self) {
        if let Err(e) = self.source.open(&self.constraints) {
            tracing::error!(error = %e, "Error accessing camera source");
        }
    }

    /// Grabs the current frame, encodes it to JPEG and holds the blob in
    /// memory together with a preview URI. Only valid while streaming.
    pub fn capture(&mut self) -> Result<(), CaptureError> {
        if self.phase != CapturePhase::Streaming {
            return Err(CaptureError::NotStreaming);
        }
        let frame = self.source.grab()?;
        let jpeg = self.encoder.encode(&frame)?;
        let preview_uri = format!("data:image/jpeg;base64,{}", BASE64.encode(&jpeg));
        self.shot = Some(CapturedShot { jpeg, preview_uri });
        self.phase = CapturePhase::Captured;
        Ok(())
    }

    /// Confirms the captured frame and sends it.
    ///
    /// Exactly one transport send happens per successful confirmation. On
    /// transport failure the session returns to `Captured`, keeping the blob
    /// so the user can retry; nothing retries automatically.
    pub async fn upload<T: UploadTransport + ?Sized>(
        &mut self,
        transport: &T,
    ) -> Result<UploadReceipt, CaptureError> {
        if self.phase != CapturePhase::Captured {
            return Err(CaptureError::NotConfirmable);
        }
        let jpeg = match &self.shot {
            Some(shot) => shot.jpeg.clone(),
            None => return Err(CaptureError::NothingCaptured),
        };

        self.phase = CapturePhase::Uploading;
        match transport.send(&jpeg).await {
            Ok(receipt) => {
                self.phase = CapturePhase::Done;
                self.receipt = Some(receipt.clone());
                Ok(receipt)
            }
            Err(e) => {
                tracing::error!(error = %e, "Upload failed; capture kept for retry");
                self.phase = CapturePhase::Captured;
                Err(e)
            }
        }
    }

    /// Discards the current capture and re-binds the stream.
    pub fn retake(&mut self) {
        self.shot = None;
        self.receipt = None;
        self.phase = CapturePhase::Streaming;
        self.source.close();
        self.start();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::frame::{Frame, JpegPassthrough, PixelFormat};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct SyntheticSource {
        fail_open: bool,
        open: bool,
    }

    impl SyntheticSource {
        fn new() -> Self {
            Self {
                fail_open: false,
                open: false,
            }
        }

        fn failing() -> Self {
            Self {
                fail_open: true,
                open: false,
            }
        }
    }

    impl FrameSource for SyntheticSource {
        fn open(&mut self, _constraints: &CameraConstraints) -> Result<(), CaptureError> {
            if self.fail_open {
                return Err(CaptureError::SourceUnavailable("permission denied".into()));
            }
            self.open = true;
            Ok(())
        }

        fn grab(&mut self) -> Result<Frame, CaptureError> {
            if !self.open {
                return Err(CaptureError::NotStreaming);
            }
            Ok(Frame {
                width: 640,
                height: 480,
                format: PixelFormat::Jpeg,
                data: vec![0xff, 0xd8, 0x01, 0x02, 0xff, 0xd9],
            })
        }

        fn close(&mut self) {
            self.open = false;
        }

        fn is_open(&self) -> bool {
            self.open
        }
    }

    struct CountingTransport {
        fail: bool,
        sends: Mutex<u32>,
    }

    impl CountingTransport {
        fn ok() -> Self {
            Self {
                fail: false,
                sends: Mutex::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                sends: Mutex::new(0),
            }
        }

        fn send_count(&self) -> u32 {
            *self.sends.lock().unwrap()
        }
    }

    #[async_trait]
    impl UploadTransport for CountingTransport {
        async fn send(&self, _jpeg: &[u8]) -> Result<UploadReceipt, CaptureError> {
            *self.sends.lock().unwrap() += 1;
            if self.fail {
                return Err(CaptureError::Rejected {
                    status: 500,
                    body: "storage down".into(),
                });
            }
            Ok(UploadReceipt {
                url: "https://photos.test/abc.jpg".into(),
            })
        }
    }

    fn started_session() -> CaptureSession<SyntheticSource, JpegPassthrough> {
        let mut session = CaptureSession::new(
            SyntheticSource::new(),
            JpegPassthrough,
            CameraConstraints::Fixed {
                width: 640,
                height: 480,
            },
        );
        session.start();
        session
    }

    #[test]
    fn capture_produces_a_preview_and_leaves_streaming() {
        let mut session = started_session();
        assert!(session.streaming());

        session.capture().unwrap();
        assert_eq!(session.phase(), CapturePhase::Captured);
        let preview = session.preview_uri().unwrap();
        assert!(preview.starts_with("data:image/jpeg;base64,"));
        assert!(preview.len() > "data:image/jpeg;base64,".len());

        // A second capture needs a retake first.
        assert!(matches!(
            session.capture(),
            Err(CaptureError::NotStreaming)
        ));
    }

    #[test]
    fn denied_camera_access_leaves_a_streamless_session() {
        let mut session = CaptureSession::new(
            SyntheticSource::failing(),
            JpegPassthrough,
            CameraConstraints::FrontFacing,
        );
        session.start();

        assert_eq!(session.phase(), CapturePhase::Streaming);
        assert!(!session.streaming());
        assert!(matches!(
            session.capture(),
            Err(CaptureError::NotStreaming)
        ));
    }

    #[tokio::test]
    async fn confirming_once_sends_exactly_one_request() {
        let mut session = started_session();
        session.capture().unwrap();

        let transport = CountingTransport::ok();
        let receipt = session.upload(&transport).await.unwrap();

        assert_eq!(transport.send_count(), 1);
        assert_eq!(session.phase(), CapturePhase::Done);
        assert_eq!(receipt.url, "https://photos.test/abc.jpg");
        assert_eq!(session.recorded_url(), Some("https://photos.test/abc.jpg"));

        // A done cycle cannot be confirmed again.
        assert!(matches!(
            session.upload(&transport).await,
            Err(CaptureError::NotConfirmable)
        ));
        assert_eq!(transport.send_count(), 1);
    }

    #[tokio::test]
    async fn upload_without_a_capture_is_rejected_without_a_send() {
        let mut session = started_session();
        let transport = CountingTransport::ok();

        assert!(matches!(
            session.upload(&transport).await,
            Err(CaptureError::NotConfirmable)
        ));
        assert_eq!(transport.send_count(), 0);
    }

    #[tokio::test]
    async fn failed_upload_returns_to_captured_for_retry() {
        let mut session = started_session();
        session.capture().unwrap();

        let failing = CountingTransport::failing();
        assert!(session.upload(&failing).await.is_err());
        assert_eq!(session.phase(), CapturePhase::Captured);
        assert!(session.preview_uri().is_some());

        // Retry succeeds with a fresh transport; still one send each.
        let ok = CountingTransport::ok();
        session.upload(&ok).await.unwrap();
        assert_eq!(failing.send_count(), 1);
        assert_eq!(ok.send_count(), 1);
        assert_eq!(session.phase(), CapturePhase::Done);
    }

    #[tokio::test]
    async fn retake_always_returns_to_a_previewless_streaming_state() {
        // From Captured.
        let mut session = started_session();
        session.capture().unwrap();
        session.retake();
        assert_eq!(session.phase(), CapturePhase::Streaming);
        assert!(session.preview_uri().is_none());
        assert!(session.streaming());

        // From a failed upload.
        session.capture().unwrap();
        let failing = CountingTransport::failing();
        assert!(session.upload(&failing).await.is_err());
        session.retake();
        assert_eq!(session.phase(), CapturePhase::Streaming);
        assert!(session.preview_uri().is_none());

        // From Done.
        session.capture().unwrap();
        let ok = CountingTransport::ok();
        session.upload(&ok).await.unwrap();
        session.retake();
        assert_eq!(session.phase(), CapturePhase::Streaming);
        assert!(session.preview_uri().is_none());
        assert!(session.recorded_url().is_none());
        assert!(session.streaming());
    }
}
