//! Client side of the photo flow: camera-equivalent frame sources, JPEG
//! encoding, the capture/retake/upload state machine, and the HTTP transport
//! that submits a confirmed capture to the upload endpoint.

pub mod frame;
pub mod session;
pub mod uploader;

pub use frame::{
    CameraConstraints, Frame, FrameEncoder, FrameSource, JpegPassthrough, PixelFormat,
    StillFileSource,
};
pub use session::{CapturePhase, CaptureSession};
pub use uploader::{HttpUploader, UploadReceipt, UploadTransport};

use thiserror::Error;

/// Errors raised along the capture-to-upload path.
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("Camera source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("No active camera stream")]
    NotStreaming,

    #[error("No captured frame to work with")]
    NothingCaptured,

    #[error("An upload can only be confirmed from the captured state")]
    NotConfirmable,

    #[error("Frame encoding failed: {0}")]
    EncodeFailed(String),

    #[error("Upload transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Upload rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },
}
