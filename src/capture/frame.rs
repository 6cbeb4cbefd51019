use std::path::PathBuf;

use super::CaptureError;

/// Pixel layout of a grabbed frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// Packed 8-bit RGB raster data.
    Rgb8,
    /// An already-encoded JPEG bitstream.
    Jpeg,
}

/// One still frame pulled from a frame source.
#[derive(Debug, Clone)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub data: Vec<u8>,
}

/// Stream constraints requested when opening a source, mirroring the
/// `getUserMedia` constraint shapes of the browser page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CameraConstraints {
    /// Prefer the user-facing camera (mobile contexts).
    FrontFacing,
    /// A fixed small preview resolution (desktop contexts).
    Fixed { width: u32, height: u32 },
}

const MOBILE_UA_MARKERS: [&str; 4] = ["iphone", "ipad", "ipod", "android"];

impl CameraConstraints {
    /// Picks constraints for a user agent: the front camera on detected
    /// mobile devices, otherwise a fixed 640x480 preview.
    pub fn for_user_agent(user_agent: &str) -> Self {
        let ua = user_agent.to_lowercase();
        if MOBILE_UA_MARKERS.iter().any(|marker| ua.contains(marker)) {
            CameraConstraints::FrontFacing
        } else {
            CameraConstraints::Fixed {
                width: 640,
                height: 480,
            }
        }
    }
}

/// A live source of video frames: the camera-stream seam of the capture flow.
///
/// `open`/`close` bracket the stream lifetime; `grab` returns the frame the
/// stream is currently showing.
pub trait FrameSource {
    fn open(&mut self, constraints: &CameraConstraints) -> Result<(), CaptureError>;
    fn grab(&mut self) -> Result<Frame, CaptureError>;
    fn close(&mut self);
    fn is_open(&self) -> bool;
}

/// Turns a grabbed frame into a JPEG blob.
pub trait FrameEncoder {
    fn encode(&self, frame: &Frame) -> Result<Vec<u8>, CaptureError>;
}

/// Encoder for sources whose frames already arrive JPEG-encoded.
#[derive(Debug, Default)]
pub struct JpegPassthrough;

impl FrameEncoder for JpegPassthrough {
    fn encode(&self, frame: &Frame) -> Result<Vec<u8>, CaptureError> {
        match frame.format {
            PixelFormat::Jpeg => Ok(frame.data.clone()),
            other => Err(CaptureError::EncodeFailed(format!(
                "passthrough encoder cannot handle {:?} frames",
                other
            ))),
        }
    }
}

/// Frame source backed by a still JPEG on disk.
///
/// Every `grab` re-reads the file; it stands in for the live camera in the
/// command-line client.
#[derive(Debug)]
pub struct StillFileSource {
    path: PathBuf,
    open: bool,
}

impl StillFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            open: false,
        }
    }
}

impl FrameSource for StillFileSource {
    fn open(&mut self, _constraints: &CameraConstraints) -> Result<(), CaptureError> {
        if !self.path.is_file() {
            return Err(CaptureError::SourceUnavailable(format!(
                "no such file: {}",
                self.path.display()
            )));
        }
        self.open = true;
        Ok(())
    }

    fn grab(&mut self) -> Result<Frame, CaptureError> {
        if !self.open {
            return Err(CaptureError::NotStreaming);
        }
        let data = std::fs::read(&self.path).map_err(|e| {
            CaptureError::SourceUnavailable(format!("{}: {}", self.path.display(), e))
        })?;
        // Dimensions live inside the encoded bitstream; the source does not
        // decode to learn them.
        Ok(Frame {
            width: 0,
            height: 0,
            format: PixelFormat::Jpeg,
            data,
        })
    }

    fn close(&mut self) {
        self.open = false;
    }

    fn is_open(&self) -> bool {
        self.open
    }
}
