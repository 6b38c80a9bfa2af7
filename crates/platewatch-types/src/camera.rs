use serde::{Deserialize, Serialize};

/// Where a camera's frames come from.
///
/// `Webcam` and `Rtsp` mirror the two branches
/// `LiveVideoPipeline.__init__` takes on `stream_source.isdigit()`; `Onvif`
/// and `Mock` are not present in the original but are required to express a
/// real ONVIF-backed camera and a deterministic test double respectively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceKind {
    Webcam { index: u32 },
    Rtsp { url: String },
    Onvif {
        host: String,
        username: String,
        password: String,
    },
    /// Deterministic in-process source used by tests and demos.
    Mock,
}

impl SourceKind {
    /// The value a capture backend would open: a webcam index, an RTSP URL,
    /// or an ONVIF device's media URL. `Mock` has nothing to open.
    pub fn stream_source(&self) -> Option<String> {
        match self {
            SourceKind::Webcam { index } => Some(index.to_string()),
            SourceKind::Rtsp { url } => Some(url.clone()),
            SourceKind::Onvif { host, .. } => Some(format!("rtsp://{host}/onvif1")),
            SourceKind::Mock => None,
        }
    }
}

/// Static description of one camera, shared read-only between a camera's
/// `LivePipeline` and `OcrPipeline`. Provided by the supervisor at `start`
/// and treated as immutable for the pipeline's run, per `spec.md` §3.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraSpec {
    pub camera_id: String,
    pub source: SourceKind,
    pub enable_ocr: bool,
    /// Live preview loop pacing. Matches `LiveVideoPipeline`'s default fps.
    pub target_preview_fps: u32,
    /// OCR loop pacing. Matches `OCRVideoPipeline`'s default fps.
    pub target_ocr_fps: u32,
    /// Gate OCR on `MotionGate`.
    pub enable_motion: bool,
    /// Crop the frame to `roi` before OCR.
    pub enable_roi: bool,
    pub roi: Option<crate::RoiRect>,
}

impl CameraSpec {
    pub fn new(camera_id: impl Into<String>, source: SourceKind) -> Self {
        Self {
            camera_id: camera_id.into(),
            source,
            enable_ocr: true,
            target_preview_fps: 15,
            target_ocr_fps: 2,
            enable_motion: true,
            enable_roi: true,
            roi: None,
        }
    }

    pub fn with_roi(mut self, roi: crate::RoiRect) -> Self {
        self.roi = Some(roi);
        self
    }

    pub fn with_preview_fps(mut self, fps: u32) -> Self {
        self.target_preview_fps = fps;
        self
    }

    pub fn with_ocr_fps(mut self, fps: u32) -> Self {
        self.target_ocr_fps = fps;
        self
    }

    pub fn without_ocr(mut self) -> Self {
        self.enable_ocr = false;
        self
    }

    pub fn without_motion(mut self) -> Self {
        self.enable_motion = false;
        self
    }

    pub fn without_roi_gate(mut self) -> Self {
        self.enable_roi = false;
        self
    }
}
