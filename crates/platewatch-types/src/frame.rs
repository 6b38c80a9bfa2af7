use serde::{Deserialize, Serialize};

/// A decoded RGB8 video frame.
///
/// Pixel data is stored as tightly packed `width * height * 3` bytes, the
/// layout `image::RgbImage` expects, so downstream crates can wrap a `Frame`
/// in an `image::ImageBuffer` without copying.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    pts: Option<f64>,
}

impl Frame {
    /// Builds a frame, panicking only on a malformed buffer length — this is
    /// a programmer error (a capture backend feeding a short buffer), not a
    /// condition a caller recovers from.
    pub fn new(data: Vec<u8>, width: u32, height: u32, pts: Option<f64>) -> Self {
        assert_eq!(
            data.len(),
            width as usize * height as usize * 3,
            "frame buffer length does not match width*height*3"
        );
        Self {
            data,
            width,
            height,
            pts,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pts(&self) -> Option<f64> {
        self.pts
    }
}

/// A region of interest as an absolute pixel rectangle, inclusive on
/// `(x1, y1)` and exclusive on `(x2, y2)` — the same `{"x1", "y1", "x2",
/// "y2"}` contract `original_source/backend/app/utils/roi_extractor.py`'s
/// `extract_roi` takes, matching `spec.md` §3's `RoiRect` entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoiRect {
    pub x1: i64,
    pub y1: i64,
    pub x2: i64,
    pub y2: i64,
}

impl RoiRect {
    pub fn new(x1: i64, y1: i64, x2: i64, y2: i64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Clamps this rect to `[0, frame_width) x [0, frame_height)`, mirroring
    /// `extract_roi`'s `max(0, min(coord, frame.shape[...]))` clamp.
    pub fn clamped(self, frame_width: u32, frame_height: u32) -> (i64, i64, i64, i64) {
        let fw = frame_width as i64;
        let fh = frame_height as i64;
        (
            self.x1.clamp(0, fw),
            self.y1.clamp(0, fh),
            self.x2.clamp(0, fw),
            self.y2.clamp(0, fh),
        )
    }
}
