use std::any::Any;

use platewatch_types::{EngineTag, Frame, OcrResult};

use crate::engine::OcrEngine;

/// One detected plate bounding box, pixel coordinates `(x1, y1, x2, y2)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlateBox {
    pub x1: u32,
    pub y1: u32,
    pub x2: u32,
    pub y2: u32,
    pub confidence: f32,
}

/// A detector backend a `YoloEngine` delegates its actual model inference
/// to, swappable the same way `RecognizerBackend` is for the text engines.
pub trait DetectorBackend: Send + Sync {
    fn detect(&self, frame: &Frame) -> Vec<PlateBox>;
}

/// Always reports no detections. The default until a real model is wired
/// in — matches `YOLOEngine.__init__`'s `initialized = False` fallback when
/// `ultralytics` is unavailable.
pub struct NullDetector;

impl DetectorBackend for NullDetector {
    fn detect(&self, _frame: &Frame) -> Vec<PlateBox> {
        Vec::new()
    }
}

/// Grounded on `original_source/.../ocr_engines/yolo_engine.py`: a detector,
/// not a recognizer. `recognize` always returns `None` text and the best
/// detection's confidence; text extraction is left to whichever recognizer
/// engine the arbiter feeds the cropped region to.
pub struct YoloEngine {
    backend: Box<dyn DetectorBackend>,
    initialized: bool,
}

impl YoloEngine {
    pub fn new(backend: Box<dyn DetectorBackend>) -> Self {
        Self {
            backend,
            initialized: false,
        }
    }

    pub fn detect_plates(&self, frame: &Frame) -> Vec<PlateBox> {
        if !self.initialized {
            return Vec::new();
        }
        self.backend.detect(frame)
    }

    /// Crops the highest-confidence detected box out of `frame`, or `None`
    /// if nothing was detected.
    pub fn extract_plate_region(&self, frame: &Frame) -> Option<Frame> {
        let best = self
            .detect_plates(frame)
            .into_iter()
            .max_by(|a, b| a.confidence.total_cmp(&b.confidence))?;

        let roi = platewatch_types::RoiRect::new(
            best.x1 as i64,
            best.y1 as i64,
            best.x2 as i64,
            best.y2 as i64,
        );
        Some(platewatch_vision::crop(frame, Some(roi)))
    }
}

impl OcrEngine for YoloEngine {
    fn initialize(&mut self) -> bool {
        self.initialized = true;
        true
    }

    fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn recognize(&self, frame: &Frame) -> OcrResult {
        let best = self
            .detect_plates(frame)
            .into_iter()
            .max_by(|a, b| a.confidence.total_cmp(&b.confidence));
        match best {
            Some(plate) => OcrResult {
                text: None,
                confidence: plate.confidence,
                engine: EngineTag::Yolo,
            },
            None => OcrResult::none(EngineTag::Yolo),
        }
    }

    fn tag(&self) -> EngineTag {
        EngineTag::Yolo
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Default for YoloEngine {
    fn default() -> Self {
        Self::new(Box::new(NullDetector))
    }
}
