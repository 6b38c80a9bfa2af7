use std::any::Any;

use platewatch_types::{EngineTag, Frame, OcrResult};

use crate::engine::{preprocess, NullRecognizer, OcrEngine, RecognizerBackend};

/// Grounded on `original_source/.../ocr_engines/tesseract_engine.py`: same
/// shape as `PaddleEngine`/`EasyEngine`. The original additionally upscales
/// the preprocessed image 2x before calling Tesseract, since that engine is
/// comparatively sensitive to small glyph size; that upscale step belongs to
/// the `RecognizerBackend` implementation, not this wrapper.
pub struct TesseractEngine {
    backend: Box<dyn RecognizerBackend>,
    initialized: bool,
}

impl TesseractEngine {
    pub fn new(backend: Box<dyn RecognizerBackend>) -> Self {
        Self {
            backend,
            initialized: false,
        }
    }
}

impl Default for TesseractEngine {
    fn default() -> Self {
        Self::new(Box::new(NullRecognizer))
    }
}

impl OcrEngine for TesseractEngine {
    fn initialize(&mut self) -> bool {
        self.initialized = true;
        true
    }

    fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn recognize(&self, frame: &Frame) -> OcrResult {
        if !self.initialized {
            return OcrResult::none(EngineTag::Tesseract);
        }
        let processed = preprocess(frame);
        let (text, confidence) = self.backend.recognize_text(&processed);
        match text {
            Some(t) => OcrResult {
                text: Some(platewatch_plate::normalize(&t)),
                confidence,
                engine: EngineTag::Tesseract,
            },
            None => OcrResult::none(EngineTag::Tesseract),
        }
    }

    fn tag(&self) -> EngineTag {
        EngineTag::Tesseract
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
