use std::any::Any;

use platewatch_types::{EngineTag, Frame, OcrResult};

use crate::engine::{preprocess, NullRecognizer, OcrEngine, RecognizerBackend};

/// Grounded on `original_source/.../ocr_engines/easyocr_engine.py` (the
/// sibling file `hybrid_engine.py` dispatches into alongside `paddle_engine`
/// and `tesseract_engine`): same preprocess-recognize-normalize shape as
/// `PaddleEngine`, different underlying model.
pub struct EasyEngine {
    backend: Box<dyn RecognizerBackend>,
    initialized: bool,
}

impl EasyEngine {
    pub fn new(backend: Box<dyn RecognizerBackend>) -> Self {
        Self {
            backend,
            initialized: false,
        }
    }
}

impl Default for EasyEngine {
    fn default() -> Self {
        Self::new(Box::new(NullRecognizer))
    }
}

impl OcrEngine for EasyEngine {
    fn initialize(&mut self) -> bool {
        self.initialized = true;
        true
    }

    fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn recognize(&self, frame: &Frame) -> OcrResult {
        if !self.initialized {
            return OcrResult::none(EngineTag::Easy);
        }
        let processed = preprocess(frame);
        let (text, confidence) = self.backend.recognize_text(&processed);
        match text {
            Some(t) => OcrResult {
                text: Some(platewatch_plate::normalize(&t)),
                confidence,
                engine: EngineTag::Easy,
            },
            None => OcrResult::none(EngineTag::Easy),
        }
    }

    fn tag(&self) -> EngineTag {
        EngineTag::Easy
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
