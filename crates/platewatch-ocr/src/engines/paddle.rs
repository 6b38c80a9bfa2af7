use std::any::Any;

use platewatch_types::{EngineTag, Frame, OcrResult};

use crate::engine::{preprocess, NullRecognizer, OcrEngine, RecognizerBackend};

/// Wraps a `RecognizerBackend`, grounded on
/// `original_source/.../ocr_engines/paddle_engine.py`: preprocess, recognize,
/// upper-case and strip non plate characters from the result.
pub struct PaddleEngine {
    backend: Box<dyn RecognizerBackend>,
    initialized: bool,
}

impl PaddleEngine {
    pub fn new(backend: Box<dyn RecognizerBackend>) -> Self {
        Self {
            backend,
            initialized: false,
        }
    }
}

impl Default for PaddleEngine {
    fn default() -> Self {
        Self::new(Box::new(NullRecognizer))
    }
}

impl OcrEngine for PaddleEngine {
    fn initialize(&mut self) -> bool {
        self.initialized = true;
        true
    }

    fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn recognize(&self, frame: &Frame) -> OcrResult {
        if !self.initialized {
            return OcrResult::none(EngineTag::Paddle);
        }
        let processed = preprocess(frame);
        let (text, confidence) = self.backend.recognize_text(&processed);
        match text {
            Some(t) => OcrResult {
                text: Some(platewatch_plate::normalize(&t)),
                confidence,
                engine: EngineTag::Paddle,
            },
            None => OcrResult::none(EngineTag::Paddle),
        }
    }

    fn tag(&self) -> EngineTag {
        EngineTag::Paddle
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
