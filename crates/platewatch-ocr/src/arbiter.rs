use std::sync::Arc;

use platewatch_types::{EngineTag, Frame, OcrResult};
use rayon::prelude::*;

use crate::engine::OcrEngine;
use crate::engines::YoloEngine;

/// Default tie-break order, reproducing the original's Python-`dict`
/// insertion order (`paddle`, `easy`, `tesseract`) combined with `max()`'s
/// first-wins-on-ties semantics.
pub const DEFAULT_PRIORITY: [EngineTag; 3] = [EngineTag::Paddle, EngineTag::Easy, EngineTag::Tesseract];

/// Fans a frame out to every registered recognizer engine and returns the
/// highest-confidence validated result.
///
/// Grounded on `original_source/.../ocr_engines/hybrid_engine.py::recognize_plate`.
pub struct OcrArbiter {
    engines: Vec<Arc<dyn OcrEngine>>,
    priority: Vec<EngineTag>,
    parallel: bool,
}

impl OcrArbiter {
    /// `priority` controls both which recognizer engines are consulted and
    /// the tie-break order; engines not present in `priority` (beyond an
    /// optional `yolo` detector) are ignored.
    pub fn new(engines: Vec<Arc<dyn OcrEngine>>, priority: Vec<EngineTag>) -> Self {
        Self {
            engines,
            priority,
            parallel: false,
        }
    }

    pub fn with_default_priority(engines: Vec<Arc<dyn OcrEngine>>) -> Self {
        Self::new(engines, DEFAULT_PRIORITY.to_vec())
    }

    /// Enables `rayon`-backed parallel fan-out across recognizer engines.
    /// Still blocking to the caller — only the engine calls themselves run
    /// concurrently.
    pub fn with_parallel_fanout(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    fn yolo(&self) -> Option<&YoloEngine> {
        self.engines
            .iter()
            .find(|e| e.tag() == EngineTag::Yolo)
            .and_then(|e| e.as_any().downcast_ref::<YoloEngine>())
    }

    fn available_in_priority(&self) -> Vec<(&EngineTag, &Arc<dyn OcrEngine>)> {
        self.priority
            .iter()
            .filter_map(|tag| {
                self.engines
                    .iter()
                    .find(|e| e.tag() == *tag && e.is_initialized())
                    .map(|e| (tag, e))
            })
            .collect()
    }

    /// `use_yolo_detection` mirrors the original's same-named parameter:
    /// when `true` and a YOLO detector is registered, the detector's
    /// highest-confidence crop is what recognizers see instead of the full
    /// frame.
    pub fn recognize(&self, frame: &Frame, use_yolo_detection: bool) -> OcrResult {
        let process_frame = if use_yolo_detection {
            self.yolo()
                .and_then(|y| y.extract_plate_region(frame))
                .unwrap_or_else(|| frame.clone())
        } else {
            frame.clone()
        };

        let candidates = self.available_in_priority();
        let raw: Vec<(EngineTag, OcrResult)> = if self.parallel {
            candidates
                .par_iter()
                .map(|(tag, engine)| (**tag, engine.recognize(&process_frame)))
                .collect()
        } else {
            candidates
                .iter()
                .map(|(tag, engine)| (**tag, engine.recognize(&process_frame)))
                .collect()
        };

        let filtered = self.priority.iter().filter_map(|tag| {
            let (_, result) = raw.iter().find(|(t, _)| t == tag)?;
            let text = result.text.as_ref()?;
            if text.len() >= 5 && platewatch_plate::validate(text) {
                Some(OcrResult {
                    text: Some(platewatch_plate::format(text)),
                    confidence: result.confidence,
                    engine: *tag,
                })
            } else {
                None
            }
        });

        let mut best: Option<OcrResult> = None;
        for candidate in filtered {
            match &best {
                None => best = Some(candidate),
                Some(current) if candidate.confidence > current.confidence => best = Some(candidate),
                _ => {}
            }
        }

        best.unwrap_or_else(|| OcrResult::none(EngineTag::None))
    }

    pub fn available_engines(&self) -> Vec<EngineTag> {
        self.available_in_priority().into_iter().map(|(t, _)| *t).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{PreprocessedImage, RecognizerBackend};
    use crate::engines::{EasyEngine, PaddleEngine, TesseractEngine};

    struct FixedRecognizer {
        text: &'static str,
        confidence: f32,
    }

    impl RecognizerBackend for FixedRecognizer {
        fn recognize_text(&self, _image: &PreprocessedImage) -> (Option<String>, f32) {
            (Some(self.text.to_string()), self.confidence)
        }
    }

    fn frame() -> Frame {
        Frame::new(vec![0u8; 4 * 4 * 3], 4, 4, None)
    }

    fn engine(tag: EngineTag, text: &'static str, confidence: f32) -> Arc<dyn OcrEngine> {
        let backend = Box::new(FixedRecognizer { text, confidence });
        match tag {
            EngineTag::Paddle => {
                let mut e = PaddleEngine::new(backend);
                e.initialize();
                Arc::new(e)
            }
            EngineTag::Easy => {
                let mut e = EasyEngine::new(backend);
                e.initialize();
                Arc::new(e)
            }
            EngineTag::Tesseract => {
                let mut e = TesseractEngine::new(backend);
                e.initialize();
                Arc::new(e)
            }
            EngineTag::Yolo => unreachable!(),
        }
    }

    #[test]
    fn picks_highest_confidence_result() {
        let engines = vec![
            engine(EngineTag::Paddle, "34ABC123", 0.7),
            engine(EngineTag::Easy, "34ABC123", 0.95),
        ];
        let arbiter = OcrArbiter::with_default_priority(engines);
        let result = arbiter.recognize(&frame(), false);
        assert_eq!(result.engine, EngineTag::Easy);
        assert!((result.confidence - 0.95).abs() < f32::EPSILON);
    }

    #[test]
    fn ties_break_toward_earlier_priority_engine() {
        let engines = vec![
            engine(EngineTag::Easy, "34ABC123", 0.8),
            engine(EngineTag::Paddle, "34ABC123", 0.8),
        ];
        let arbiter = OcrArbiter::with_default_priority(engines);
        let result = arbiter.recognize(&frame(), false);
        assert_eq!(result.engine, EngineTag::Paddle);
    }

    #[test]
    fn rejects_short_or_invalid_text() {
        let engines = vec![engine(EngineTag::Paddle, "AB", 0.9)];
        let arbiter = OcrArbiter::with_default_priority(engines);
        let result = arbiter.recognize(&frame(), false);
        assert!(result.text.is_none());
    }

    #[test]
    fn no_engines_returns_none_result() {
        let arbiter = OcrArbiter::with_default_priority(vec![]);
        let result = arbiter.recognize(&frame(), false);
        assert!(result.text.is_none());
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.engine, EngineTag::None);
    }
}
