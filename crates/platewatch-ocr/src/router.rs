use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use parking_lot::Mutex;
use platewatch_types::{EngineTag, Frame, OcrResult};

use crate::arbiter::{OcrArbiter, DEFAULT_PRIORITY};
use crate::engine::OcrEngine;
use crate::engines::{EasyEngine, PaddleEngine, TesseractEngine, YoloEngine};

/// What `OcrRouter::recognize` delegates to: one specific engine, or the
/// arbitrated combination of all of them. Mirrors the five-way
/// `OCREngineType` literal (`"paddle" | "easy" | "tesseract" | "yolo" |
/// "hybrid"`) from `original_source/.../ocr_engines/ocr_manager.py`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Engine(EngineTag),
    Hybrid,
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::Engine(tag) => write!(f, "{tag}"),
            Selection::Hybrid => write!(f, "hybrid"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown OCR selection '{0}'")]
pub struct SelectionParseError(String);

impl FromStr for Selection {
    type Err = SelectionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "hybrid" {
            return Ok(Selection::Hybrid);
        }
        EngineTag::from_str(s)
            .map(Selection::Engine)
            .map_err(|_| SelectionParseError(s.to_string()))
    }
}

/// Something that can build a fresh boxed engine for a tag, so the router
/// can lazily instantiate engines the first time they are requested.
/// Distinct `recognize_text`/`detect` backends are supplied per-tag by the
/// caller, the same way `ocr_manager.py` constructs a concrete
/// `PaddleEngine()`/`EasyOCREngine()`/... on first use.
pub trait EngineFactory: Send + Sync {
    fn build(&self, tag: EngineTag) -> Box<dyn OcrEngine>;
}

struct Inner {
    engines: HashMap<EngineTag, Arc<dyn OcrEngine>>,
    current: Selection,
}

/// Runtime-switchable front for the OCR engines: one `recognize` surface,
/// one `set_engine` mutator. Grounded on `OCRManager`.
pub struct OcrRouter {
    factory: Box<dyn EngineFactory>,
    inner: Mutex<Inner>,
}

impl OcrRouter {
    pub fn new(factory: Box<dyn EngineFactory>, default: Selection) -> Self {
        let router = Self {
            factory,
            inner: Mutex::new(Inner {
                engines: HashMap::new(),
                current: default,
            }),
        };
        router.ensure_initialized(default);
        router
    }

    fn ensure_initialized(&self, selection: Selection) {
        let tags: Vec<EngineTag> = match selection {
            Selection::Engine(tag) => vec![tag],
            Selection::Hybrid => DEFAULT_PRIORITY.to_vec(),
        };
        let mut inner = self.inner.lock();
        for tag in tags {
            inner.engines.entry(tag).or_insert_with(|| {
                let mut engine = self.factory.build(tag);
                engine.initialize();
                Arc::from(engine)
            });
        }
    }

    /// Switches the active selection. Returns `false` (leaving the current
    /// selection untouched) if the target engine fails to initialize,
    /// exactly as `set_engine` does when `self.engines[engine_type].initialized`
    /// is false.
    pub fn set_engine(&self, selection: Selection) -> bool {
        self.ensure_initialized(selection);
        let mut inner = self.inner.lock();
        let available = match selection {
            Selection::Engine(tag) => inner
                .engines
                .get(&tag)
                .map(|e| e.is_initialized())
                .unwrap_or(false),
            Selection::Hybrid => DEFAULT_PRIORITY
                .iter()
                .any(|tag| inner.engines.get(tag).map(|e| e.is_initialized()).unwrap_or(false)),
        };
        if available {
            inner.current = selection;
            true
        } else {
            false
        }
    }

    pub fn current(&self) -> Selection {
        self.inner.lock().current
    }

    /// Recognizes `frame` using whichever selection is currently active.
    pub fn recognize(&self, frame: &Frame) -> OcrResult {
        let (selection, snapshot): (Selection, HashMap<EngineTag, Arc<dyn OcrEngine>>) = {
            let inner = self.inner.lock();
            (inner.current, inner.engines.clone())
        };

        match selection {
            Selection::Engine(tag) => match snapshot.get(&tag) {
                Some(engine) if engine.is_initialized() => engine.recognize(frame),
                _ => OcrResult::none(EngineTag::None),
            },
            Selection::Hybrid => {
                let engines: Vec<Arc<dyn OcrEngine>> = DEFAULT_PRIORITY
                    .iter()
                    .chain(std::iter::once(&EngineTag::Yolo))
                    .filter_map(|tag| snapshot.get(tag).cloned())
                    .collect();
                let arbiter = OcrArbiter::with_default_priority(engines);
                arbiter.recognize(frame, true)
            }
        }
    }

    pub fn available_selections(&self) -> Vec<Selection> {
        let inner = self.inner.lock();
        let mut out: Vec<Selection> = EngineTag::ALL
            .iter()
            .filter(|tag| inner.engines.get(tag).map(|e| e.is_initialized()).unwrap_or(false))
            .map(|tag| Selection::Engine(*tag))
            .collect();
        if DEFAULT_PRIORITY
            .iter()
            .any(|tag| inner.engines.get(tag).map(|e| e.is_initialized()).unwrap_or(false))
        {
            out.push(Selection::Hybrid);
        }
        out
    }
}

/// Builds real-shaped (not model-backed) engines: `PaddleEngine`,
/// `EasyEngine`, `TesseractEngine` wrap a `NullRecognizer`, `YoloEngine`
/// wraps a `NullDetector`. A deployment wires in real backends by supplying
/// its own `EngineFactory`.
pub struct DefaultEngineFactory;

impl EngineFactory for DefaultEngineFactory {
    fn build(&self, tag: EngineTag) -> Box<dyn OcrEngine> {
        match tag {
            EngineTag::Paddle => Box::new(PaddleEngine::default()),
            EngineTag::Easy => Box::new(EasyEngine::default()),
            EngineTag::Tesseract => Box::new(TesseractEngine::default()),
            EngineTag::Yolo => Box::new(YoloEngine::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_selection_initializes_lazily() {
        let router = OcrRouter::new(Box::new(DefaultEngineFactory), Selection::Engine(EngineTag::Paddle));
        assert_eq!(router.current(), Selection::Engine(EngineTag::Paddle));
    }

    #[test]
    fn switching_to_available_engine_succeeds() {
        let router = OcrRouter::new(Box::new(DefaultEngineFactory), Selection::Engine(EngineTag::Paddle));
        assert!(router.set_engine(Selection::Engine(EngineTag::Easy)));
        assert_eq!(router.current(), Selection::Engine(EngineTag::Easy));
    }

    #[test]
    fn recognize_with_null_backend_reports_no_text() {
        let router = OcrRouter::new(Box::new(DefaultEngineFactory), Selection::Engine(EngineTag::Paddle));
        let frame = Frame::new(vec![0u8; 4 * 4 * 3], 4, 4, None);
        let result = router.recognize(&frame);
        assert!(result.text.is_none());
    }

    #[test]
    fn recognize_falls_back_to_none_tag_when_selection_is_unavailable() {
        let router = OcrRouter::new(Box::new(DefaultEngineFactory), Selection::Engine(EngineTag::Paddle));
        router.inner.lock().engines.remove(&EngineTag::Paddle);
        let frame = Frame::new(vec![0u8; 4 * 4 * 3], 4, 4, None);
        let result = router.recognize(&frame);
        assert!(result.text.is_none());
        assert_eq!(result.engine, EngineTag::None);
    }
}
