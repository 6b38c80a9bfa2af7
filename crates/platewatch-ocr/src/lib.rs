//! OCR engine capability, the recognizer wrappers, the hybrid arbiter and
//! the runtime-switchable router.

mod arbiter;
mod engine;
mod engines;
mod error;
mod router;

pub use arbiter::{OcrArbiter, DEFAULT_PRIORITY};
pub use engine::{preprocess, OcrEngine, PreprocessedImage, RecognizerBackend};
pub use engines::{EasyEngine, PaddleEngine, TesseractEngine, YoloEngine};
pub use error::OcrError;
pub use router::{DefaultEngineFactory, EngineFactory, OcrRouter, Selection};
