use crate::EngineTag;

/// Raw output of one OCR attempt, before debounce/acceptance gating.
#[derive(Debug, Clone, PartialEq)]
pub struct OcrResult {
    pub text: Option<String>,
    pub confidence: f32,
    pub engine: EngineTag,
}

impl OcrResult {
    pub fn none(engine: EngineTag) -> Self {
        Self {
            text: None,
            confidence: 0.0,
            engine,
        }
    }
}

/// An accepted, debounced plate reading emitted to the `OcrCallback`.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub camera_id: String,
    pub plate: String,
    pub confidence: f32,
    pub engine: EngineTag,
    pub timestamp: f64,
}
