use std::fmt;
use std::str::FromStr;

/// Names the OCR engine that produced (or is expected to produce) a result.
///
/// Mirrors the `OCREngineType` literal in the original `ocr_manager.py`
/// (`"paddle" | "easy" | "tesseract" | "yolo"`), plus `None` for "no engine
/// produced a usable result" — the tag `hybrid_engine.py::recognize_plate`
/// reports as `"none"` when every candidate is rejected. `Hybrid` itself is
/// not a member here: an arbitrated result always reports the specific
/// engine that won, or `None` if there was no winner (see `OcrArbiter`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineTag {
    Paddle,
    Easy,
    Tesseract,
    Yolo,
    None,
}

impl EngineTag {
    /// The four real, selectable recognizer/detector engines. Excludes
    /// `None`, which is a result tag, not a selectable engine.
    pub const ALL: [EngineTag; 4] = [
        EngineTag::Paddle,
        EngineTag::Easy,
        EngineTag::Tesseract,
        EngineTag::Yolo,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EngineTag::Paddle => "paddle",
            EngineTag::Easy => "easy",
            EngineTag::Tesseract => "tesseract",
            EngineTag::Yolo => "yolo",
            EngineTag::None => "none",
        }
    }
}

impl fmt::Display for EngineTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown OCR engine tag '{0}'")]
pub struct EngineTagParseError(String);

impl FromStr for EngineTag {
    type Err = EngineTagParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "paddle" => Ok(EngineTag::Paddle),
            "easy" => Ok(EngineTag::Easy),
            "tesseract" => Ok(EngineTag::Tesseract),
            "yolo" => Ok(EngineTag::Yolo),
            "none" => Ok(EngineTag::None),
            other => Err(EngineTagParseError(other.to_string())),
        }
    }
}
