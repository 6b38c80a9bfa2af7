/// Construction-time OCR engine failures. Runtime recognition failures are
/// never exposed as an `Err` — per the error taxonomy a failed recognition
/// is a `(None, 0.0)` result, not a propagated error.
#[derive(Debug, thiserror::Error)]
pub enum OcrError {
    #[error("engine '{0}' failed to initialize")]
    InitFailed(&'static str),
    #[error("engine '{0}' is not available")]
    EngineUnavailable(&'static str),
}
