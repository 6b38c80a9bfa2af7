use serde::Serialize;

/// Distinguishes the two pipelines belonging to one camera, the way
/// `get_stats()`'s `"pipeline": "A"` / `"B"` tag does in the original.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PipelineRole {
    Live,
    Ocr,
}

/// Output of `MotionGate::check`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionState {
    Motion,
    Still,
}

impl MotionState {
    pub fn is_motion(self) -> bool {
        matches!(self, MotionState::Motion)
    }
}

/// Snapshot of one pipeline's running state, polled by
/// `PipelineSupervisor::get_stats`. Matches the `{role, processed_frames,
/// detected_plates, last_detection, current_engine, running}` contract from
/// `spec.md` §4.8; `detected_plates` and `current_engine` are always `0`/
/// `None` for the live pipeline, which neither counts detections nor runs an
/// OCR engine.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineStats {
    pub role: PipelineRole,
    pub running: bool,
    pub fps: f32,
    pub processed_frames: u64,
    pub detected_plates: u64,
    pub last_detection: Option<String>,
    pub current_engine: Option<String>,
}

impl PipelineStats {
    pub fn not_running(role: PipelineRole) -> Self {
        Self {
            role,
            running: false,
            fps: 0.0,
            processed_frames: 0,
            detected_plates: 0,
            last_detection: None,
            current_engine: None,
        }
    }
}
