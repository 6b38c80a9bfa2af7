//! Shared data model for the platewatch workspace.
//!
//! Every other `platewatch-*` crate depends on this one and none of its types
//! encode pipeline behavior; this mirrors how `subtitle-fast-types` sits under
//! the teacher's decoder/validator/ocr crates.

mod camera;
mod detection;
mod engine_tag;
mod frame;
mod stats;

pub use camera::{CameraSpec, SourceKind};
pub use detection::{Detection, OcrResult};
pub use engine_tag::EngineTag;
pub use frame::{Frame, RoiRect};
pub use stats::{MotionState, PipelineRole, PipelineStats};
