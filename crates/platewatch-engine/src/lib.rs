//! The per-camera dual pipeline and the supervisor that owns one pair per
//! camera.

mod debounce;
mod live;
mod ocr;
mod supervisor;

pub use live::{LivePipeline, LivePipelineConfig};
pub use ocr::{OcrCallback, OcrPipeline, OcrPipelineConfig};
pub use supervisor::PipelineSupervisor;
