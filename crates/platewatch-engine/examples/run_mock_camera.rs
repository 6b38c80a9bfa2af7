//! Starts a single mock camera through `PipelineSupervisor`, waits for a
//! handful of live frames and one OCR pass, prints stats, then stops it.

use std::thread;
use std::time::Duration;

use platewatch_capture::{Backend, Configuration as CaptureConfiguration};
use platewatch_engine::{LivePipelineConfig, OcrPipelineConfig, PipelineSupervisor};
use platewatch_types::{CameraSpec, SourceKind};

fn main() {
    let supervisor = PipelineSupervisor::new(
        LivePipelineConfig::default(),
        OcrPipelineConfig::default(),
        CaptureConfiguration::new(Backend::Mock, 640, 480),
        None,
    );

    let spec = CameraSpec::new("demo-camera", SourceKind::Mock)
        .with_preview_fps(15)
        .with_ocr_fps(2);
    supervisor.start_camera(spec);

    thread::sleep(Duration::from_secs(2));

    let (live, ocr) = supervisor.get_stats("demo-camera");
    println!("live:  {live:?}");
    println!("ocr:   {ocr:?}");

    supervisor.stop_camera("demo-camera");
}
