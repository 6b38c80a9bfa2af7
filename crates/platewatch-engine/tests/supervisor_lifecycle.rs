use std::thread;
use std::time::Duration;

use platewatch_capture::{Backend, Configuration as CaptureConfiguration};
use platewatch_engine::{LivePipelineConfig, OcrPipelineConfig, PipelineSupervisor};
use platewatch_types::{CameraSpec, SourceKind};

fn supervisor() -> PipelineSupervisor {
    PipelineSupervisor::new(
        LivePipelineConfig::default(),
        OcrPipelineConfig::default(),
        CaptureConfiguration::new(Backend::Mock, 64, 48),
        None,
    )
}

#[test]
fn camera_reaches_running_state_and_produces_frames() {
    let sup = supervisor();
    let spec = CameraSpec::new("cam-1", SourceKind::Mock).without_ocr();
    sup.start_camera(spec);

    assert!(sup.is_running("cam-1"));

    let mut frame = None;
    for _ in 0..50 {
        frame = sup.get_live_frame("cam-1");
        if frame.is_some() {
            break;
        }
        thread::sleep(Duration::from_millis(50));
    }
    assert!(frame.is_some(), "live pipeline never published a frame");

    sup.stop_camera("cam-1");
    assert!(!sup.is_running("cam-1"));
}

#[test]
fn two_cameras_run_independently_and_stop_independently() {
    let sup = supervisor();
    let cam1 = CameraSpec::new("cam-a", SourceKind::Mock).without_ocr();
    let cam2 = CameraSpec::new("cam-b", SourceKind::Mock).without_ocr();

    sup.start_camera(cam1);
    sup.start_camera(cam2);
    assert_eq!(sup.camera_ids().len(), 2);

    sup.stop_camera("cam-a");
    assert!(!sup.is_running("cam-a"));
    assert!(sup.is_running("cam-b"));

    sup.stop_camera("cam-b");
    assert_eq!(sup.camera_ids().len(), 0);
}

#[test]
fn stats_report_not_running_after_stop() {
    let sup = supervisor();
    let spec = CameraSpec::new("cam-1", SourceKind::Mock);
    sup.start_camera(spec);
    sup.stop_camera("cam-1");

    let (live, ocr) = sup.get_stats("cam-1");
    assert!(!live.running);
    assert!(!ocr.running);
}
