mod cli;
mod settings;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use platewatch_capture::{Backend, Configuration as CaptureConfiguration};
use platewatch_engine::{LivePipelineConfig, OcrPipelineConfig, PipelineSupervisor};
use platewatch_types::{CameraSpec, SourceKind};

use cli::parse_cli;

fn main() {
    let (args, sources) = parse_cli();

    if args.list_backends {
        for backend in Backend::compiled_backends() {
            println!("{backend}");
        }
        return;
    }

    let settings = match settings::resolve(&args, &sources) {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    let source = parse_source(&settings.source);
    let mut spec = CameraSpec::new(settings.camera_id.clone(), source)
        .with_preview_fps(settings.live_fps)
        .with_ocr_fps(settings.ocr_fps);
    spec.enable_ocr = settings.enable_ocr;
    if let Some(roi) = settings.roi {
        spec = spec.with_roi(roi);
    }

    let live_config = LivePipelineConfig {
        target_fps: settings.live_fps,
        ..LivePipelineConfig::default()
    };
    let ocr_config = OcrPipelineConfig {
        ocr_fps: settings.ocr_fps,
        roi: settings.roi,
        ..OcrPipelineConfig::default()
    };
    let capture_config = CaptureConfiguration::new(
        Backend::Mock,
        live_config.requested_width,
        live_config.requested_height,
    );

    let callback: Arc<dyn Fn(platewatch_types::Detection) + Send + Sync> = Arc::new(|detection| {
        println!(
            "detected plate={} camera={} confidence={:.2} engine={}",
            detection.plate, detection.camera_id, detection.confidence, detection.engine
        );
    });

    let supervisor = Arc::new(PipelineSupervisor::new(
        live_config,
        ocr_config,
        capture_config,
        Some(callback),
    ));

    supervisor.start_camera(spec);

    if let Some(ocr_selection) = settings.ocr_engine_selection() {
        supervisor.set_ocr_engine(&settings.camera_id, ocr_selection);
    }

    println!("[platewatch camera={}] running, press ctrl-c to stop", settings.camera_id);

    let running = Arc::new(AtomicBool::new(true));
    let running_handler = running.clone();
    if let Err(err) = ctrlc::set_handler(move || {
        running_handler.store(false, Ordering::Release);
    }) {
        eprintln!("failed to install ctrl-c handler: {err}");
    }

    while running.load(Ordering::Acquire) {
        thread::sleep(Duration::from_millis(200));
    }

    supervisor.stop_camera(&settings.camera_id);
}

fn parse_source(raw: &str) -> SourceKind {
    if raw == "mock" {
        return SourceKind::Mock;
    }
    if let Ok(index) = raw.parse::<u32>() {
        return SourceKind::Webcam { index };
    }
    SourceKind::Rtsp { url: raw.to_string() }
}
