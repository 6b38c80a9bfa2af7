use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{mpsc, Arc};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use platewatch_capture::Configuration as CaptureConfiguration;
use platewatch_ocr::OcrRouter;
use platewatch_types::{CameraSpec, Detection, PipelineRole, PipelineStats, RoiRect};
use platewatch_vision::{MotionGate, MotionGateConfig};

use crate::debounce::Debouncer;

/// Invoked once per accepted, debounced detection. Errors the callback
/// raises are caught and logged, never allowed to unwind the pipeline
/// thread, per `video_pipeline_ocr.py`'s `try/except` around `ocr_callback`.
pub type OcrCallback = Arc<dyn Fn(Detection) + Send + Sync>;

/// Grounded on `OCRVideoPipeline.__init__`'s defaults (1920x1080 request,
/// 2fps, motion + ROI enabled, strict `> 0.6` acceptance, 5s debounce).
#[derive(Clone)]
pub struct OcrPipelineConfig {
    pub ocr_fps: u32,
    pub requested_width: u32,
    pub requested_height: u32,
    pub enable_motion_detection: bool,
    pub enable_roi: bool,
    pub roi: Option<RoiRect>,
    pub acceptance_confidence: f32,
    pub debounce_window: Duration,
    pub motion: MotionGateConfig,
}

impl Default for OcrPipelineConfig {
    fn default() -> Self {
        Self {
            ocr_fps: 2,
            requested_width: 1920,
            requested_height: 1080,
            enable_motion_detection: true,
            enable_roi: true,
            roi: None,
            acceptance_confidence: 0.6,
            debounce_window: Duration::from_secs(5),
            motion: MotionGateConfig::default(),
        }
    }
}

struct SharedStats {
    processed_frames: AtomicU64,
    detected_plates: AtomicU64,
    last_detection: Mutex<Option<String>>,
}

/// Pipeline B: full-resolution OCR processing, independent of the live
/// preview pipeline. Grounded on `video_pipeline_ocr.py::_ocr_loop`.
pub struct OcrPipeline {
    camera_id: String,
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
    done_rx: Option<mpsc::Receiver<()>>,
    stats: Arc<SharedStats>,
    router: Arc<OcrRouter>,
}

impl OcrPipeline {
    pub fn new(camera_id: impl Into<String>, router: Arc<OcrRouter>) -> Self {
        Self {
            camera_id: camera_id.into(),
            running: Arc::new(AtomicBool::new(false)),
            handle: None,
            done_rx: None,
            stats: Arc::new(SharedStats {
                processed_frames: AtomicU64::new(0),
                detected_plates: AtomicU64::new(0),
                last_detection: Mutex::new(None),
            }),
            router,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    pub fn router(&self) -> &Arc<OcrRouter> {
        &self.router
    }

    pub fn start(
        &mut self,
        spec: CameraSpec,
        capture: CaptureConfiguration,
        config: OcrPipelineConfig,
        callback: Option<OcrCallback>,
    ) {
        if self.running.swap(true, Ordering::AcqRel) {
            return;
        }

        let running = self.running.clone();
        let stats = self.stats.clone();
        let router = self.router.clone();
        let camera_id = self.camera_id.clone();
        let (done_tx, done_rx) = mpsc::channel();
        self.done_rx = Some(done_rx);

        let handle = thread::spawn(move || {
            run_ocr_loop(camera_id, spec, capture, config, router, callback, running, stats);
            let _ = done_tx.send(());
        });
        self.handle = Some(handle);
        println!("[ocr camera={}] started", self.camera_id);
    }

    pub fn stop(&mut self) {
        self.running.store(false, Ordering::Release);
        if let Some(done_rx) = self.done_rx.take() {
            let _ = done_rx.recv_timeout(Duration::from_secs(2));
        }
        self.handle = None;
        println!("[ocr camera={}] stopped", self.camera_id);
    }

    /// Delegates to the owned `OcrRouter`; `false` if the engine failed to
    /// initialize or is unknown.
    pub fn set_ocr_engine(&self, selection: platewatch_ocr::Selection) -> bool {
        self.router.set_engine(selection)
    }

    pub fn stats(&self) -> PipelineStats {
        PipelineStats {
            role: PipelineRole::Ocr,
            running: self.is_running(),
            fps: 0.0,
            processed_frames: self.stats.processed_frames.load(Ordering::Relaxed),
            detected_plates: self.stats.detected_plates.load(Ordering::Relaxed),
            last_detection: self.stats.last_detection.lock().clone(),
            current_engine: Some(self.router.current().to_string()),
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn run_ocr_loop(
    camera_id: String,
    spec: CameraSpec,
    capture: CaptureConfiguration,
    config: OcrPipelineConfig,
    router: Arc<OcrRouter>,
    callback: Option<OcrCallback>,
    running: Arc<AtomicBool>,
    stats: Arc<SharedStats>,
) {
    let mut provider = match capture.create_provider(&spec) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("[ocr camera={camera_id}] failed to build capture provider: {e}");
            running.store(false, Ordering::Release);
            return;
        }
    };

    if let Err(e) = provider.open() {
        eprintln!("[ocr camera={camera_id}] failed to open stream: {e}");
        running.store(false, Ordering::Release);
        return;
    }

    let mut motion_gate = config
        .enable_motion_detection
        .then(|| MotionGate::new(config.motion));
    let mut debouncer = Debouncer::new(config.debounce_window);
    let frame_delay = Duration::from_secs_f64(1.0 / config.ocr_fps.max(1) as f64);
    let roi = config.roi.or(spec.roi);

    while running.load(Ordering::Acquire) {
        let start = Instant::now();

        let frame = match provider.read_frame() {
            Ok(f) => f,
            Err(e) => {
                eprintln!("[ocr camera={camera_id}] transient read failure: {e}");
                thread::sleep(Duration::from_secs(1));
                continue;
            }
        };

        if let Some(gate) = motion_gate.as_mut() {
            if !gate.check(&frame).is_motion() {
                thread::sleep(frame_delay);
                continue;
            }
        }

        let process_frame = if config.enable_roi {
            platewatch_vision::crop(&frame, roi)
        } else {
            frame
        };

        let result = router.recognize(&process_frame);
        stats.processed_frames.fetch_add(1, Ordering::Relaxed);

        if let Some(text) = &result.text {
            if result.confidence > config.acceptance_confidence && platewatch_plate::validate(text) {
                let formatted = platewatch_plate::format(text);
                let now = Instant::now();
                if debouncer.should_emit(&formatted, now) {
                    *stats.last_detection.lock() = Some(formatted.clone());
                    stats.detected_plates.fetch_add(1, Ordering::Relaxed);

                    let detection = Detection {
                        camera_id: camera_id.clone(),
                        plate: formatted.clone(),
                        confidence: result.confidence,
                        engine: result.engine,
                        timestamp: unix_timestamp(),
                    };

                    if let Some(cb) = callback.as_ref() {
                        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                            cb(detection);
                        }));
                        if outcome.is_err() {
                            eprintln!("[ocr camera={camera_id}] callback panicked");
                        }
                    }

                    println!(
                        "[ocr camera={camera_id}] detected: {formatted} (conf: {:.2}, engine: {})",
                        result.confidence, result.engine
                    );
                }
            }
        }

        let elapsed = start.elapsed();
        if elapsed < frame_delay {
            thread::sleep(frame_delay - elapsed);
        }
    }
}

fn unix_timestamp() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}
