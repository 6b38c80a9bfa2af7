use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{mpsc, Arc};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use image::codecs::jpeg::JpegEncoder;
use image::ImageEncoder;
use parking_lot::Mutex;
use platewatch_capture::Configuration as CaptureConfiguration;
use platewatch_types::{CameraSpec, Frame, PipelineRole, PipelineStats};

/// Grounded on `LiveVideoPipeline.__init__`'s defaults (640x480 request,
/// 480x360 output, 15fps).
#[derive(Debug, Clone, Copy)]
pub struct LivePipelineConfig {
    pub target_fps: u32,
    pub requested_width: u32,
    pub requested_height: u32,
    pub output_width: u32,
    pub output_height: u32,
}

impl Default for LivePipelineConfig {
    fn default() -> Self {
        Self {
            target_fps: 15,
            requested_width: 640,
            requested_height: 480,
            output_width: 480,
            output_height: 360,
        }
    }
}

/// Pipeline A: low-resolution live preview. Never blocks a reader on
/// capture — `get_frame`/`get_frame_jpeg` only ever touch the last frame
/// slot, grounded on `video_pipeline_live.py::_stream_loop`.
pub struct LivePipeline {
    camera_id: String,
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
    done_rx: Option<mpsc::Receiver<()>>,
    current_frame: Arc<Mutex<Option<Arc<Frame>>>>,
    frame_count: Arc<AtomicU64>,
    fps: Arc<Mutex<f32>>,
}

impl LivePipeline {
    pub fn new(camera_id: impl Into<String>) -> Self {
        Self {
            camera_id: camera_id.into(),
            running: Arc::new(AtomicBool::new(false)),
            handle: None,
            done_rx: None,
            current_frame: Arc::new(Mutex::new(None)),
            frame_count: Arc::new(AtomicU64::new(0)),
            fps: Arc::new(Mutex::new(0.0)),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// No-op if already running, mirroring `LiveVideoPipeline.start`.
    pub fn start(&mut self, spec: CameraSpec, capture: CaptureConfiguration, config: LivePipelineConfig) {
        if self.running.swap(true, Ordering::AcqRel) {
            return;
        }

        let running = self.running.clone();
        let current_frame = self.current_frame.clone();
        let frame_count = self.frame_count.clone();
        let fps = self.fps.clone();
        let camera_id = self.camera_id.clone();
        let (done_tx, done_rx) = mpsc::channel();
        self.done_rx = Some(done_rx);

        let handle = thread::spawn(move || {
            run_stream_loop(camera_id, spec, capture, config, running, current_frame, frame_count, fps);
            let _ = done_tx.send(());
        });
        self.handle = Some(handle);
        println!("[live camera={}] started", self.camera_id);
    }

    /// Stops the loop and waits up to 2 seconds for it to exit, mirroring
    /// `thread.join(timeout=2)`.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::Release);
        if let Some(done_rx) = self.done_rx.take() {
            let _ = done_rx.recv_timeout(Duration::from_secs(2));
        }
        self.handle = None;
        println!("[live camera={}] stopped", self.camera_id);
    }

    /// Never blocks on capture — reads the last published frame, if any.
    pub fn get_frame(&self) -> Option<Arc<Frame>> {
        self.current_frame.lock().clone()
    }

    pub fn get_frame_jpeg(&self, quality: u8) -> Option<Vec<u8>> {
        let frame = self.get_frame()?;
        let mut buffer = Vec::new();
        let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
        encoder
            .write_image(
                frame.data(),
                frame.width(),
                frame.height(),
                image::ExtendedColorType::Rgb8,
            )
            .ok()?;
        Some(buffer)
    }

    pub fn stats(&self) -> PipelineStats {
        PipelineStats {
            role: PipelineRole::Live,
            running: self.is_running(),
            fps: *self.fps.lock(),
            processed_frames: self.frame_count.load(Ordering::Relaxed),
            detected_plates: 0,
            last_detection: None,
            current_engine: None,
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn run_stream_loop(
    camera_id: String,
    spec: CameraSpec,
    capture: CaptureConfiguration,
    config: LivePipelineConfig,
    running: Arc<AtomicBool>,
    current_frame: Arc<Mutex<Option<Arc<Frame>>>>,
    frame_count: Arc<AtomicU64>,
    fps: Arc<Mutex<f32>>,
) {
    let mut provider = match capture.create_provider(&spec) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("[live camera={camera_id}] failed to build capture provider: {e}");
            running.store(false, Ordering::Release);
            return;
        }
    };

    if let Err(e) = provider.open() {
        eprintln!("[live camera={camera_id}] failed to open stream: {e}");
        running.store(false, Ordering::Release);
        return;
    }

    let frame_delay = Duration::from_secs_f64(1.0 / config.target_fps.max(1) as f64);
    let mut fps_counter = 0u32;
    let mut fps_window_start = Instant::now();

    while running.load(Ordering::Acquire) {
        let start = Instant::now();

        let frame = match provider.read_frame() {
            Ok(f) => f,
            Err(e) => {
                eprintln!("[live camera={camera_id}] transient read failure: {e}");
                thread::sleep(Duration::from_secs(1));
                continue;
            }
        };

        let resized = resize(&frame, config.output_width, config.output_height);
        *current_frame.lock() = Some(Arc::new(resized));
        frame_count.fetch_add(1, Ordering::Relaxed);

        fps_counter += 1;
        if fps_window_start.elapsed() >= Duration::from_secs(1) {
            *fps.lock() = fps_counter as f32;
            fps_counter = 0;
            fps_window_start = Instant::now();
        }

        let elapsed = start.elapsed();
        if elapsed < frame_delay {
            thread::sleep(frame_delay - elapsed);
        }
    }
}

fn resize(frame: &Frame, width: u32, height: u32) -> Frame {
    if frame.width() == width && frame.height() == height {
        return frame.clone();
    }
    let buffer: image::ImageBuffer<image::Rgb<u8>, Vec<u8>> =
        image::ImageBuffer::from_raw(frame.width(), frame.height(), frame.data().to_vec())
            .expect("Frame invariant guarantees a matching buffer length");
    let resized = image::imageops::resize(&buffer, width, height, image::imageops::FilterType::Triangle);
    Frame::new(resized.into_raw(), width, height, frame.pts())
}
