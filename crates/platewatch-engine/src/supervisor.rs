use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use platewatch_capture::Configuration as CaptureConfiguration;
use platewatch_ocr::{DefaultEngineFactory, OcrRouter, Selection};
use platewatch_types::{CameraSpec, Frame, PipelineRole, PipelineStats};

use crate::live::{LivePipeline, LivePipelineConfig};
use crate::ocr::{OcrCallback, OcrPipeline, OcrPipelineConfig};

struct CameraPipelines {
    live: LivePipeline,
    ocr: Option<OcrPipeline>,
}

/// Owns the `{camera_id -> {live, ocr?}}` map; every operation is a thin,
/// idempotent delegation. Grounded on
/// `original_source/backend/app/services/camera_service.py::CameraService`,
/// turned into an owned value instead of a module-level singleton so a
/// caller controls its lifetime explicitly.
pub struct PipelineSupervisor {
    cameras: Mutex<HashMap<String, CameraPipelines>>,
    /// Template applied to every camera; `start_camera` overrides the
    /// per-camera fields (`target_preview_fps`, `target_ocr_fps`,
    /// `enable_motion`, `enable_roi`, `roi`) from each `CameraSpec`, since
    /// those are per-camera attributes per `spec.md` §3, not supervisor-wide
    /// defaults.
    live_config: LivePipelineConfig,
    ocr_config: OcrPipelineConfig,
    capture_config: CaptureConfiguration,
    callback: Option<OcrCallback>,
}

impl PipelineSupervisor {
    pub fn new(
        live_config: LivePipelineConfig,
        ocr_config: OcrPipelineConfig,
        capture_config: CaptureConfiguration,
        callback: Option<OcrCallback>,
    ) -> Self {
        Self {
            cameras: Mutex::new(HashMap::new()),
            live_config,
            ocr_config,
            capture_config,
            callback,
        }
    }

    /// No-op if `spec.camera_id` is already running, matching
    /// `start_camera_pipelines`'s guard on `active_pipelines`.
    pub fn start_camera(&self, spec: CameraSpec) {
        let mut cameras = self.cameras.lock();
        if cameras.contains_key(&spec.camera_id) {
            println!("[supervisor camera={}] already running", spec.camera_id);
            return;
        }

        let live_config = self.resolve_live_config(&spec);
        let mut live = LivePipeline::new(spec.camera_id.clone());
        live.start(spec.clone(), self.capture_config, live_config);

        let ocr = if spec.enable_ocr {
            let ocr_config = self.resolve_ocr_config(&spec);
            let router = Arc::new(OcrRouter::new(Box::new(DefaultEngineFactory), Selection::Hybrid));
            let mut pipeline = OcrPipeline::new(spec.camera_id.clone(), router);
            pipeline.start(spec.clone(), self.capture_config, ocr_config, self.callback.clone());
            Some(pipeline)
        } else {
            None
        };

        cameras.insert(spec.camera_id.clone(), CameraPipelines { live, ocr });
    }

    /// Stops and removes `camera_id`'s entry. No-op if absent.
    pub fn stop_camera(&self, camera_id: &str) {
        let removed = self.cameras.lock().remove(camera_id);
        if let Some(mut pipelines) = removed {
            pipelines.live.stop();
            if let Some(ocr) = pipelines.ocr.as_mut() {
                ocr.stop();
            }
        }
    }

    pub fn is_running(&self, camera_id: &str) -> bool {
        self.cameras.lock().contains_key(camera_id)
    }

    /// Never blocks on capture — delegates to `LivePipeline::get_frame`.
    pub fn get_live_frame(&self, camera_id: &str) -> Option<Arc<Frame>> {
        self.cameras.lock().get(camera_id)?.live.get_frame()
    }

    pub fn get_live_frame_jpeg(&self, camera_id: &str, quality: u8) -> Option<Vec<u8>> {
        self.cameras.lock().get(camera_id)?.live.get_frame_jpeg(quality)
    }

    pub fn set_ocr_engine(&self, camera_id: &str, selection: Selection) -> bool {
        match self.cameras.lock().get(camera_id).and_then(|c| c.ocr.as_ref()) {
            Some(ocr) => ocr.set_ocr_engine(selection),
            None => false,
        }
    }

    /// Returns a not-running sentinel pair when `camera_id` is absent,
    /// mirroring `get_pipeline_stats`'s defensive presence check.
    pub fn get_stats(&self, camera_id: &str) -> (PipelineStats, PipelineStats) {
        match self.cameras.lock().get(camera_id) {
            Some(pipelines) => (
                pipelines.live.stats(),
                pipelines
                    .ocr
                    .as_ref()
                    .map(|o| o.stats())
                    .unwrap_or_else(|| PipelineStats::not_running(PipelineRole::Ocr)),
            ),
            None => (
                PipelineStats::not_running(PipelineRole::Live),
                PipelineStats::not_running(PipelineRole::Ocr),
            ),
        }
    }

    pub fn camera_ids(&self) -> Vec<String> {
        self.cameras.lock().keys().cloned().collect()
    }

    /// Applies `spec`'s per-camera fps onto the template `LivePipelineConfig`.
    fn resolve_live_config(&self, spec: &CameraSpec) -> LivePipelineConfig {
        LivePipelineConfig {
            target_fps: spec.target_preview_fps,
            ..self.live_config
        }
    }

    /// Applies `spec`'s per-camera fps/motion/roi onto the template
    /// `OcrPipelineConfig`, per `spec.md` §3's `CameraSpec` attributes.
    fn resolve_ocr_config(&self, spec: &CameraSpec) -> OcrPipelineConfig {
        OcrPipelineConfig {
            ocr_fps: spec.target_ocr_fps,
            enable_motion_detection: spec.enable_motion,
            enable_roi: spec.enable_roi,
            roi: spec.roi.or(self.ocr_config.roi),
            ..self.ocr_config.clone()
        }
    }
}

impl Drop for PipelineSupervisor {
    fn drop(&mut self) {
        for (_, mut pipelines) in self.cameras.lock().drain() {
            pipelines.live.stop();
            if let Some(ocr) = pipelines.ocr.as_mut() {
                ocr.stop();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platewatch_capture::Backend;
    use platewatch_types::SourceKind;

    fn supervisor() -> PipelineSupervisor {
        PipelineSupervisor::new(
            LivePipelineConfig::default(),
            OcrPipelineConfig::default(),
            CaptureConfiguration::new(Backend::Mock, 640, 480),
            None,
        )
    }

    #[test]
    fn starting_twice_is_idempotent() {
        let sup = supervisor();
        let spec = CameraSpec::new("cam-1", SourceKind::Mock).without_ocr();
        sup.start_camera(spec.clone());
        sup.start_camera(spec);
        assert_eq!(sup.camera_ids().len(), 1);
        sup.stop_camera("cam-1");
    }

    #[test]
    fn absent_camera_reports_not_running() {
        let sup = supervisor();
        let (live, ocr) = sup.get_stats("missing");
        assert!(!live.running);
        assert!(!ocr.running);
    }

    #[test]
    fn stop_removes_entry() {
        let sup = supervisor();
        let spec = CameraSpec::new("cam-1", SourceKind::Mock).without_ocr();
        sup.start_camera(spec);
        sup.stop_camera("cam-1");
        assert!(!sup.is_running("cam-1"));
    }

    #[test]
    fn per_camera_fps_and_gates_override_the_template() {
        let sup = supervisor();
        let spec = CameraSpec::new("cam-1", SourceKind::Mock)
            .with_preview_fps(30)
            .with_ocr_fps(5)
            .without_motion()
            .without_roi_gate();

        let live_config = sup.resolve_live_config(&spec);
        assert_eq!(live_config.target_fps, 30);

        let ocr_config = sup.resolve_ocr_config(&spec);
        assert_eq!(ocr_config.ocr_fps, 5);
        assert!(!ocr_config.enable_motion_detection);
        assert!(!ocr_config.enable_roi);
    }

    #[test]
    fn two_cameras_can_run_different_fps_independently() {
        let sup = supervisor();
        let fast = CameraSpec::new("cam-fast", SourceKind::Mock).with_preview_fps(30);
        let slow = CameraSpec::new("cam-slow", SourceKind::Mock).with_preview_fps(5);

        assert_eq!(sup.resolve_live_config(&fast).target_fps, 30);
        assert_eq!(sup.resolve_live_config(&slow).target_fps, 5);
    }
}
