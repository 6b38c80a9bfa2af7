use std::fmt;
use std::str::FromStr;

use platewatch_types::{CameraSpec, Frame, SourceKind};

use crate::error::CaptureError;
use crate::mock::MockProvider;

/// A live, stateful handle to one camera's video source.
///
/// `read_frame` is expected to block until the next frame is available (or
/// a transient error occurs) — pacing between reads is the pipeline's job,
/// not the provider's.
pub trait CaptureProvider: Send {
    fn open(&mut self) -> Result<(), CaptureError>;
    fn read_frame(&mut self) -> Result<Frame, CaptureError>;
    /// The resolution this provider was asked to deliver; the actual frame
    /// size it ends up producing may differ, the same way `cap.set` in the
    /// original only *requests* a resolution.
    fn requested_resolution(&self) -> (u32, u32);
}

/// Which concrete `CaptureProvider` implementation to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Mock,
    Ffmpeg,
}

impl Backend {
    pub fn as_str(self) -> &'static str {
        match self {
            Backend::Mock => "mock",
            Backend::Ffmpeg => "ffmpeg",
        }
    }

    pub const fn is_compiled(self) -> bool {
        match self {
            Backend::Mock => true,
            Backend::Ffmpeg => cfg!(feature = "backend-ffmpeg"),
        }
    }

    pub fn compiled_backends() -> Vec<Backend> {
        [Backend::Mock, Backend::Ffmpeg]
            .into_iter()
            .filter(|b| b.is_compiled())
            .collect()
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown capture backend '{0}'")]
pub struct BackendParseError(String);

impl FromStr for Backend {
    type Err = BackendParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mock" => Ok(Backend::Mock),
            "ffmpeg" => Ok(Backend::Ffmpeg),
            other => Err(BackendParseError(other.to_string())),
        }
    }
}

/// Resolution a `LivePipeline`/`OcrPipeline` requests from a provider before
/// opening it, mirroring the original's two distinct `cap.set(...)` calls
/// (640x480 for the live stream, 1920x1080 for the OCR stream).
#[derive(Debug, Clone, Copy)]
pub struct Configuration {
    pub backend: Backend,
    pub requested_width: u32,
    pub requested_height: u32,
}

impl Configuration {
    pub fn new(backend: Backend, requested_width: u32, requested_height: u32) -> Self {
        Self {
            backend,
            requested_width,
            requested_height,
        }
    }

    /// Builds a provider for `spec`. `SourceKind::Mock` always resolves to
    /// `MockProvider` regardless of `self.backend` — a mock camera spec is a
    /// test fixture, not a real source a real backend could open.
    pub fn create_provider(&self, spec: &CameraSpec) -> Result<Box<dyn CaptureProvider>, CaptureError> {
        if matches!(spec.source, SourceKind::Mock) {
            return Ok(Box::new(MockProvider::new(
                self.requested_width,
                self.requested_height,
            )));
        }

        match self.backend {
            Backend::Mock => Ok(Box::new(MockProvider::new(
                self.requested_width,
                self.requested_height,
            ))),
            Backend::Ffmpeg => build_ffmpeg_provider(spec, self.requested_width, self.requested_height),
        }
    }
}

#[cfg(feature = "backend-ffmpeg")]
fn build_ffmpeg_provider(
    spec: &CameraSpec,
    width: u32,
    height: u32,
) -> Result<Box<dyn CaptureProvider>, CaptureError> {
    let source = spec
        .source
        .stream_source()
        .ok_or_else(|| CaptureError::OpenFailed(spec.camera_id.clone()))?;
    Ok(Box::new(crate::ffmpeg::FfmpegProvider::new(source, width, height)))
}

#[cfg(not(feature = "backend-ffmpeg"))]
fn build_ffmpeg_provider(
    _spec: &CameraSpec,
    _width: u32,
    _height: u32,
) -> Result<Box<dyn CaptureProvider>, CaptureError> {
    eprintln!("[capture] backend 'ffmpeg' not compiled in (enable the 'backend-ffmpeg' feature)");
    Err(CaptureError::BackendUnavailable("ffmpeg"))
}
