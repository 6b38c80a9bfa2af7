//! Pluggable capture backends: opening a `CameraSpec`'s source and reading
//! successive frames from it.
//!
//! Grounded on `subtitle-fast-decoder`'s `Backend`/`Configuration` pattern
//! (one enum per selectable backend, a `Configuration` that builds the
//! chosen one, optional Cargo features gating real implementations),
//! generalized from "decode this file" to "keep reading frames from this
//! live source until told to stop".

mod error;
mod mock;
mod provider;

#[cfg(feature = "backend-ffmpeg")]
mod ffmpeg;

pub use error::CaptureError;
pub use mock::MockProvider;
pub use provider::{Backend, CaptureProvider, Configuration};

#[cfg(feature = "backend-ffmpeg")]
pub use ffmpeg::FfmpegProvider;
