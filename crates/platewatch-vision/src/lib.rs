//! Motion gating and region-of-interest cropping over decoded frames.

mod motion;
mod roi;

pub use motion::{MotionGate, MotionGateConfig};
pub use roi::crop;
