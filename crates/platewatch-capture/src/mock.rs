use platewatch_types::Frame;

use crate::error::CaptureError;
use crate::provider::CaptureProvider;

/// Deterministic in-process frame source used by tests, demos, and the
/// `SourceKind::Mock` camera spec. Produces solid-color frames that shift by
/// one shade every read, which is enough to exercise `MotionGate` without a
/// real capture device.
pub struct MockProvider {
    width: u32,
    height: u32,
    opened: bool,
    tick: u8,
}

impl MockProvider {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            opened: false,
            tick: 0,
        }
    }
}

impl CaptureProvider for MockProvider {
    fn open(&mut self) -> Result<(), CaptureError> {
        self.opened = true;
        Ok(())
    }

    fn read_frame(&mut self) -> Result<Frame, CaptureError> {
        if !self.opened {
            return Err(CaptureError::OpenFailed("mock".to_string()));
        }
        self.tick = self.tick.wrapping_add(1);
        let data = vec![self.tick; (self.width * self.height * 3) as usize];
        Ok(Frame::new(data, self.width, self.height, None))
    }

    fn requested_resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_before_open_is_a_transient_like_error() {
        let mut provider = MockProvider::new(4, 4);
        assert!(provider.read_frame().is_err());
    }

    #[test]
    fn frames_change_shade_each_read() {
        let mut provider = MockProvider::new(4, 4);
        provider.open().unwrap();
        let a = provider.read_frame().unwrap();
        let b = provider.read_frame().unwrap();
        assert_ne!(a.data(), b.data());
    }
}
