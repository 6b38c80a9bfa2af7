use std::time::{Duration, Instant};

/// Suppresses re-emission of the same plate seen within `window` of the
/// previous acceptance, grounded on `video_pipeline_ocr.py`'s
/// `last_detection`/`last_detection_time` check (`< 5` seconds, strict).
pub struct Debouncer {
    window: Duration,
    last_plate: Option<String>,
    last_seen: Option<Instant>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_plate: None,
            last_seen: None,
        }
    }

    /// `true` if `plate` should be emitted now; updates internal state as a
    /// side effect exactly when it returns `true`, mirroring the original
    /// only updating `last_detection`/`last_detection_time` on acceptance.
    pub fn should_emit(&mut self, plate: &str, now: Instant) -> bool {
        let is_repeat = self.last_plate.as_deref() == Some(plate)
            && self
                .last_seen
                .map(|seen| now.duration_since(seen) < self.window)
                .unwrap_or(false);

        if is_repeat {
            return false;
        }

        self.last_plate = Some(plate.to_string());
        self.last_seen = Some(now);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_sighting_always_emits() {
        let mut d = Debouncer::new(Duration::from_secs(5));
        assert!(d.should_emit("34ABC123", Instant::now()));
    }

    #[test]
    fn repeat_within_window_is_suppressed() {
        let mut d = Debouncer::new(Duration::from_secs(5));
        let t0 = Instant::now();
        assert!(d.should_emit("34ABC123", t0));
        assert!(!d.should_emit("34ABC123", t0 + Duration::from_secs(2)));
    }

    #[test]
    fn repeat_after_window_emits_again() {
        let mut d = Debouncer::new(Duration::from_secs(5));
        let t0 = Instant::now();
        assert!(d.should_emit("34ABC123", t0));
        assert!(d.should_emit("34ABC123", t0 + Duration::from_secs(6)));
    }

    #[test]
    fn different_plate_emits_immediately() {
        let mut d = Debouncer::new(Duration::from_secs(5));
        let t0 = Instant::now();
        assert!(d.should_emit("34ABC123", t0));
        assert!(d.should_emit("06XYZ999", t0 + Duration::from_millis(100)));
    }
}
