use image::{GrayImage, Luma};
use imageproc::contours::find_contours;
use imageproc::distance_transform::Norm;
use imageproc::filter::gaussian_blur_f32;
use imageproc::morphology::dilate;
use platewatch_types::{Frame, MotionState};

/// Grounded on `original_source/backend/app/utils/motion_detector.py`:
/// grayscale -> Gaussian blur(21x21) -> absdiff vs previous frame ->
/// threshold -> dilate(2 iterations) -> external contours -> motion if any
/// contour area exceeds `min_area`.
#[derive(Debug, Clone, Copy)]
pub struct MotionGateConfig {
    pub threshold: u8,
    pub min_area: f64,
}

impl Default for MotionGateConfig {
    fn default() -> Self {
        Self {
            threshold: 30,
            min_area: 500.0,
        }
    }
}

pub struct MotionGate {
    config: MotionGateConfig,
    previous: Option<GrayImage>,
    total_frames: u64,
    motion_frames: u64,
}

impl MotionGate {
    pub fn new(config: MotionGateConfig) -> Self {
        Self {
            config,
            previous: None,
            total_frames: 0,
            motion_frames: 0,
        }
    }

    /// `(motion_ratio, total_frames, motion_frames)`, mirroring
    /// `MotionDetector.get_stats`.
    pub fn stats(&self) -> (f64, u64, u64) {
        if self.total_frames == 0 {
            (0.0, 0, 0)
        } else {
            (
                self.motion_frames as f64 / self.total_frames as f64,
                self.total_frames,
                self.motion_frames,
            )
        }
    }

    pub fn reset(&mut self) {
        self.previous = None;
        self.total_frames = 0;
        self.motion_frames = 0;
    }

    /// Checks `frame` against the previously seen frame. Never panics: a
    /// previous frame of mismatched size (e.g. after a capture resolution
    /// change) is treated the same as "no previous frame" rather than
    /// producing an error, which keeps this gate fail-open per the original.
    pub fn check(&mut self, frame: &Frame) -> MotionState {
        let gray = match to_gray(frame) {
            Some(g) => g,
            None => return MotionState::Motion,
        };
        let blurred = gaussian_blur_f32(&gray, 3.5);

        let previous = match self.previous.take() {
            Some(p) if p.dimensions() == blurred.dimensions() => p,
            _ => {
                self.previous = Some(blurred);
                return MotionState::Motion;
            }
        };

        let diff = abs_diff(&previous, &blurred);
        let mask = threshold_binary(&diff, self.config.threshold);
        let dilated = dilate(&mask, Norm::LInfinity, 2);
        let contours = find_contours::<i32>(&dilated);

        let motion = contours
            .iter()
            .any(|c| contour_area(&c.points) > self.config.min_area);

        self.previous = Some(blurred);
        self.total_frames += 1;
        if motion {
            self.motion_frames += 1;
        }

        if motion {
            MotionState::Motion
        } else {
            MotionState::Still
        }
    }
}

fn to_gray(frame: &Frame) -> Option<GrayImage> {
    let rgb: image::ImageBuffer<image::Rgb<u8>, Vec<u8>> =
        image::ImageBuffer::from_raw(frame.width(), frame.height(), frame.data().to_vec())?;
    Some(image::DynamicImage::ImageRgb8(rgb).into_luma8())
}

fn abs_diff(a: &GrayImage, b: &GrayImage) -> GrayImage {
    GrayImage::from_fn(a.width(), a.height(), |x, y| {
        let av = a.get_pixel(x, y)[0];
        let bv = b.get_pixel(x, y)[0];
        Luma([av.abs_diff(bv)])
    })
}

fn threshold_binary(image: &GrayImage, threshold: u8) -> GrayImage {
    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        if image.get_pixel(x, y)[0] > threshold {
            Luma([255])
        } else {
            Luma([0])
        }
    })
}

/// Shoelace-formula area of a (possibly open) contour polygon, the Rust
/// equivalent of `cv2.contourArea`.
fn contour_area(points: &[imageproc::point::Point<i32>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut area = 0.0_f64;
    for i in 0..points.len() {
        let p1 = points[i];
        let p2 = points[(i + 1) % points.len()];
        area += (p1.x as f64) * (p2.y as f64) - (p2.x as f64) * (p1.y as f64);
    }
    (area / 2.0).abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid_frame(w: u32, h: u32, value: u8) -> Frame {
        Frame::new(vec![value; (w * h * 3) as usize], w, h, None)
    }

    #[test]
    fn first_frame_is_always_motion() {
        let mut gate = MotionGate::new(MotionGateConfig::default());
        let frame = solid_frame(64, 64, 100);
        assert_eq!(gate.check(&frame), MotionState::Motion);
    }

    #[test]
    fn identical_second_frame_is_still() {
        let mut gate = MotionGate::new(MotionGateConfig::default());
        let frame = solid_frame(64, 64, 100);
        gate.check(&frame);
        assert_eq!(gate.check(&frame), MotionState::Still);
    }

    #[test]
    fn resolution_change_is_treated_as_warm_up() {
        let mut gate = MotionGate::new(MotionGateConfig::default());
        gate.check(&solid_frame(64, 64, 100));
        assert_eq!(gate.check(&solid_frame(32, 32, 100)), MotionState::Motion);
    }

    #[test]
    fn stats_track_total_and_motion_frames() {
        let mut gate = MotionGate::new(MotionGateConfig::default());
        let frame = solid_frame(64, 64, 100);
        gate.check(&frame); // warm-up, not counted
        gate.check(&frame); // counted, still
        let (_, total, motion_frames) = gate.stats();
        assert_eq!(total, 1);
        assert_eq!(motion_frames, 0);
    }
}
