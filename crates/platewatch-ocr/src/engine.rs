use std::any::Any;

use image::{GrayImage, Luma};
use platewatch_types::{EngineTag, Frame, OcrResult};

/// Capability every OCR engine exposes to the router/arbiter.
///
/// `initialize` is sticky: once it returns `false` the engine is treated as
/// permanently unavailable for the lifetime of the process (the original's
/// `self.initialized` flag, set once in `__init__` and never retried).
pub trait OcrEngine: Send + Sync {
    fn initialize(&mut self) -> bool;
    fn is_initialized(&self) -> bool;
    fn recognize(&self, frame: &Frame) -> OcrResult;
    fn tag(&self) -> EngineTag;

    /// Lets the arbiter downcast to `YoloEngine` for its detector-only
    /// capabilities (`detect_plates`/`extract_plate_region`) without widening
    /// this trait for every other engine.
    fn as_any(&self) -> &dyn Any;
}

/// A grayscale image that has been through the standard plate-recognition
/// preprocessing chain, ready for a `RecognizerBackend`.
#[derive(Debug, Clone)]
pub struct PreprocessedImage {
    pub image: GrayImage,
}

/// Grounded on `original_source/.../ocr_engines/paddle_engine.py::_preprocess`:
/// grayscale -> contrast stretch -> denoise (mean blur smoothing stands in
/// for `fastNlMeansDenoising`) -> Otsu-style binarization.
pub fn preprocess(frame: &Frame) -> PreprocessedImage {
    let rgb: image::ImageBuffer<image::Rgb<u8>, Vec<u8>> =
        image::ImageBuffer::from_raw(frame.width(), frame.height(), frame.data().to_vec())
            .expect("Frame invariant guarantees a matching buffer length");
    let gray = image::DynamicImage::ImageRgb8(rgb).into_luma8();

    let contrasted = GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
        let v = gray.get_pixel(x, y)[0] as f32;
        Luma([((v * 1.5) + 10.0).clamp(0.0, 255.0) as u8])
    });

    let denoised = imageproc::filter::gaussian_blur_f32(&contrasted, 1.0);
    let binary = otsu_threshold(&denoised);

    PreprocessedImage { image: binary }
}

fn otsu_threshold(image: &GrayImage) -> GrayImage {
    let mut histogram = [0u32; 256];
    for pixel in image.pixels() {
        histogram[pixel[0] as usize] += 1;
    }
    let total = image.width() as u64 * image.height() as u64;
    let sum_all: f64 = histogram
        .iter()
        .enumerate()
        .map(|(i, &c)| i as f64 * c as f64)
        .sum();

    let (mut sum_background, mut weight_background) = (0.0_f64, 0u64);
    let mut best_threshold = 0u8;
    let mut best_variance = 0.0_f64;

    for (t, &count) in histogram.iter().enumerate() {
        weight_background += count as u64;
        if weight_background == 0 {
            continue;
        }
        let weight_foreground = total - weight_background;
        if weight_foreground == 0 {
            break;
        }
        sum_background += t as f64 * count as f64;
        let mean_background = sum_background / weight_background as f64;
        let mean_foreground = (sum_all - sum_background) / weight_foreground as f64;
        let between_variance = weight_background as f64
            * weight_foreground as f64
            * (mean_background - mean_foreground).powi(2);
        if between_variance > best_variance {
            best_variance = between_variance;
            best_threshold = t as u8;
        }
    }

    imageproc::map::map_colors(image, |p| {
        if p[0] > best_threshold {
            Luma([255])
        } else {
            Luma([0])
        }
    })
}

/// The model-inference step a real `PaddleEngine`/`EasyEngine`/
/// `TesseractEngine` wraps. Swappable so the arbitration/debounce/validation
/// logic above it can be exercised without a real OCR model dependency.
pub trait RecognizerBackend: Send + Sync {
    fn recognize_text(&self, image: &PreprocessedImage) -> (Option<String>, f32);
}

/// A deterministic stand-in used by tests and by engines that have not been
/// wired to a real model yet. Always reports unavailable, matching the
/// posture a recognizer with no backing model should take rather than
/// fabricating a result.
pub struct NullRecognizer;

impl RecognizerBackend for NullRecognizer {
    fn recognize_text(&self, _image: &PreprocessedImage) -> (Option<String>, f32) {
        (None, 0.0)
    }
}
