use image::{ImageBuffer, Rgb};
use platewatch_types::{Frame, RoiRect};

/// Crops `frame` to `roi`, clamped to frame bounds.
///
/// Grounded on `original_source/backend/app/utils/roi_extractor.py`'s
/// `extract_roi`: a missing, empty, or inverted rectangle (after clamping)
/// returns the original frame unchanged rather than erroring. This never
/// panics — `Frame`'s own invariant (buffer length matches width*height*3)
/// means the `ImageBuffer::from_raw` below always succeeds.
pub fn crop(frame: &Frame, roi: Option<RoiRect>) -> Frame {
    let Some(roi) = roi else {
        return frame.clone();
    };

    let (x1, y1, x2, y2) = roi.clamped(frame.width(), frame.height());

    if x2 <= x1 || y2 <= y1 {
        return frame.clone();
    }

    let buffer: ImageBuffer<Rgb<u8>, Vec<u8>> =
        ImageBuffer::from_raw(frame.width(), frame.height(), frame.data().to_vec())
            .expect("Frame invariant guarantees a matching buffer length");

    let cropped = image::imageops::crop_imm(
        &buffer,
        x1 as u32,
        y1 as u32,
        (x2 - x1) as u32,
        (y2 - y1) as u32,
    )
    .to_image();

    Frame::new(
        cropped.into_raw(),
        (x2 - x1) as u32,
        (y2 - y1) as u32,
        frame.pts(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid_frame(w: u32, h: u32) -> Frame {
        Frame::new(vec![128u8; (w * h * 3) as usize], w, h, None)
    }

    #[test]
    fn no_roi_returns_original() {
        let frame = solid_frame(100, 50);
        let out = crop(&frame, None);
        assert_eq!(out.width(), 100);
        assert_eq!(out.height(), 50);
    }

    #[test]
    fn inverted_rect_returns_original() {
        let frame = solid_frame(100, 50);
        let roi = RoiRect::new(80, 80, 20, 20);
        let out = crop(&frame, Some(roi));
        assert_eq!((out.width(), out.height()), (100, 50));
    }

    #[test]
    fn roi_is_clamped_to_frame_bounds() {
        let frame = solid_frame(100, 50);
        let roi = RoiRect::new(50, 50, 200, 200);
        let out = crop(&frame, Some(roi));
        assert!(out.width() <= 100 && out.height() <= 50);
    }

    #[test]
    fn roi_crops_to_expected_subregion() {
        let frame = solid_frame(100, 100);
        let roi = RoiRect::new(25, 25, 75, 75);
        let out = crop(&frame, Some(roi));
        assert_eq!((out.width(), out.height()), (50, 50));
    }
}
