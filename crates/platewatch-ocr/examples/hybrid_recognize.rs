//! Builds a hybrid `OcrRouter` over the default engine factory and runs one
//! recognition pass against a blank frame, printing the arbitrated result.

use platewatch_ocr::{DefaultEngineFactory, OcrRouter, Selection};
use platewatch_types::Frame;

fn main() {
    let router = OcrRouter::new(Box::new(DefaultEngineFactory), Selection::Hybrid);
    let frame = Frame::new(vec![0u8; 64 * 64 * 3], 64, 64, None);

    let result = router.recognize(&frame);
    println!(
        "engine={} confidence={:.2} text={:?}",
        result.engine, result.confidence, result.text
    );
}
