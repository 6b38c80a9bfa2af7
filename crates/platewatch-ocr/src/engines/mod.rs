mod easy;
mod paddle;
mod tesseract;
mod yolo;

pub use easy::EasyEngine;
pub use paddle::PaddleEngine;
pub use tesseract::TesseractEngine;
pub use yolo::YoloEngine;
