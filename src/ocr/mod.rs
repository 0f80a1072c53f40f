pub mod interface;
pub mod tesseract;

pub use interface::{OcrEngine, OcrResponse};
pub use tesseract::TesseractOcr;
