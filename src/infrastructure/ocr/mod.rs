mod tesseract_recognizer;

pub use tesseract_recognizer::{
    TesseractConfig, TesseractRecognizer, TesseractRecognizerFactory, parse_fragments,
    parse_language_list,
};
