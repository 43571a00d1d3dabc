pub mod observability;
pub mod ocr;
pub mod speech;
pub mod storage;
