pub mod output_manager;
pub mod pattern;
pub mod text_extractor;

pub use output_manager::{ConfigSnapshot, ExtractionReport, FileRecord, FileStatus, OutputManager};
pub use pattern::ChinesePattern;
pub use text_extractor::{ExtractionProgress, ExtractionRun, FileOutcome, TextExtractor};
