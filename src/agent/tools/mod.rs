pub mod process_text;
pub mod think;
pub mod transcribe;

pub use process_text::TextProcessingTool;
pub use think::ThinkTool;
pub use transcribe::TranscriptionTool;
