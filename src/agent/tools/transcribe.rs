#[cfg(test)]
#[path = "transcribe_test.rs"]
mod tests;

use async_trait::async_trait;
use eyre::{Context, Result};
use serde_json::Value;

use crate::transcriber::ArcTranscriber;

use super::super::LocalTool;

/// Transcribes an audio file through the attached transcriber.
pub struct TranscriptionTool {
    transcriber: ArcTranscriber,
    default_model: String,
}

impl TranscriptionTool {
    pub fn new(transcriber: ArcTranscriber, default_model: impl Into<String>) -> Self {
        Self {
            transcriber,
            default_model: default_model.into(),
        }
    }
}

#[async_trait]
impl LocalTool for TranscriptionTool {
    fn name(&self) -> &str {
        "transcribe"
    }

    fn description(&self) -> &str {
        "Transcribe an audio file to text"
    }

    async fn execute(&self, args: &Value) -> Result<Value> {
        let file_path = args
            .get("file_path")
            .and_then(Value::as_str)
            .unwrap_or_default();
        if file_path.is_empty() {
            eyre::bail!("No file path provided");
        }

        let model = args
            .get("model")
            .and_then(Value::as_str)
            .unwrap_or(&self.default_model)
            .to_string();

        let text = self
            .transcriber
            .transcribe_file(file_path, Some(model))
            .await
            .wrap_err("transcribing audio")?;
        Ok(Value::String(text))
    }
}
