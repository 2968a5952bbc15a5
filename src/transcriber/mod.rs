pub mod whisper;

pub use whisper::Whisper;

#[cfg(test)]
use mockall::{automock, predicate::*};

use crate::config::{ProviderConfig, TranscriptionConfig};
use async_trait::async_trait;
use eyre::Result;
use std::sync::Arc;

/// The audio transcription capability: turn an audio file into text.
#[async_trait]
#[cfg_attr(test, automock)]
pub trait Transcriber {
    async fn transcribe_file(&self, path: &str, model: Option<String>) -> Result<String>;
}

pub type ArcTranscriber = Arc<dyn Transcriber + Send + Sync>;

pub fn new_transcriber(
    provider: &ProviderConfig,
    transcription: &TranscriptionConfig,
) -> Result<ArcTranscriber> {
    match provider.kind.as_str() {
        "openai" | "groq" | "openrouter" => {
            Ok(Arc::new(Whisper::from(provider).with_language(
                transcription.language.as_deref().unwrap_or_default(),
            )))
        }
        other => eyre::bail!("Unsupported transcription provider kind: {}", other),
    }
}
