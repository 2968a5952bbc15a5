pub mod openai;

pub use openai::OpenAI;

#[cfg(test)]
use mockall::{automock, predicate::*};

use crate::config::ProviderConfig;
use crate::prompts::PromptTemplate;
use async_trait::async_trait;
use eyre::Result;
use std::sync::Arc;

/// The model-provider capability: send a text plus a prompt template, get
/// the model's reply back. Known API failures come back as `Error: ...`
/// reply strings; only transport-level failures are errors.
#[async_trait]
#[cfg_attr(test, automock)]
pub trait TextProvider {
    fn name(&self) -> &str;
    async fn process_text(
        &self,
        text: &str,
        template: &PromptTemplate,
        model: Option<String>,
    ) -> Result<String>;
}

pub type ArcProvider = Arc<dyn TextProvider + Send + Sync>;

/// All supported kinds speak the OpenAI wire API; the kind picks the
/// endpoint and default models.
pub fn new_provider(config: &ProviderConfig) -> Result<ArcProvider> {
    match config.kind.as_str() {
        "openai" | "groq" | "openrouter" => Ok(Arc::new(OpenAI::from(config))),
        other => eyre::bail!("Unsupported provider kind: {}", other),
    }
}
