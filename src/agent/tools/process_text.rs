#[cfg(test)]
#[path = "process_text_test.rs"]
mod tests;

use async_trait::async_trait;
use eyre::{Context, Result};
use serde_json::Value;

use crate::prompts::PromptTemplate;
use crate::provider::ArcProvider;

use super::super::LocalTool;

/// Runs a text through the model provider under a caller-supplied
/// system prompt.
pub struct TextProcessingTool {
    provider: ArcProvider,
    default_model: String,
}

impl TextProcessingTool {
    pub fn new(provider: ArcProvider, default_model: impl Into<String>) -> Self {
        Self {
            provider,
            default_model: default_model.into(),
        }
    }
}

#[async_trait]
impl LocalTool for TextProcessingTool {
    fn name(&self) -> &str {
        "process_text"
    }

    fn description(&self) -> &str {
        "Process text using AI"
    }

    async fn execute(&self, args: &Value) -> Result<Value> {
        let text = args.get("text").and_then(Value::as_str).unwrap_or_default();
        if text.is_empty() {
            eyre::bail!("No text provided");
        }

        let system_prompt = args
            .get("system_prompt")
            .and_then(Value::as_str)
            .unwrap_or_default();
        if system_prompt.is_empty() {
            eyre::bail!("No system prompt provided");
        }

        let model = args
            .get("model")
            .and_then(Value::as_str)
            .unwrap_or(&self.default_model)
            .to_string();

        let template = PromptTemplate::new("custom", "Custom prompt", system_prompt);
        let processed = self
            .provider
            .process_text(text, &template, Some(model))
            .await
            .wrap_err("processing text")?;
        Ok(Value::String(processed))
    }
}
