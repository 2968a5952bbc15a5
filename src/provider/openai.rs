#[cfg(test)]
#[path = "openai_test.rs"]
mod tests;

use std::fmt::Display;
use std::time;

use async_trait::async_trait;
use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::constants::{CHAT_TEMPERATURE, OPENAI_CHAT_MODEL, OPENAI_ENDPOINT};
use crate::config::{ProviderConfig, user_agent};
use crate::models::Message;
use crate::prompts::PromptTemplate;

use super::TextProvider;

pub struct OpenAI {
    alias: String,
    endpoint: String,
    api_key: Option<String>,
    timeout: Option<time::Duration>,
    default_model: String,
    temperature: f32,
}

#[async_trait]
impl TextProvider for OpenAI {
    fn name(&self) -> &str {
        &self.alias
    }

    async fn process_text(
        &self,
        text: &str,
        template: &PromptTemplate,
        model: Option<String>,
    ) -> Result<String> {
        let model = model.unwrap_or_else(|| self.default_model.clone());

        let completion_req = CompletionRequest {
            model,
            messages: vec![
                Message::system(&template.system_prompt),
                Message::user(text),
            ],
            temperature: self.temperature,
        };

        let mut req = reqwest::Client::new()
            .post(format!("{}/v1/chat/completions", self.endpoint))
            .header("Content-Type", "application/json")
            .header("User-Agent", user_agent());

        if let Some(timeout) = self.timeout {
            req = req.timeout(timeout);
        }

        if let Some(token) = &self.api_key {
            req = req.bearer_auth(token);
        }

        log::trace!("Sending completion request: {:?}", completion_req);

        let res = req
            .json(&completion_req)
            .send()
            .await
            .wrap_err("sending completion request")?;

        if !res.status().is_success() {
            let http_code = res.status().as_u16();
            let resp = res.text().await.wrap_err("reading error response")?;
            log::error!("Error response: {}", resp);
            let err = serde_json::from_str::<ErrorResponse>(&resp)
                .wrap_err(format!("parsing error response: {}", resp))?;
            let mut err = err.error;
            err.http_code = http_code;
            // Known API failure types become reply strings the caller can
            // show verbatim; anything else propagates.
            return match err.err_type.as_str() {
                "not_found" => {
                    Ok("Error: Model not found. Please check the model name.".to_string())
                }
                "invalid_request_error" => {
                    Ok("Error: Invalid request. Please check the parameters.".to_string())
                }
                "api_connection_error" => Ok(
                    "Error: Connection to API server failed. Please check your internet connection."
                        .to_string(),
                ),
                _ => Err(err.into()),
            };
        }

        let res = res
            .json::<CompletionResponse>()
            .await
            .wrap_err("parsing completion response")?;

        let content = res
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();
        Ok(content)
    }
}

impl OpenAI {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_alias(mut self, alias: &str) -> Self {
        self.alias = alias.to_string();
        self
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }

    pub fn with_api_key(mut self, api_key: &str) -> Self {
        self.api_key = Some(api_key.to_string());
        self
    }

    pub fn with_timeout(mut self, timeout: time::Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_default_model(mut self, model: &str) -> Self {
        self.default_model = model.to_string();
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Default for OpenAI {
    fn default() -> Self {
        Self {
            alias: "openai".to_string(),
            endpoint: OPENAI_ENDPOINT.to_string(),
            api_key: None,
            timeout: None,
            default_model: OPENAI_CHAT_MODEL.to_string(),
            temperature: CHAT_TEMPERATURE,
        }
    }
}

impl From<&ProviderConfig> for OpenAI {
    fn from(config: &ProviderConfig) -> Self {
        let mut openai = OpenAI::default()
            .with_alias(&config.kind)
            .with_endpoint(config.endpoint())
            .with_default_model(config.chat_model());

        if let Some(api_key) = config.api_key.as_deref() {
            openai.api_key = Some(api_key.to_string());
        }

        if let Some(timeout) = config.timeout() {
            openai.timeout = Some(timeout);
        }

        openai
    }
}

#[derive(Debug, Serialize)]
struct CompletionRequest {
    model: String,
    messages: Vec<Message>,
    temperature: f32,
}

#[derive(Default, Debug, Serialize, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoiceResponse>,
}

#[derive(Default, Debug, Serialize, Deserialize)]
struct CompletionChoiceResponse {
    message: CompletionMessageResponse,
}

#[derive(Default, Debug, Serialize, Deserialize)]
struct CompletionMessageResponse {
    content: Option<String>,
}

#[derive(Default, Debug, Serialize, Deserialize)]
struct ErrorResponse {
    error: ApiError,
}

#[derive(Default, Error, Debug, Serialize, Deserialize)]
pub struct ApiError {
    #[serde(skip)]
    pub http_code: u16,
    pub message: String,
    #[serde(rename = "type", default)]
    pub err_type: String,
    pub param: Option<String>,
    pub code: Option<String>,
}

impl Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "API error ({}): {}", self.http_code, self.message)
    }
}
