#[cfg(test)]
#[path = "whisper_test.rs"]
mod tests;

use std::time;

use async_trait::async_trait;
use eyre::{Context, Result};
use reqwest::multipart;
use serde::{Deserialize, Serialize};

use crate::config::constants::{OPENAI_ENDPOINT, OPENAI_TRANSCRIPTION_MODEL};
use crate::config::{ProviderConfig, user_agent};
use crate::provider::openai::ApiError;

use super::Transcriber;

/// OpenAI-compatible audio transcription client (whisper family).
pub struct Whisper {
    endpoint: String,
    api_key: Option<String>,
    timeout: Option<time::Duration>,
    default_model: String,
    language: Option<String>,
}

#[async_trait]
impl Transcriber for Whisper {
    async fn transcribe_file(&self, path: &str, model: Option<String>) -> Result<String> {
        let model = model.unwrap_or_else(|| self.default_model.clone());
        let audio = tokio::fs::read(path)
            .await
            .wrap_err(format!("reading audio file {}", path))?;
        let filename = path.split('/').next_back().unwrap_or(path).to_string();

        let mut res = self.request(&audio, &filename, &model).await?;

        // Unknown model: retry once with the provider's default
        if res.status().as_u16() == 404 && model != self.default_model {
            log::warn!(
                "Transcription model {} not found, retrying with {}",
                model,
                self.default_model
            );
            res = self.request(&audio, &filename, &self.default_model).await?;
        }

        if !res.status().is_success() {
            let http_code = res.status().as_u16();
            let resp = res.text().await.wrap_err("reading error response")?;
            log::error!("Transcription error response: {}", resp);
            let err = serde_json::from_str::<ErrorResponse>(&resp)
                .wrap_err(format!("parsing error response: {}", resp))?;
            let mut err = err.error;
            err.http_code = http_code;
            return Err(err.into());
        }

        let res = res
            .json::<TranscriptionResponse>()
            .await
            .wrap_err("parsing transcription response")?;

        if !res.segments.is_empty() {
            let count = res.segments.len() as f64;
            let avg_logprob =
                res.segments.iter().map(|s| s.avg_logprob).sum::<f64>() / count;
            let no_speech_prob =
                res.segments.iter().map(|s| s.no_speech_prob).sum::<f64>() / count;

            if avg_logprob < -0.5 {
                log::warn!(
                    "Low average log probability ({:.3}). Possible transcription issues.",
                    avg_logprob
                );
            }
            if no_speech_prob > 0.5 {
                log::warn!(
                    "High no-speech probability ({:.3}). Possible silence or noise in audio.",
                    no_speech_prob
                );
            }
        }

        Ok(res.text)
    }
}

impl Whisper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }

    pub fn with_api_key(mut self, api_key: &str) -> Self {
        self.api_key = Some(api_key.to_string());
        self
    }

    pub fn with_default_model(mut self, model: &str) -> Self {
        self.default_model = model.to_string();
        self
    }

    pub fn with_language(mut self, language: &str) -> Self {
        if !language.is_empty() {
            self.language = Some(language.to_string());
        }
        self
    }

    async fn request(
        &self,
        audio: &[u8],
        filename: &str,
        model: &str,
    ) -> Result<reqwest::Response> {
        let mut form = multipart::Form::new()
            .part(
                "file",
                multipart::Part::bytes(audio.to_vec()).file_name(filename.to_string()),
            )
            .text("model", model.to_string())
            .text("response_format", "verbose_json");

        if let Some(language) = &self.language {
            form = form.text("language", language.clone());
        }

        let mut req = reqwest::Client::new()
            .post(format!("{}/v1/audio/transcriptions", self.endpoint))
            .header("User-Agent", user_agent());

        if let Some(timeout) = self.timeout {
            req = req.timeout(timeout);
        }

        if let Some(token) = &self.api_key {
            req = req.bearer_auth(token);
        }

        req.multipart(form)
            .send()
            .await
            .wrap_err("sending transcription request")
    }
}

impl Default for Whisper {
    fn default() -> Self {
        Self {
            endpoint: OPENAI_ENDPOINT.to_string(),
            api_key: None,
            timeout: None,
            default_model: OPENAI_TRANSCRIPTION_MODEL.to_string(),
            language: None,
        }
    }
}

impl From<&ProviderConfig> for Whisper {
    fn from(config: &ProviderConfig) -> Self {
        let mut whisper = Whisper::default()
            .with_endpoint(config.endpoint())
            .with_default_model(config.transcription_model());

        if let Some(api_key) = config.api_key.as_deref() {
            whisper.api_key = Some(api_key.to_string());
        }

        if let Some(timeout) = config.timeout() {
            whisper.timeout = Some(timeout);
        }

        whisper
    }
}

#[derive(Default, Debug, Serialize, Deserialize)]
struct TranscriptionResponse {
    text: String,
    #[serde(default)]
    segments: Vec<TranscriptionSegment>,
}

#[derive(Default, Debug, Serialize, Deserialize)]
struct TranscriptionSegment {
    #[serde(default)]
    avg_logprob: f64,
    #[serde(default)]
    no_speech_prob: f64,
}

#[derive(Default, Debug, Serialize, Deserialize)]
struct ErrorResponse {
    error: ApiError,
}
