use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::constants::*;
use super::defaults::*;

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Configuration {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub log: LogConfig,

    #[serde(default)]
    pub provider: ProviderConfig,

    #[serde(default)]
    pub transcription: TranscriptionConfig,

    #[serde(default)]
    pub mcp: McpConfig,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct GeneralConfig {
    /// Name the agent introduces itself with in the system prompt
    #[serde(default = "agent_name")]
    pub agent_name: String,

    #[serde(default = "agent_system_prompt")]
    pub system_prompt: String,

    #[serde(default)]
    pub verbose: bool,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct LogConfig {
    #[serde(default = "log_level")]
    pub level: Option<String>,

    #[serde(default)]
    pub filters: Option<Vec<LogFilter>>,

    #[serde(default)]
    pub file: LogFile,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct LogFilter {
    #[serde(default)]
    pub module: Option<String>,

    #[serde(default)]
    pub level: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct LogFile {
    #[serde(default = "log_file_path")]
    pub path: String,

    #[serde(default)]
    pub append: bool,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ProviderConfig {
    /// One of "openai", "groq" or "openrouter"
    #[serde(default = "provider_kind")]
    pub kind: String,

    #[serde(default)]
    pub api_key: Option<String>,

    /// Overrides the kind's default base endpoint
    #[serde(default)]
    pub endpoint: Option<String>,

    #[serde(default)]
    pub chat_model: Option<String>,

    #[serde(default)]
    pub transcription_model: Option<String>,

    #[serde(default)]
    pub timeout_secs: Option<u16>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct TranscriptionConfig {
    /// ISO language hint passed to the transcription endpoint
    #[serde(default)]
    pub language: Option<String>,

    /// Built-in prompt template used by transcribe-and-process
    #[serde(default = "transcription_prompt")]
    pub prompt: String,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct McpConfig {
    /// Path to the JSON server store ({"mcpServers": {...}})
    #[serde(default = "mcp_config_path")]
    pub config_path: String,
}

impl ProviderConfig {
    pub fn endpoint(&self) -> &str {
        match self.endpoint.as_deref() {
            Some(endpoint) => endpoint,
            None => match self.kind.as_str() {
                "groq" => GROQ_ENDPOINT,
                "openrouter" => OPENROUTER_ENDPOINT,
                _ => OPENAI_ENDPOINT,
            },
        }
    }

    pub fn chat_model(&self) -> &str {
        match self.chat_model.as_deref() {
            Some(model) => model,
            None => match self.kind.as_str() {
                "groq" => GROQ_CHAT_MODEL,
                "openrouter" => OPENROUTER_CHAT_MODEL,
                _ => OPENAI_CHAT_MODEL,
            },
        }
    }

    pub fn transcription_model(&self) -> &str {
        match self.transcription_model.as_deref() {
            Some(model) => model,
            None => match self.kind.as_str() {
                // Groq and OpenRouter both route to whisper-large-v3
                "groq" | "openrouter" => GROQ_TRANSCRIPTION_MODEL,
                _ => OPENAI_TRANSCRIPTION_MODEL,
            },
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(|t| Duration::from_secs(t as u64))
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            log: LogConfig::default(),
            provider: ProviderConfig::default(),
            transcription: TranscriptionConfig::default(),
            mcp: McpConfig::default(),
        }
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            agent_name: agent_name(),
            system_prompt: agent_system_prompt(),
            verbose: false,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: log_level(),
            filters: None,
            file: LogFile::default(),
        }
    }
}

impl Default for LogFile {
    fn default() -> Self {
        Self {
            path: log_file_path(),
            append: false,
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: provider_kind(),
            api_key: None,
            endpoint: None,
            chat_model: None,
            transcription_model: None,
            timeout_secs: None,
        }
    }
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            language: None,
            prompt: transcription_prompt(),
        }
    }
}

impl Default for McpConfig {
    fn default() -> Self {
        Self {
            config_path: mcp_config_path(),
        }
    }
}
