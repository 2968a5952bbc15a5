pub const LOG_FILE_PATH: &str = "/tmp/palaver.log";

pub const MCP_CONFIG_PATH: &str = "mcp_config.json";

/// Max seconds to wait for a single line from a server's stdout
pub const STDIO_READ_TIMEOUT_SECS: u64 = 60;

pub const MCP_PROTOCOL_VERSION: &str = "2024-11-05";

pub const AGENT_NAME: &str = "Palaver";

pub const AGENT_SYSTEM_PROMPT: &str =
    "You are a helpful assistant. Answer concisely and use tools when they help.";

// All supported providers speak the OpenAI wire API; only the base
// endpoint and default models differ.
pub const OPENAI_ENDPOINT: &str = "https://api.openai.com";
pub const GROQ_ENDPOINT: &str = "https://api.groq.com/openai";
pub const OPENROUTER_ENDPOINT: &str = "https://openrouter.ai/api";

pub const OPENAI_CHAT_MODEL: &str = "gpt-4o-mini";
pub const GROQ_CHAT_MODEL: &str = "llama-3.3-70b-versatile";
pub const OPENROUTER_CHAT_MODEL: &str = "openai/gpt-4o-mini";

pub const OPENAI_TRANSCRIPTION_MODEL: &str = "whisper-1";
pub const GROQ_TRANSCRIPTION_MODEL: &str = "whisper-large-v3";

pub const CHAT_TEMPERATURE: f32 = 0.2;
