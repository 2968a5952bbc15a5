use super::constants::*;

pub(crate) fn agent_name() -> String {
    AGENT_NAME.to_string()
}

pub(crate) fn agent_system_prompt() -> String {
    AGENT_SYSTEM_PROMPT.to_string()
}

pub(crate) fn log_level() -> Option<String> {
    Some("info".to_string())
}

pub(crate) fn log_file_path() -> String {
    LOG_FILE_PATH.to_string()
}

pub(crate) fn provider_kind() -> String {
    "openai".to_string()
}

pub(crate) fn mcp_config_path() -> String {
    MCP_CONFIG_PATH.to_string()
}

pub(crate) fn transcription_prompt() -> String {
    "proofreader".to_string()
}
