use crate::config::constants::{GROQ_CHAT_MODEL, GROQ_ENDPOINT, LOG_FILE_PATH};

use super::*;

#[test]
fn test_load_configuration() {
    let config = load_configuration("./testdata/config.toml").expect("failed to load config");

    assert_eq!(config.general.agent_name, "Transcript Helper");
    assert_eq!(config.general.system_prompt, "Answer in German.");
    assert_eq!(config.general.verbose, true);

    let log = &config.log;
    assert_eq!(log.level.as_deref(), Some("debug"));
    let log_filters = log.filters.as_deref().unwrap_or_default();
    assert_eq!(log_filters.len(), 1);
    assert_eq!(log_filters[0].module.as_deref(), Some("palaver::mcp"));
    assert_eq!(log_filters[0].level.as_deref(), Some("trace"));

    let log_file = &log.file;
    assert_eq!(log_file.path, "/var/logs/palaver.log");
    assert_eq!(log_file.append, true);

    let provider = &config.provider;
    assert_eq!(provider.kind, "groq");
    assert_eq!(provider.api_key.as_deref(), Some("test-key"));
    assert_eq!(provider.endpoint(), GROQ_ENDPOINT);
    assert_eq!(provider.chat_model(), "llama-3.1-8b-instant");
    assert_eq!(provider.transcription_model(), "whisper-large-v3-turbo");
    assert_eq!(provider.timeout_secs, Some(60));

    assert_eq!(config.transcription.language.as_deref(), Some("de"));
    assert_eq!(config.transcription.prompt, "translator");

    assert_eq!(config.mcp.config_path, "/etc/palaver/mcp_config.json");
}

#[test]
fn test_load_configuration_with_some_default_fields() {
    let config = load_configuration("./testdata/config_with_default.toml")
        .expect("failed to load config");

    let log = &config.log;
    assert_eq!(log.level.as_deref(), Some("info"));
    assert_eq!(log.file.path, LOG_FILE_PATH);

    let provider = &config.provider;
    assert_eq!(provider.kind, "groq");
    assert_eq!(provider.endpoint(), GROQ_ENDPOINT);
    assert_eq!(provider.chat_model(), GROQ_CHAT_MODEL);

    assert_eq!(config.mcp.config_path, "mcp_config.json");
    assert_eq!(config.transcription.prompt, "proofreader");
}

#[test]
fn test_resolve_path() {
    let ret = resolve_path("$TEST_PATH/${USER_PATH}/config.toml").expect("failed to resolve path");
    assert_eq!(ret, "//config.toml");

    let dir = "/tmp/test";
    let user_path = "user_path";
    unsafe {
        std::env::set_var("TEST_PATH", dir);
        std::env::set_var("USER_PATH", user_path);
    }
    let ret = resolve_path("$TEST_PATH/${USER_PATH}/config.toml").expect("failed to resolve path");
    assert_eq!(ret, format!("{dir}/{user_path}/config.toml"));
}
