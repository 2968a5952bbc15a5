use mcp_rust_sdk::protocol::RequestId;
use serde_json::json;

use crate::mcp::stdio::StdioTransport;
use crate::models::ToolInputSchema;

use super::*;
use std::sync::Arc;

fn fake_tool(name: &str, desc: &str) -> Tool {
    Tool {
        name: name.to_string(),
        description: Some(desc.to_string()),
        input_schema: ToolInputSchema::default(),
    }
}

fn mock_session(response: impl Into<String>, tools: Vec<Tool>) -> Session {
    let transport = Arc::new(StdioTransport::mock(response, None));
    Session {
        client: Client::with_transport(transport),
        tools,
    }
}

#[tokio::test]
async fn test_connect_all_isolates_failures() {
    let mut configs = HashMap::new();
    configs.insert(
        "broken".to_string(),
        ServerConfig {
            command: "/nonexistent/definitely-not-a-server".to_string(),
            args: vec![],
            env: HashMap::new(),
        },
    );
    configs.insert(
        "also-broken".to_string(),
        ServerConfig {
            command: "/nonexistent/another-missing-server".to_string(),
            args: vec![],
            env: HashMap::new(),
        },
    );

    let mut manager = Manager::default();
    // Must not fail, and must not leave half-connected sessions behind
    manager.connect_all(&configs).await;
    assert!(manager.servers().is_empty());
}

#[tokio::test]
async fn test_tools_for_unknown_server_is_empty() {
    let manager = Manager::default();
    assert!(manager.tools("nope").is_empty());
}

#[tokio::test]
async fn test_call_tool_server_not_connected() {
    let manager = Manager::default();
    let outcome = manager.call_tool("nope", "myip", json!({})).await;
    assert_eq!(
        outcome,
        ToolOutcome::Failure("Server nope not connected".to_string())
    );
}

#[tokio::test]
async fn test_call_tool_forwards_to_session() {
    let response = serde_json::to_string(&mcp_rust_sdk::Response::success(
        RequestId::Number(1),
        Some(json!({
            "content": [{"type": "text", "text": "127.0.0.1"}],
            "isError": false,
        })),
    ))
    .expect("serialize response");

    let mut manager = Manager::default();
    manager.sessions.insert(
        "net".to_string(),
        mock_session(response, vec![fake_tool("myip", "returns the caller ip")]),
    );

    let outcome = manager.call_tool("net", "myip", json!({})).await;
    assert!(!outcome.is_error(), "expected success, got {:?}", outcome);
}

#[tokio::test]
async fn test_call_tool_error_flag_becomes_failure() {
    let response = serde_json::to_string(&mcp_rust_sdk::Response::success(
        RequestId::Number(1),
        Some(json!({
            "content": [{"type": "text", "text": "lookup failed"}],
            "isError": true,
        })),
    ))
    .expect("serialize response");

    let mut manager = Manager::default();
    manager
        .sessions
        .insert("net".to_string(), mock_session(response, vec![]));

    let outcome = manager.call_tool("net", "myip", json!({})).await;
    assert_eq!(outcome, ToolOutcome::Failure("lookup failed".to_string()));
}

#[tokio::test]
async fn test_servers_and_cached_tools() {
    let mut manager = Manager::default();
    manager.sessions.insert(
        "net".to_string(),
        mock_session("{}", vec![fake_tool("myip", "ip lookup")]),
    );

    assert_eq!(manager.servers(), vec!["net".to_string()]);

    let tools = manager.tools("net");
    assert_eq!(tools.len(), 1);
    assert_eq!(tools[0].name, "myip");
    assert_eq!(tools[0].description.as_deref(), Some("ip lookup"));
}

#[tokio::test]
async fn test_close_all_clears_sessions() {
    let mut manager = Manager::default();
    manager
        .sessions
        .insert("net".to_string(), mock_session("{}", vec![]));
    manager
        .sessions
        .insert("fs".to_string(), mock_session("{}", vec![]));

    manager.close_all().await;
    assert!(manager.servers().is_empty());
    // Closing again is harmless
    manager.close_all().await;
    assert!(manager.servers().is_empty());
}
