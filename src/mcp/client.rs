#[cfg(test)]
#[path = "client_test.rs"]
mod tests;

use std::{collections::HashMap, sync::Arc};

use eyre::{Context, Result};
use mcp_rust_sdk::transport::Transport;
use serde_json::Value;

use crate::config::constants::MCP_PROTOCOL_VERSION;
use crate::config::{APP_NAME, VERSION};
use crate::models::{CallToolResult, Tool};

use super::path;
use super::registry::ServerConfig;
use super::stdio::StdioTransport;

/// One connected server: the protocol client plus the transport handle
/// used to tear the subprocess down again.
pub struct Client {
    inner: mcp_rust_sdk::client::Client,
    transport: Arc<StdioTransport>,
}

impl Client {
    /// Spawns the server process described by the config. Path arguments
    /// are rewritten for the detected host environment first.
    pub fn spawn(config: &ServerConfig) -> Result<Self> {
        let args = path::normalize_args(&config.args);
        let transport = Arc::new(
            StdioTransport::spawn(&config.command, &args, &config.env)
                .wrap_err("initializing stdio transport")?,
        );
        Ok(Self::with_transport(transport))
    }

    pub(crate) fn with_transport(transport: Arc<StdioTransport>) -> Self {
        Self {
            inner: mcp_rust_sdk::client::Client::new(transport.clone()),
            transport,
        }
    }

    /// Performs the protocol handshake. Must complete before any other
    /// request is issued on this session.
    pub async fn initialize(&self) -> Result<()> {
        let params = serde_json::json!({
            "protocolVersion": MCP_PROTOCOL_VERSION,
            "capabilities": {},
            "clientInfo": { "name": APP_NAME, "version": VERSION },
        });
        self.inner
            .request("initialize", Some(params))
            .await
            .wrap_err("initializing session")?;
        Ok(())
    }

    pub async fn list_tools(&self) -> Result<Vec<Tool>> {
        let resp = self
            .inner
            .request("tools/list", None)
            .await
            .wrap_err("requesting tools")?;
        // {"tools": [...]}
        let mut resp: HashMap<String, Vec<Tool>> =
            serde_json::from_value(resp).wrap_err("parsing response")?;
        let tools = resp
            .remove("tools")
            .ok_or_else(|| eyre::eyre!("missing tools in response"))?;
        Ok(tools)
    }

    pub async fn call_tool(&self, tool: &str, args: Option<Value>) -> Result<CallToolResult> {
        let resp = self
            .inner
            .request(
                "tools/call",
                Some(serde_json::json!({ "name": tool, "arguments": args })),
            )
            .await
            .wrap_err("requesting tool call")?;
        let result: CallToolResult = serde_json::from_value(resp).wrap_err("parsing response")?;
        Ok(result)
    }

    /// Kills the server subprocess.
    pub async fn close(&self) -> Result<()> {
        self.transport.close().await.wrap_err("closing transport")?;
        Ok(())
    }
}
