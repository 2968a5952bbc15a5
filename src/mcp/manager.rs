#[cfg(test)]
#[path = "manager_test.rs"]
mod tests;

use std::collections::HashMap;

use eyre::{Context, Result};
use serde_json::Value;

use crate::models::{Tool, ToolOutcome};

use super::client::Client;
use super::registry::ServerConfig;

/// Owns every live server session. Sessions exist only between
/// connect_all and close_all; nothing here is persisted.
#[derive(Default)]
pub struct Manager {
    sessions: HashMap<String, Session>,
}

struct Session {
    client: Client,
    tools: Vec<Tool>,
}

impl Manager {
    /// Connects every configured server: spawn the process, run the
    /// initialize handshake, cache the tool list. A failing server is
    /// logged and skipped; the rest still connect. No retries.
    pub async fn connect_all(&mut self, configs: &HashMap<String, ServerConfig>) {
        for (name, config) in configs {
            match Self::connect(config).await {
                Ok(session) => {
                    log::info!(
                        "Connected to MCP server {} with {} tools",
                        name,
                        session.tools.len()
                    );
                    self.sessions.insert(name.clone(), session);
                }
                Err(err) => log::error!("Failed to connect to MCP server {}: {:#}", name, err),
            }
        }
    }

    async fn connect(config: &ServerConfig) -> Result<Session> {
        let client = Client::spawn(config).wrap_err("spawning server")?;
        client.initialize().await.wrap_err("initializing session")?;
        let tools = client.list_tools().await.wrap_err("listing tools")?;
        Ok(Session { client, tools })
    }

    /// Names of servers with a live session
    pub fn servers(&self) -> Vec<String> {
        self.sessions.keys().cloned().collect()
    }

    /// Cached tool descriptors of a connected server. An unknown or
    /// disconnected name yields an empty list, not an error.
    pub fn tools(&self, server: &str) -> Vec<Tool> {
        self.sessions
            .get(server)
            .map(|s| s.tools.clone())
            .unwrap_or_default()
    }

    /// Forwards a call to the server's session. Never fails: a missing
    /// session and a failed call both come back as Failure outcomes.
    pub async fn call_tool(&self, server: &str, tool: &str, args: Value) -> ToolOutcome {
        let session = match self.sessions.get(server) {
            Some(session) => session,
            None => return ToolOutcome::Failure(format!("Server {} not connected", server)),
        };
        match session.client.call_tool(tool, Some(args)).await {
            Ok(result) => result.into_outcome(),
            Err(err) => ToolOutcome::Failure(format!("{:#}", err)),
        }
    }

    /// Tears down every session. A failing teardown is logged and does
    /// not stop the remaining subprocesses from being killed.
    pub async fn close_all(&mut self) {
        for (name, session) in self.sessions.drain() {
            if let Err(err) = session.client.close().await {
                log::error!("Failed to close MCP server {}: {}", name, err);
            }
        }
    }
}
