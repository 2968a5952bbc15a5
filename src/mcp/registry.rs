#[cfg(test)]
#[path = "registry_test.rs"]
mod tests;

use std::collections::HashMap;

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::RwLock;

use crate::models::{Tool, ToolOutcome};

use super::RemoteToolbox;
use super::manager::Manager;

/// Launch description of one configured MCP server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub env: HashMap<String, String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ConfigDocument {
    #[serde(rename = "mcpServers", default)]
    mcp_servers: HashMap<String, ServerConfig>,
}

/// Durable server store plus the facade over the session manager.
/// Shared across call sites by explicit `Arc`, never as a process
/// global. The connected flag is the source of truth for every read:
/// while it is false the facade reports nothing, whatever the manager
/// may still hold.
pub struct Registry {
    config_path: String,
    state: RwLock<State>,
}

#[derive(Default)]
struct State {
    servers: HashMap<String, ServerConfig>,
    manager: Manager,
    connected: bool,
}

impl Registry {
    /// Opens the store at `config_path`, creating it with an empty
    /// server mapping when absent.
    pub fn open(config_path: impl Into<String>) -> Result<Self> {
        let config_path = config_path.into();
        if !std::path::Path::new(&config_path).exists() {
            write_document(&config_path, &ConfigDocument::default())?;
        }
        let servers = read_document(&config_path)?.mcp_servers;
        Ok(Self {
            config_path,
            state: RwLock::new(State {
                servers,
                ..Default::default()
            }),
        })
    }

    /// Re-reads the server mapping from disk. Live sessions are left
    /// untouched; a fresh connect() picks the changes up.
    pub async fn reload(&self) -> Result<()> {
        let servers = read_document(&self.config_path)?.mcp_servers;
        self.state.write().await.servers = servers;
        Ok(())
    }

    /// Adds or replaces a server (last write wins per name), persists
    /// the whole store and reloads the in-memory mapping.
    pub async fn add_server(&self, name: &str, config: ServerConfig) -> Result<()> {
        let mut document = read_document(&self.config_path)?;
        document.mcp_servers.insert(name.to_string(), config);
        write_document(&self.config_path, &document)?;
        self.reload().await
    }

    /// Removes a server if present. Returns whether an entry existed.
    pub async fn remove_server(&self, name: &str) -> Result<bool> {
        let mut document = read_document(&self.config_path)?;
        let existed = document.mcp_servers.remove(name).is_some();
        if existed {
            write_document(&self.config_path, &document)?;
            self.reload().await?;
        }
        Ok(existed)
    }

    pub async fn server_configs(&self) -> HashMap<String, ServerConfig> {
        self.state.read().await.servers.clone()
    }

    /// Connects every configured server. Partial connectivity is an
    /// accepted steady state; per-server failures are logged by the
    /// manager. Reconnecting tears live sessions down first so config
    /// changes take effect.
    pub async fn connect(&self) {
        let mut state = self.state.write().await;
        if state.connected {
            state.manager.close_all().await;
        }
        let configs = state.servers.clone();
        state.manager.connect_all(&configs).await;
        state.connected = true;
    }

    /// Disconnects every server. A repeated disconnect is a no-op.
    pub async fn disconnect(&self) {
        let mut state = self.state.write().await;
        if !state.connected {
            return;
        }
        state.manager.close_all().await;
        state.connected = false;
    }

    pub async fn connected(&self) -> bool {
        self.state.read().await.connected
    }

    pub fn config_path(&self) -> &str {
        &self.config_path
    }
}

#[async_trait::async_trait]
impl RemoteToolbox for Registry {
    async fn servers(&self) -> Vec<String> {
        let state = self.state.read().await;
        if !state.connected {
            return vec![];
        }
        state.manager.servers()
    }

    async fn tools(&self, server: &str) -> Vec<Tool> {
        let state = self.state.read().await;
        if !state.connected {
            return vec![];
        }
        state.manager.tools(server)
    }

    async fn call_tool(&self, server: &str, tool: &str, args: Value) -> ToolOutcome {
        let state = self.state.read().await;
        if !state.connected {
            return ToolOutcome::Failure("Not connected to MCP servers".to_string());
        }
        state.manager.call_tool(server, tool, args).await
    }
}

fn read_document(path: &str) -> Result<ConfigDocument> {
    let raw = std::fs::read_to_string(path).wrap_err(format!("reading {}", path))?;
    serde_json::from_str(&raw).wrap_err("parsing server store")
}

fn write_document(path: &str, document: &ConfigDocument) -> Result<()> {
    let raw = serde_json::to_string_pretty(document).wrap_err("serializing server store")?;
    std::fs::write(path, raw).wrap_err(format!("writing {}", path))
}
