pub mod client;
pub mod manager;
pub mod path;
pub mod registry;
pub mod stdio;

pub use client::Client;
pub use manager::Manager;
pub use registry::{Registry, ServerConfig};

#[cfg(test)]
use mockall::{automock, predicate::*};

use crate::models::{Tool, ToolOutcome};
use serde_json::Value;
use std::sync::Arc;

/// The read-and-call surface of the remote tool registry, as the agent's
/// dispatcher consumes it.
#[async_trait::async_trait]
#[cfg_attr(test, automock)]
pub trait RemoteToolbox: Send + Sync {
    /// Names of servers with a live session
    async fn servers(&self) -> Vec<String>;
    /// Cached tool list of a connected server; empty when unknown
    async fn tools(&self, server: &str) -> Vec<Tool>;
    /// Never fails; every error comes back as a Failure outcome
    async fn call_tool(&self, server: &str, tool: &str, args: Value) -> ToolOutcome;
}

pub type ArcToolbox = Arc<dyn RemoteToolbox>;
