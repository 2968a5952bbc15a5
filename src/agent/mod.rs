pub mod agent;
pub mod tools;

pub use agent::{Agent, ProcessedAudio};

#[cfg(test)]
use mockall::{automock, predicate::*};

use async_trait::async_trait;
use eyre::Result;
use serde_json::Value;
use std::sync::Arc;

/// An in-process tool. Expected failures (missing argument, downstream
/// call failure) are reported through `Err`; the dispatcher converts
/// them into error outcomes at its boundary.
#[async_trait]
#[cfg_attr(test, automock)]
pub trait LocalTool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    async fn execute(&self, args: &Value) -> Result<Value>;
}

pub type ArcLocalTool = Arc<dyn LocalTool>;
