#[cfg(test)]
#[path = "think_test.rs"]
mod tests;

use async_trait::async_trait;
use eyre::Result;
use serde_json::Value;

use super::super::LocalTool;

/// Lets the model articulate its reasoning without any external call;
/// the thought is simply echoed back.
pub struct ThinkTool;

#[async_trait]
impl LocalTool for ThinkTool {
    fn name(&self) -> &str {
        "think"
    }

    fn description(&self) -> &str {
        "Think through a problem step by step"
    }

    async fn execute(&self, args: &Value) -> Result<Value> {
        let thought = args
            .get("thought")
            .and_then(Value::as_str)
            .unwrap_or_default();
        Ok(Value::String(format!("I thought about: {}", thought)))
    }
}
