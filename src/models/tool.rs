#[cfg(test)]
#[path = "tool_test.rs"]
mod tests;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::collections::HashMap;

/// A tool advertised by an MCP server via tools/list.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub input_schema: ToolInputSchema,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct ToolInputSchema {
    #[serde(rename = "type", default)]
    pub type_name: String,
    #[serde(default)]
    pub properties: HashMap<String, ToolInputSchemaProperty>,
    #[serde(default)]
    pub required: Vec<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ToolInputSchemaProperty {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(rename = "type")]
    pub type_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(rename = "enum")]
    pub enum_values: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Wire result of a tools/call request.
#[derive(Deserialize, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CallToolResult {
    pub content: Vec<CallToolResultContent>,
    #[serde(default)] // This will default to false if missing
    pub is_error: bool,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CallToolResultContent {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "image")]
    Image {
        data: String,
        #[serde(rename = "mimeType")]
        mime_type: String,
    },
    #[serde(rename = "resource")]
    Resource { resource: ResourceContent },
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceContent {
    pub uri: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    pub text: Option<String>,
    pub blob: Option<String>,
}

impl CallToolResult {
    /// Flattens the content payload plus the error flag into an outcome.
    /// Error results carry the joined text content as the message.
    pub fn into_outcome(self) -> ToolOutcome {
        if self.is_error {
            let message = self.text_content();
            let message = if message.is_empty() {
                "Tool call failed".to_string()
            } else {
                message
            };
            return ToolOutcome::Failure(message);
        }
        match serde_json::to_value(&self.content) {
            Ok(value) => ToolOutcome::Success(value),
            Err(err) => ToolOutcome::Failure(format!("serializing tool content: {}", err)),
        }
    }

    pub fn text_content(&self) -> String {
        self.content
            .iter()
            .filter_map(|c| match c {
                CallToolResultContent::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Where a tool in the unified namespace comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolKind {
    Local,
    Remote { server: String },
}

/// A listing entry in the unified tool namespace. Built fresh on every
/// listing request; the map key is the dispatch identifier (bare name for
/// local tools, `server:tool` for remote ones).
#[derive(Debug, Clone, PartialEq)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub kind: ToolKind,
}

impl ToolDescriptor {
    /// Origin label rendered into the system prompt ("local" or the
    /// owning server name).
    pub fn origin(&self) -> &str {
        match &self.kind {
            ToolKind::Local => "local",
            ToolKind::Remote { server } => server,
        }
    }
}

/// A tool invocation extracted from a model reply or built by a caller.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ToolCall {
    pub tool: String,
    pub args: Value,
}

/// The normalized outcome of any tool invocation, local or remote.
/// Exactly one branch exists by construction; serializes to
/// `{"result": ...}` or `{"error": ..., "isError": true}`.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutcome {
    Success(Value),
    Failure(String),
}

impl ToolOutcome {
    pub fn is_error(&self) -> bool {
        matches!(self, ToolOutcome::Failure(_))
    }

    /// Renders the outcome the way the conversation loop feeds it back to
    /// the model: the stringified result, or the error prefixed `ERROR:`.
    pub fn render(&self) -> String {
        match self {
            ToolOutcome::Success(value) => match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            },
            ToolOutcome::Failure(message) => format!("ERROR: {}", message),
        }
    }
}

impl Serialize for ToolOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(match self {
            ToolOutcome::Success(_) => 1,
            ToolOutcome::Failure(_) => 2,
        }))?;
        match self {
            ToolOutcome::Success(value) => {
                map.serialize_entry("result", value)?;
            }
            ToolOutcome::Failure(message) => {
                map.serialize_entry("error", message)?;
                map.serialize_entry("isError", &true)?;
            }
        }
        map.end()
    }
}
