#[cfg(test)]
#[path = "agent_test.rs"]
mod tests;

use std::collections::BTreeMap;

use eyre::{Context, Result};
use serde_json::Value;

use crate::mcp::ArcToolbox;
use crate::models::{
    ArcEventTx, Event, Message, ToolCall, ToolDescriptor, ToolKind, ToolOutcome,
};
use crate::prompts::PromptTemplate;
use crate::provider::ArcProvider;

use super::ArcLocalTool;

/// The result of the transcribe-and-process pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedAudio {
    pub original_text: String,
    pub processed_text: String,
}

/// The assistant core: one namespace over local and remote tools, and
/// the single-turn conversation loop that drives them.
pub struct Agent {
    name: String,
    system: String,
    chat_model: Option<String>,
    local_tools: Vec<ArcLocalTool>,
    toolbox: Option<ArcToolbox>,
    provider: Option<ArcProvider>,
}

impl Agent {
    pub fn new(name: impl Into<String>, system: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            system: system.into(),
            chat_model: None,
            local_tools: Vec::new(),
            toolbox: None,
            provider: None,
        }
    }

    pub fn with_tool(mut self, tool: ArcLocalTool) -> Self {
        self.local_tools.push(tool);
        self
    }

    pub fn with_toolbox(mut self, toolbox: ArcToolbox) -> Self {
        self.toolbox = Some(toolbox);
        self
    }

    pub fn with_provider(mut self, provider: ArcProvider) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn with_chat_model(mut self, model: &str) -> Self {
        self.chat_model = Some(model.to_string());
        self
    }

    /// The unified tool namespace, rebuilt on every call: local tools
    /// under their bare name, remote tools under `server:tool`. A local
    /// tool shadows a remote entry with the same identifier.
    pub async fn available_tools(&self) -> BTreeMap<String, ToolDescriptor> {
        let mut tools = BTreeMap::new();

        for tool in &self.local_tools {
            tools.insert(
                tool.name().to_string(),
                ToolDescriptor {
                    name: tool.name().to_string(),
                    description: tool.description().to_string(),
                    kind: ToolKind::Local,
                },
            );
        }

        if let Some(toolbox) = self.toolbox.as_ref() {
            for server in toolbox.servers().await {
                for tool in toolbox.tools(&server).await {
                    let id = format!("{}:{}", server, tool.name);
                    tools.entry(id).or_insert_with(|| ToolDescriptor {
                        name: tool.name.clone(),
                        description: tool.description.clone().unwrap_or_default(),
                        kind: ToolKind::Remote {
                            server: server.clone(),
                        },
                    });
                }
            }
        }

        tools
    }

    /// Resolves and runs a tool. Resolution order: exact local name
    /// match, then `server:tool` against the currently connected
    /// servers, then "tool not found". Errors never propagate; they
    /// come back as Failure outcomes.
    pub async fn execute_tool(&self, tool_id: &str, args: Value) -> ToolOutcome {
        for tool in &self.local_tools {
            if tool.name() == tool_id {
                return match tool.execute(&args).await {
                    Ok(value) => ToolOutcome::Success(value),
                    Err(err) => {
                        log::error!("Error executing local tool {}: {:#}", tool_id, err);
                        ToolOutcome::Failure(format!("Error executing tool: {:#}", err))
                    }
                };
            }
        }

        if let Some((server, tool)) = tool_id.split_once(':') {
            if let Some(toolbox) = self.toolbox.as_ref() {
                if toolbox.servers().await.iter().any(|s| s == server) {
                    return toolbox.call_tool(server, tool, args).await;
                }
            }
        }

        ToolOutcome::Failure(format!("Tool not found: {}", tool_id))
    }

    /// Runs one conversation turn: ask the model, execute at most one
    /// requested tool, feed its result back, return the final answer.
    /// Never fails; every error becomes the turn's answer text.
    pub async fn process(&self, input: &str, events: Option<ArcEventTx>) -> String {
        match self.run_turn(input, &events).await {
            Ok(answer) => answer,
            Err(err) => {
                let message = format!("Error processing input: {:#}", err);
                log::error!("{}", message);
                emit(&events, Event::Answer(message.clone())).await;
                message
            }
        }
    }

    async fn run_turn(&self, input: &str, events: &Option<ArcEventTx>) -> Result<String> {
        let provider = self
            .provider
            .as_ref()
            .ok_or_else(|| eyre::eyre!("Agent not properly initialized with a text provider"))?;

        let template = self.agent_template().await;
        let mut history = vec![
            Message::system(&template.system_prompt),
            Message::user(input),
        ];

        let raw = provider
            .process_text(input, &template, self.chat_model.clone())
            .await
            .wrap_err("requesting model reply")?;

        if raw.is_empty() {
            let message = "Failed to get a response from the AI provider".to_string();
            log::error!("{}", message);
            emit(events, Event::Answer(message.clone())).await;
            return Ok(message);
        }

        let call = match extract_tool_call(&raw) {
            Some(call) => call,
            None => {
                // Not a tool call; the reply is the answer
                emit(events, Event::Answer(raw.clone())).await;
                return Ok(raw);
            }
        };

        emit(
            events,
            Event::Status(format!("Executing tool: {}...", call.tool)),
        )
        .await;

        let outcome = self.execute_tool(&call.tool, call.args).await;

        history.push(Message::assistant(&raw));
        let feedback = format!("Tool execution result:\n{}", outcome.render());
        history.push(Message::user(&feedback));
        log::debug!(
            "Tool {} finished (error: {}), turn history holds {} messages",
            call.tool,
            outcome.is_error(),
            history.len()
        );

        // At most one tool invocation per turn: the follow-up reply is
        // returned verbatim, with no further extraction.
        let answer = provider
            .process_text(&feedback, &template, self.chat_model.clone())
            .await
            .wrap_err("requesting follow-up reply")?;

        emit(events, Event::Answer(answer.clone())).await;
        Ok(answer)
    }

    /// Transcribes an audio file, then routes the transcript through the
    /// process_text tool under the given system prompt. Progress and
    /// results are reported through the event channel; failures are also
    /// emitted as error events before they are returned.
    pub async fn transcribe_and_process(
        &self,
        file_path: &str,
        transcription_model: Option<String>,
        chat_model: Option<String>,
        system_prompt: &str,
        events: Option<ArcEventTx>,
    ) -> Result<ProcessedAudio> {
        emit(&events, Event::Status("Transcribing audio...".to_string())).await;

        let mut args = serde_json::json!({ "file_path": file_path });
        if let Some(model) = transcription_model {
            args["model"] = Value::String(model);
        }
        let original_text = match self.execute_tool("transcribe", args).await {
            ToolOutcome::Success(value) => value_to_text(value),
            ToolOutcome::Failure(message) => {
                emit(&events, Event::Error(message.clone())).await;
                eyre::bail!("{}", message);
            }
        };

        emit(&events, Event::Transcription(original_text.clone())).await;
        emit(&events, Event::Status("Processing text...".to_string())).await;

        let mut args = serde_json::json!({
            "text": original_text,
            "system_prompt": system_prompt,
        });
        if let Some(model) = chat_model {
            args["model"] = Value::String(model);
        }
        let processed_text = match self.execute_tool("process_text", args).await {
            ToolOutcome::Success(value) => value_to_text(value),
            ToolOutcome::Failure(message) => {
                emit(&events, Event::Error(message.clone())).await;
                eyre::bail!("{}", message);
            }
        };

        emit(&events, Event::Answer(processed_text.clone())).await;
        Ok(ProcessedAudio {
            original_text,
            processed_text,
        })
    }

    /// Builds the system prompt enumerating every available tool and
    /// describing the fenced-JSON invocation protocol.
    async fn agent_template(&self) -> PromptTemplate {
        let tools = self.available_tools().await;
        let mut listing = String::new();
        for (id, descriptor) in &tools {
            listing.push_str(&format!(
                "- {} ({}): {}\n",
                id,
                descriptor.origin(),
                descriptor.description
            ));
        }

        let system_prompt = format!(
            r#"You are {name}, an AI assistant with access to various tools.

SYSTEM INSTRUCTIONS:
{system}

AVAILABLE TOOLS:
{listing}
To use a tool, respond with JSON in the following format:
```json
{{
  "tool": "tool_name",
  "args": {{
    "arg1": "value1",
    "arg2": "value2"
  }}
}}
```

If you don't need to use a tool, simply respond with normal text.
"#,
            name = self.name,
            system = self.system,
            listing = listing,
        );

        PromptTemplate::new("agent_prompt", "AI agent with tool access", system_prompt)
    }
}

/// Scans a model reply for an embedded tool invocation. A fenced block
/// labeled `json` wins; otherwise the whole reply is a candidate when it
/// is brace-delimited. Parse failures and structures without both a
/// `tool` and an `args` key mean "not a tool call", never an error.
fn extract_tool_call(raw: &str) -> Option<ToolCall> {
    let candidate = match raw.find("```json") {
        Some(idx) => {
            let rest = &raw[idx + "```json".len()..];
            // The closing fence is optional; take everything when absent
            rest.split("```").next().unwrap_or(rest).trim().to_string()
        }
        None => {
            let trimmed = raw.trim();
            if !(trimmed.starts_with('{') && trimmed.ends_with('}')) {
                return None;
            }
            trimmed.to_string()
        }
    };

    let value: Value = serde_json::from_str(&candidate).ok()?;
    let object = value.as_object()?;
    let tool = object.get("tool")?.as_str()?.to_string();
    let args = object.get("args")?.clone();
    Some(ToolCall { tool, args })
}

fn value_to_text(value: Value) -> String {
    match value {
        Value::String(text) => text,
        other => other.to_string(),
    }
}

async fn emit(events: &Option<ArcEventTx>, event: Event) {
    if let Some(tx) = events {
        if let Err(err) = tx.send(event).await {
            log::warn!("Failed to send event: {}", err);
        }
    }
}
