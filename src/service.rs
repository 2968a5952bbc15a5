#[cfg(test)]
#[path = "service_test.rs"]
mod tests;

use std::sync::Arc;

use eyre::Result;
use tokio::{sync::mpsc, task::JoinHandle};
use tokio_util::sync::CancellationToken;

use crate::agent::Agent;
use crate::mcp::{Registry, RemoteToolbox};
use crate::models::{Action, ArcEventTx, Event};
use crate::prompts::PromptTemplate;

/// Persistent worker owning the agent: callers talk to it over the
/// action channel and observe progress on the event channel, so no
/// caller ever spins up its own runtime bridge per request.
pub struct AgentService {
    agent: Arc<Agent>,
    registry: Arc<Registry>,
    transcription_prompt: PromptTemplate,
    action_rx: mpsc::UnboundedReceiver<Action>,
    event_tx: ArcEventTx,
    cancel_token: CancellationToken,
}

impl AgentService {
    pub fn new(
        agent: Arc<Agent>,
        registry: Arc<Registry>,
        transcription_prompt: PromptTemplate,
        action_rx: mpsc::UnboundedReceiver<Action>,
        event_tx: ArcEventTx,
        cancel_token: CancellationToken,
    ) -> Self {
        Self {
            agent,
            registry,
            transcription_prompt,
            action_rx,
            event_tx,
            cancel_token,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut worker: JoinHandle<()> = tokio::spawn(async {});

        loop {
            tokio::select! {
                _ = self.cancel_token.cancelled() => {
                    log::debug!("Agent service cancelled");
                    worker.abort();
                    return Ok(());
                }

                action = self.action_rx.recv() => {
                    let action = match action {
                        Some(action) => action,
                        None => return Ok(()),
                    };

                    match action {
                        Action::AgentRequest(input) => {
                            let agent = Arc::clone(&self.agent);
                            let events = Arc::clone(&self.event_tx);
                            worker = tokio::spawn(async move {
                                // The agent reports the answer (or the
                                // failure text) through the event channel
                                let _ = agent.process(&input, Some(events)).await;
                            });
                        }

                        Action::TranscribeRequest(file_path) => {
                            let agent = Arc::clone(&self.agent);
                            let events = Arc::clone(&self.event_tx);
                            let system_prompt = self.transcription_prompt.system_prompt.clone();
                            worker = tokio::spawn(async move {
                                if let Err(err) = agent
                                    .transcribe_and_process(
                                        &file_path,
                                        None,
                                        None,
                                        &system_prompt,
                                        Some(events),
                                    )
                                    .await
                                {
                                    log::error!("Transcription pipeline failed: {:#}", err);
                                }
                            });
                        }

                        Action::McpConnect => {
                            self.registry.connect().await;
                            let servers = self.registry.servers().await;
                            self.send_event(Event::McpConnected(servers)).await;
                        }

                        Action::McpDisconnect => {
                            self.registry.disconnect().await;
                            self.send_event(Event::McpDisconnected).await;
                        }
                    }
                }
            }
        }
    }

    async fn send_event(&self, event: Event) {
        if let Err(err) = self.event_tx.send(event).await {
            log::error!("Failed to send event: {}", err);
        }
    }
}
