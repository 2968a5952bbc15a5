use std::sync::Arc;

use tokio::sync::mpsc;

/// Progress and result notifications emitted while the agent works.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Transient status line ("Executing tool: x...")
    Status(String),
    /// The transcript produced by the transcription step
    Transcription(String),
    /// The final answer of an agent turn or processing step
    Answer(String),
    /// A failure surfaced to the caller as text
    Error(String),
    McpConnected(Vec<String>),
    McpDisconnected,
}

#[async_trait::async_trait]
pub trait EventTx {
    async fn send(&self, event: Event) -> Result<(), mpsc::error::SendError<Event>>;
}

#[async_trait::async_trait]
impl EventTx for mpsc::Sender<Event> {
    async fn send(&self, event: Event) -> Result<(), mpsc::error::SendError<Event>> {
        self.send(event).await
    }
}

#[async_trait::async_trait]
impl EventTx for mpsc::UnboundedSender<Event> {
    async fn send(&self, event: Event) -> Result<(), mpsc::error::SendError<Event>> {
        self.send(event)
    }
}

pub type ArcEventTx = Arc<dyn EventTx + Send + Sync>;
