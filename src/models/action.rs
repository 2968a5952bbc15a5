/// Requests handled by the agent service worker.
pub enum Action {
    /// Run one conversation turn over the given user input
    AgentRequest(String),
    /// Transcribe the audio file, then process the transcript
    TranscribeRequest(String),
    McpConnect,
    McpDisconnect,
}
