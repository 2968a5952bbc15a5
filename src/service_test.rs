use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::time::{Duration, timeout};

use crate::mcp::ServerConfig;
use crate::prompts;

use super::*;

struct StorePath(String);

impl StorePath {
    fn new(name: &str) -> Self {
        let path = std::env::temp_dir().join(format!(
            "palaver-service-{}-{}.json",
            std::process::id(),
            name
        ));
        std::fs::remove_file(&path).ok();
        Self(path.to_string_lossy().to_string())
    }
}

impl Drop for StorePath {
    fn drop(&mut self) {
        std::fs::remove_file(&self.0).ok();
    }
}

async fn recv(rx: &mut UnboundedReceiver<Event>) -> Event {
    timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("event within timeout")
        .expect("channel open")
}

fn spawn_service(
    registry: Arc<Registry>,
) -> (
    mpsc::UnboundedSender<Action>,
    UnboundedReceiver<Event>,
    CancellationToken,
) {
    let agent = Arc::new(Agent::new("Test", "test system"));
    let (action_tx, action_rx) = mpsc::unbounded_channel::<Action>();
    let (event_tx, event_rx) = mpsc::unbounded_channel::<Event>();
    let token = CancellationToken::new();

    let mut service = AgentService::new(
        agent,
        registry,
        prompts::find("proofreader").expect("builtin prompt").clone(),
        action_rx,
        Arc::new(event_tx),
        token.clone(),
    );
    tokio::spawn(async move { service.run().await });

    (action_tx, event_rx, token)
}

#[tokio::test]
async fn test_connect_and_disconnect_round_trip() {
    let store = StorePath::new("connect");
    let registry = Arc::new(Registry::open(&store.0).expect("open registry"));
    let (action_tx, mut event_rx, token) = spawn_service(registry.clone());

    action_tx.send(Action::McpConnect).expect("send connect");
    assert_eq!(recv(&mut event_rx).await, Event::McpConnected(vec![]));
    assert!(registry.connected().await);

    action_tx
        .send(Action::McpDisconnect)
        .expect("send disconnect");
    assert_eq!(recv(&mut event_rx).await, Event::McpDisconnected);
    assert!(!registry.connected().await);

    token.cancel();
}

#[tokio::test]
async fn test_connect_reports_live_servers_only() {
    let store = StorePath::new("partial");
    let registry = Arc::new(Registry::open(&store.0).expect("open registry"));
    registry
        .add_server(
            "broken",
            ServerConfig {
                command: "/nonexistent/definitely-not-a-server".to_string(),
                args: vec![],
                env: Default::default(),
            },
        )
        .await
        .expect("add server");

    let (action_tx, mut event_rx, token) = spawn_service(registry.clone());

    action_tx.send(Action::McpConnect).expect("send connect");
    // The unlaunchable server is skipped, not fatal
    assert_eq!(recv(&mut event_rx).await, Event::McpConnected(vec![]));

    token.cancel();
}

#[tokio::test]
async fn test_agent_request_reports_answer_event() {
    let store = StorePath::new("agent");
    let registry = Arc::new(Registry::open(&store.0).expect("open registry"));
    let (action_tx, mut event_rx, token) = spawn_service(registry);

    // The test agent has no provider attached, so the turn fails fast --
    // and that failure must arrive as an Answer event, not a crash
    action_tx
        .send(Action::AgentRequest("hello".to_string()))
        .expect("send request");

    let event = recv(&mut event_rx).await;
    assert_eq!(
        event,
        Event::Answer(
            "Error processing input: Agent not properly initialized with a text provider"
                .to_string()
        )
    );

    token.cancel();
}
