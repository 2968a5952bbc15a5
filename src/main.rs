use std::collections::HashMap;
use std::sync::Arc;

use eyre::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::task;
use tokio_util::sync::CancellationToken;

use palaver::agent::Agent;
use palaver::agent::tools::{TextProcessingTool, ThinkTool, TranscriptionTool};
use palaver::cli::{Command, McpCommand, SubCommand};
use palaver::config::{init_logger, resolve_path};
use palaver::mcp::{Registry, RemoteToolbox, ServerConfig};
use palaver::models::{Action, Event};
use palaver::prompts;
use palaver::provider::new_provider;
use palaver::service::AgentService;
use palaver::transcriber::new_transcriber;

#[tokio::main]
async fn main() -> Result<()> {
    let cmd = Command::new();
    if cmd.version() {
        cmd.print_version();
        return Ok(());
    }

    std::panic::set_hook(Box::new(|panic_info| {
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));

    let config = cmd.get_config()?;
    init_logger(&config.log)?;

    let store_path = resolve_path(&config.mcp.config_path)
        .wrap_err(format!("resolving {}", config.mcp.config_path))?;
    let registry = Arc::new(Registry::open(store_path).wrap_err("opening server store")?);

    if let Some(SubCommand::Mcp { command }) = cmd.subcommand() {
        return run_mcp_command(command, &registry).await;
    }

    let provider = new_provider(&config.provider).wrap_err("initializing provider")?;
    let transcriber = new_transcriber(&config.provider, &config.transcription)
        .wrap_err("initializing transcriber")?;

    let transcription_prompt = prompts::find(&config.transcription.prompt)
        .ok_or_else(|| eyre::eyre!("unknown prompt template {}", config.transcription.prompt))?
        .clone();

    let agent = Arc::new(
        Agent::new(&config.general.agent_name, &config.general.system_prompt)
            .with_provider(provider.clone())
            .with_toolbox(registry.clone())
            .with_chat_model(config.provider.chat_model())
            .with_tool(Arc::new(ThinkTool))
            .with_tool(Arc::new(TranscriptionTool::new(
                transcriber.clone(),
                config.provider.transcription_model(),
            )))
            .with_tool(Arc::new(TextProcessingTool::new(
                provider.clone(),
                config.provider.chat_model(),
            ))),
    );

    if config.general.verbose {
        eprintln!("[+] Connecting MCP servers...");
    }
    registry.connect().await;
    let servers = registry.servers().await;
    if config.general.verbose {
        eprintln!("[+] Connected {} MCP servers", servers.len());
    }

    let (action_tx, action_rx) = mpsc::unbounded_channel::<Action>();
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();
    let token = CancellationToken::new();

    let mut service = AgentService::new(
        agent.clone(),
        registry.clone(),
        transcription_prompt,
        action_rx,
        Arc::new(event_tx),
        token.clone(),
    );

    let mut task_set = task::JoinSet::new();
    task_set.spawn(async move { service.run().await });

    println!(
        "{} ready. Type a message, or /tools, /transcribe <file>, /connect, /disconnect, /quit.",
        config.general.agent_name
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let line = match line.wrap_err("reading input")? {
                    Some(line) => line,
                    None => break,
                };
                let line = line.trim().to_string();
                if line.is_empty() {
                    continue;
                }
                if line == "/quit" {
                    break;
                }
                if line == "/tools" {
                    for (id, descriptor) in agent.available_tools().await {
                        println!("- {} ({}): {}", id, descriptor.origin(), descriptor.description);
                    }
                    continue;
                }
                if line == "/connect" {
                    action_tx.send(Action::McpConnect)?;
                    continue;
                }
                if line == "/disconnect" {
                    action_tx.send(Action::McpDisconnect)?;
                    continue;
                }
                if let Some(file) = line.strip_prefix("/transcribe ") {
                    action_tx.send(Action::TranscribeRequest(file.trim().to_string()))?;
                    continue;
                }
                action_tx.send(Action::AgentRequest(line))?;
            }

            event = event_rx.recv() => {
                match event {
                    Some(event) => print_event(event),
                    None => break,
                }
            }
        }
    }

    token.cancel();
    registry.disconnect().await;

    task_set.abort_all();
    while let Some(res) = task_set.join_next().await {
        match res {
            Ok(_) => {}
            Err(err) if err.is_cancelled() => {}
            Err(err) => log::error!("Task error: {}", err),
        }
    }

    Ok(())
}

fn print_event(event: Event) {
    match event {
        Event::Status(message) => eprintln!("[*] {}", message),
        Event::Transcription(text) => println!("Transcript: {}", text),
        Event::Answer(text) => println!("{}", text),
        Event::Error(message) => eprintln!("[!] {}", message),
        Event::McpConnected(servers) => {
            eprintln!("[*] Connected servers: {}", servers.join(", "))
        }
        Event::McpDisconnected => eprintln!("[*] Disconnected from MCP servers"),
    }
}

async fn run_mcp_command(command: &McpCommand, registry: &Registry) -> Result<()> {
    match command {
        McpCommand::Add {
            name,
            command,
            args,
            env,
        } => {
            let config = ServerConfig {
                command: command.clone(),
                args: args.clone(),
                env: env.iter().cloned().collect::<HashMap<_, _>>(),
            };
            registry.add_server(name, config).await?;
            println!("Added server {}", name);
        }
        McpCommand::Remove { name } => {
            if registry.remove_server(name).await? {
                println!("Removed server {}", name);
            } else {
                println!("No server named {}", name);
            }
        }
        McpCommand::List => {
            let configs = registry.server_configs().await;
            if configs.is_empty() {
                println!("No servers configured");
                return Ok(());
            }
            for (name, config) in configs {
                println!("{}: {} {}", name, config.command, config.args.join(" "));
            }
        }
    }
    Ok(())
}
