use clap::{Parser, Subcommand};
use eyre::{Context, Result};

use crate::config::{self, Configuration, load_configuration, lookup_config_path};

#[derive(Debug, Parser)]
#[command(
    version,
    about,
    long_about = r#"A voice-and-text assistant agent with MCP tool support

Default configuration file location looks up in the following order:
    * $XDG_CONFIG_HOME/palaver/config.toml
    * $HOME/.config/palaver/config.toml
    * $HOME/.palaver.toml
"#,
    disable_version_flag = true
)]
pub struct Command {
    /// Configuration file path
    #[arg(short, long, value_name = "PATH")]
    config: Option<String>,

    /// Show the version
    #[arg(short, long)]
    version: bool,

    #[command(subcommand)]
    subcommand: Option<SubCommand>,
}

#[derive(Debug, Subcommand)]
pub enum SubCommand {
    /// Manage the MCP server store
    Mcp {
        #[command(subcommand)]
        command: McpCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum McpCommand {
    /// Add or replace a server in the store
    Add {
        /// Server name (the primary key in the store)
        name: String,

        /// Command to launch the server with
        #[arg(long)]
        command: String,

        /// Launch argument; repeat for multiple arguments
        #[arg(long = "arg", value_name = "ARG")]
        args: Vec<String>,

        /// KEY=VALUE environment entry; repeat for multiple entries
        #[arg(long = "env", value_name = "KEY=VALUE", value_parser = parse_env)]
        env: Vec<(String, String)>,
    },
    /// Remove a server from the store
    Remove { name: String },
    /// List configured servers
    List,
}

impl Command {
    pub fn new() -> Command {
        Self::parse()
    }

    pub fn get_config(&self) -> Result<Configuration> {
        let config_path = self
            .config
            .clone()
            .unwrap_or_else(|| lookup_config_path().unwrap_or_default());

        if config_path.is_empty() {
            // No config path is specified just use the default config
            return Ok(Configuration::default());
        }
        Ok(load_configuration(config_path.as_str()).wrap_err("loading configuration")?)
    }

    pub fn version(&self) -> bool {
        self.version
    }

    pub fn print_version(&self) {
        println!("{}", config::version())
    }

    pub fn subcommand(&self) -> Option<&SubCommand> {
        self.subcommand.as_ref()
    }
}

fn parse_env(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got {}", raw)),
    }
}
