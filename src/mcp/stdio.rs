#[cfg(test)]
#[path = "stdio_test.rs"]
mod tests;

use std::{collections::HashMap, pin::Pin, process::Stdio, sync::Arc, time::Duration};

use futures::Stream;
use mcp_rust_sdk::{
    Error, Response,
    transport::{Message, Transport},
};
use tokio::{
    io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader},
    process::Command,
    sync::Mutex,
};

use crate::config::constants::STDIO_READ_TIMEOUT_SECS;

/// Newline-delimited JSON-RPC over a server subprocess's stdin/stdout.
/// The read timeout only guards a wedged pipe read; in-flight requests
/// otherwise block until the server answers.
pub struct StdioTransport {
    stdin: Arc<Mutex<Box<dyn AsyncWrite + Send + Unpin>>>,
    stdout: Arc<Mutex<BufReader<Box<dyn AsyncRead + Send + Unpin>>>>,
    process: Option<Arc<Mutex<tokio::process::Child>>>, // Optional to allow for mocking
    read_timeout: Duration,
}

impl StdioTransport {
    pub fn spawn(
        command: &str,
        args: &[String],
        env: &HashMap<String, String>,
    ) -> Result<Self, Error> {
        let mut process = Command::new(command)
            .args(args)
            .envs(env)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .spawn()?;

        let stdin = Arc::new(Mutex::new(Box::new(
            process
                .stdin
                .take()
                .ok_or_else(|| Error::Io("failed to open stdin".to_string()))?,
        ) as Box<dyn AsyncWrite + Send + Unpin>));

        let stdout = Arc::new(Mutex::new(BufReader::new(Box::new(
            process
                .stdout
                .take()
                .ok_or_else(|| Error::Io("failed to open stdout".to_string()))?,
        )
            as Box<dyn AsyncRead + Send + Unpin>)));

        Ok(StdioTransport {
            stdin,
            stdout,
            process: Some(Arc::new(Mutex::new(process))),
            read_timeout: Duration::from_secs(STDIO_READ_TIMEOUT_SECS),
        })
    }

    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }
}

#[async_trait::async_trait]
impl Transport for StdioTransport {
    /// Send a message over the transport
    async fn send(&self, message: Message) -> Result<(), Error> {
        let mut stdin = self.stdin.lock().await;
        let json_str = serde_json::to_string(&message)? + "\n";
        stdin.write_all(json_str.as_bytes()).await?;
        stdin.flush().await?;
        Ok(())
    }

    /// Receive messages from the transport
    fn receive(&self) -> Pin<Box<dyn Stream<Item = Result<Message, Error>> + Send>> {
        let stdout = Arc::clone(&self.stdout);
        let timeout = self.read_timeout;

        let stream = futures::stream::unfold(
            (stdout, String::new()),
            move |(stdout, mut buffer)| {
                let timeout = timeout;
                async move {
                    buffer.clear();

                    let read_result = {
                        let mut stdout_guard = stdout.lock().await;
                        tokio::time::timeout(timeout, stdout_guard.read_line(&mut buffer)).await
                    };

                    let read_result = match read_result {
                        Ok(res) => res,
                        Err(_) => {
                            return Some((
                                Err(Error::Io("read timed out".to_string())),
                                (stdout, buffer),
                            ));
                        }
                    };

                    match read_result {
                        Ok(0) => None, // EOF
                        Ok(_) => {
                            let resp: Response = match serde_json::from_str(&buffer) {
                                Ok(resp) => resp,
                                Err(e) => {
                                    return Some((
                                        Err(Error::Serialization(e.to_string())),
                                        (stdout, buffer),
                                    ));
                                }
                            };
                            Some((Ok(Message::Response(resp)), (stdout, buffer)))
                        }
                        Err(e) => Some((Err(Error::Io(e.to_string())), (stdout, buffer))),
                    }
                }
            },
        );
        Box::pin(stream)
    }

    /// Close the transport and kill the subprocess
    async fn close(&self) -> Result<(), Error> {
        if let Some(process) = &self.process {
            let mut process = process.lock().await;
            process.kill().await?;
        }
        Ok(())
    }
}
