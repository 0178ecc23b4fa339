use std::path::PathBuf;
use std::sync::Arc;

use shared::ipc::{Command, Response};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::UnixListener;
use tracing::{debug, error, info};

use crate::state::DaemonState;

/// JSON-over-Unix-socket control server: one command and one response
/// per connection. The client shuts down its write side after sending,
/// which is how we know the request is complete.
pub struct DaemonServer {
    socket_path: PathBuf,
    state: Arc<DaemonState>,
}

impl DaemonServer {
    pub fn new(socket_path: PathBuf, state: Arc<DaemonState>) -> Self {
        Self { socket_path, state }
    }

    pub async fn run(&self) -> anyhow::Result<()> {
        if self.socket_path.exists() {
            std::fs::remove_file(&self.socket_path)?;
        }

        info!("Starting socket server at {}", self.socket_path.display());
        let listener = UnixListener::bind(&self.socket_path)?;

        loop {
            let state = Arc::clone(&self.state);
            match listener.accept().await {
                Ok((stream, _addr)) => {
                    tokio::spawn(async move {
                        if let Err(e) = Self::handle_connection(state, stream).await {
                            error!("Error handling connection: {}", e);
                        }
                    });
                }
                Err(e) => {
                    error!("Error accepting connection: {}", e);
                }
            }
        }
    }

    async fn handle_connection(
        state: Arc<DaemonState>,
        mut stream: tokio::net::UnixStream,
    ) -> anyhow::Result<()> {
        let mut buffer = Vec::new();
        stream.read_to_end(&mut buffer).await?;
        if buffer.is_empty() {
            return Ok(());
        }

        let command: Command = serde_json::from_slice(&buffer)?;
        let response = Self::dispatch(&state, command).await;

        let response_json = serde_json::to_vec(&response)?;
        stream.write_all(&response_json).await?;
        Ok(())
    }

    async fn dispatch(state: &DaemonState, command: Command) -> Response {
        match command {
            // Publish arrives at frame rate; logging it at info would
            // drown everything else.
            Command::Publish(result) => {
                debug!("Publish: {} hand(s)", result.hands.len());
                state.slot.publish(result);
                Response::Ok
            }
            Command::Start => {
                info!("Received command: Start");
                match state.activate().await {
                    Ok(()) => Response::Ok,
                    Err(e) => Response::Error(e.to_string()),
                }
            }
            Command::Stop => {
                info!("Received command: Stop");
                state.deactivate().await;
                Response::Ok
            }
            Command::Status => {
                debug!("Received command: Status");
                Response::Status(state.get_status().await)
            }
            Command::UpdateConfig(update) => {
                info!("Received command: UpdateConfig({:?})", update);
                if update.is_empty() {
                    return Response::Error("empty settings update".to_string());
                }
                state.apply_update(&update).await;
                Response::Ok
            }
        }
    }
}

impl Drop for DaemonServer {
    fn drop(&mut self) {
        if self.socket_path.exists() {
            let _ = std::fs::remove_file(&self.socket_path);
        }
    }
}
