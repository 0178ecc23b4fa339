use std::path::PathBuf;

use shared::ipc::{self, Command, IpcError, Response};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::UnixStream;
use tokio::time::{timeout, Duration};
use tracing::warn;

/// Timeout for each socket operation.
const SOCKET_TIMEOUT: Duration = Duration::from_secs(5);

/// One-shot client for the daemon's control socket: connect, send one
/// command, shut down the write side, read the full response.
pub struct DaemonClient {
    socket_path: PathBuf,
}

impl DaemonClient {
    pub fn new() -> Self {
        Self {
            socket_path: ipc::socket_path(),
        }
    }

    #[cfg(test)]
    fn with_path(socket_path: PathBuf) -> Self {
        Self { socket_path }
    }

    pub async fn send_command(&self, cmd: Command) -> Result<Response, IpcError> {
        let mut stream =
            match timeout(SOCKET_TIMEOUT, UnixStream::connect(&self.socket_path)).await {
                Ok(Ok(stream)) => stream,
                Ok(Err(e))
                    if matches!(
                        e.kind(),
                        std::io::ErrorKind::NotFound | std::io::ErrorKind::ConnectionRefused
                    ) =>
                {
                    return Err(IpcError::ConnectionRefused);
                }
                Ok(Err(e)) => return Err(e.into()),
                Err(_) => {
                    warn!(
                        "Timed out connecting to daemon at {}",
                        self.socket_path.display()
                    );
                    return Err(IpcError::Timeout);
                }
            };

        let command_json = serde_json::to_vec(&cmd)?;
        if timeout(SOCKET_TIMEOUT, stream.write_all(&command_json))
            .await
            .is_err()
        {
            warn!("Timed out sending command to daemon");
            return Err(IpcError::Timeout);
        }
        // Half-close so the daemon sees end-of-request.
        if let Ok(Err(e)) = timeout(SOCKET_TIMEOUT, stream.shutdown()).await {
            return Err(e.into());
        }

        let mut buffer = Vec::new();
        match timeout(SOCKET_TIMEOUT, stream.read_to_end(&mut buffer)).await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => return Err(e.into()),
            Err(_) => {
                warn!("Timed out waiting for daemon response");
                return Err(IpcError::Timeout);
            }
        }

        Ok(serde_json::from_slice(&buffer)?)
    }
}

impl Default for DaemonClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::ipc::StatusInfo;
    use tokio::net::UnixListener;

    async fn serve_once(listener: UnixListener, response: Response) {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut buffer = Vec::new();
        stream.read_to_end(&mut buffer).await.unwrap();
        let _command: Command = serde_json::from_slice(&buffer).unwrap();
        let response_json = serde_json::to_vec(&response).unwrap();
        stream.write_all(&response_json).await.unwrap();
    }

    #[tokio::test]
    async fn test_missing_socket_is_connection_refused() {
        let dir = tempfile::tempdir().unwrap();
        let client = DaemonClient::with_path(dir.path().join("nope.sock"));
        let result = client.send_command(Command::Status).await;
        assert!(matches!(result, Err(IpcError::ConnectionRefused)));
    }

    #[tokio::test]
    async fn test_status_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wavectld.sock");
        let listener = UnixListener::bind(&path).unwrap();
        let status = StatusInfo {
            is_running: true,
            is_active: true,
            system_on: false,
            muted: false,
            hand_preference: "Left".to_string(),
            last_action: None,
        };
        let server = tokio::spawn(serve_once(listener, Response::Status(status.clone())));

        let client = DaemonClient::with_path(path);
        let result = client.send_command(Command::Status).await.unwrap();
        assert_eq!(result, Response::Status(status));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_error_response_passed_through() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wavectld.sock");
        let listener = UnixListener::bind(&path).unwrap();
        let server = tokio::spawn(serve_once(
            listener,
            Response::Error("empty settings update".to_string()),
        ));

        let client = DaemonClient::with_path(path);
        let result = client.send_command(Command::Start).await.unwrap();
        assert!(matches!(result, Response::Error(_)));
        server.await.unwrap();
    }
}
