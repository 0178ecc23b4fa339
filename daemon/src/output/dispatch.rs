use anyhow::Result;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use super::http::HttpSink;
use super::keyboard::KeyboardSink;
use super::MediaCommand;
use crate::config::OutputConfig;
use crate::rate_limit::CommandRateLimiter;

/// Handle the engine fires commands into. Sends never block and never
/// fail loudly: a closed worker just logs and drops, matching the
/// fire-and-forget contract (a slow or dead sink must not stall the
/// frame loop, and the engine never observes sink errors).
#[derive(Debug, Clone)]
pub struct CommandDispatcher {
    tx: mpsc::UnboundedSender<MediaCommand>,
}

impl CommandDispatcher {
    pub fn new(tx: mpsc::UnboundedSender<MediaCommand>) -> Self {
        Self { tx }
    }

    /// A dispatcher wired to nothing but a receiver, for tests and for
    /// running the engine without a sink.
    pub fn detached() -> (Self, mpsc::UnboundedReceiver<MediaCommand>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    pub fn dispatch(&self, command: MediaCommand) {
        if self.tx.send(command).is_err() {
            warn!("Output worker gone, dropping command {}", command);
        }
    }
}

enum SinkBackend {
    Keyboard(KeyboardSink),
    Http(HttpSink),
}

impl SinkBackend {
    fn from_config(config: &OutputConfig) -> Result<Self> {
        match config.backend.as_str() {
            "http" => Ok(Self::Http(HttpSink::new(&config.http))),
            "keyboard" => Ok(Self::Keyboard(KeyboardSink::new()?)),
            other => Err(anyhow::anyhow!("Unknown output backend {:?}", other)),
        }
    }

    async fn send(&mut self, command: MediaCommand) -> Result<()> {
        match self {
            Self::Keyboard(sink) => tokio::task::block_in_place(|| sink.send(command)),
            Self::Http(sink) => sink.send(command).await,
        }
    }
}

/// Spawns the output worker: drains the command channel, applies the
/// flood guard, executes on the configured backend. Failures are
/// logged here and go no further.
pub fn spawn_output_worker(
    config: &OutputConfig,
    limiter: CommandRateLimiter,
    mut rx: mpsc::UnboundedReceiver<MediaCommand>,
) -> Result<JoinHandle<()>> {
    let mut backend = SinkBackend::from_config(config)?;
    info!("Output worker starting ({} backend)", config.backend);

    Ok(tokio::spawn(async move {
        while let Some(command) = rx.recv().await {
            if !limiter.check() {
                warn!("Rate limited, dropping command {}", command);
                continue;
            }
            if let Err(e) = backend.send(command).await {
                error!("Output sink error for {}: {}", command, e);
            }
        }
        info!("Output worker stopped");
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_reaches_receiver() {
        let (dispatcher, mut rx) = CommandDispatcher::detached();
        dispatcher.dispatch(MediaCommand::PlayPause);
        dispatcher.dispatch(MediaCommand::VolumeUp);
        assert_eq!(rx.try_recv().unwrap(), MediaCommand::PlayPause);
        assert_eq!(rx.try_recv().unwrap(), MediaCommand::VolumeUp);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_dispatch_after_receiver_dropped_is_silent() {
        let (dispatcher, rx) = CommandDispatcher::detached();
        drop(rx);
        // Must not panic.
        dispatcher.dispatch(MediaCommand::Mute);
    }

    #[test]
    fn test_unknown_backend_rejected() {
        let mut config = OutputConfig::default();
        config.backend = "telepathy".to_string();
        assert!(SinkBackend::from_config(&config).is_err());
    }
}
