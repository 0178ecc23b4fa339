use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use shared::ipc::{SettingsUpdate, StatusInfo};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::info;

use crate::config::Config;
use crate::engine::GestureProcessor;
use crate::output::CommandDispatcher;
use crate::pipeline;
use crate::tracking::ResultSlot;

/// Everything the socket server and the frame loop share.
///
/// The processor lives behind one async mutex: the frame loop holds it
/// for the duration of one `process_frame` call, the server takes it
/// between frames to apply settings updates and read status.
pub struct DaemonState {
    pub config: Config,
    pub processor: Arc<Mutex<GestureProcessor>>,
    pub slot: Arc<ResultSlot>,
    pub is_active: Arc<AtomicBool>,
    pub last_action: Arc<Mutex<Option<String>>>,
    loop_handle: Mutex<Option<JoinHandle<()>>>,
}

impl DaemonState {
    pub fn new(config: Config, dispatcher: CommandDispatcher) -> Self {
        let processor = GestureProcessor::new(&config, dispatcher);
        Self {
            config,
            processor: Arc::new(Mutex::new(processor)),
            slot: Arc::new(ResultSlot::new()),
            is_active: Arc::new(AtomicBool::new(false)),
            last_action: Arc::new(Mutex::new(None)),
            loop_handle: Mutex::new(None),
        }
    }

    /// Starts the frame loop. Idempotent: a second Start while active
    /// is a no-op.
    pub async fn activate(&self) -> anyhow::Result<()> {
        let mut handle_guard = self.loop_handle.lock().await;
        if self.is_active.load(Ordering::Acquire) {
            info!("Already active, ignoring Start");
            return Ok(());
        }

        self.slot.clear();
        // Flag goes up before the loop spawns; the loop exits as soon
        // as it observes the flag down.
        self.is_active.store(true, Ordering::Release);
        let handle = pipeline::spawn_frame_loop(
            self.config.pipeline.frame_rate,
            Arc::clone(&self.processor),
            Arc::clone(&self.slot),
            Arc::clone(&self.last_action),
            Arc::clone(&self.is_active),
        );
        *handle_guard = Some(handle);
        info!("Daemon activated");
        Ok(())
    }

    pub async fn deactivate(&self) {
        self.is_active.store(false, Ordering::Release);
        if let Some(handle) = self.loop_handle.lock().await.take() {
            handle.abort();
        }
        self.slot.clear();
        info!("Daemon deactivated");
    }

    pub async fn apply_update(&self, update: &SettingsUpdate) {
        self.processor.lock().await.apply_update(update);
    }

    pub async fn get_status(&self) -> StatusInfo {
        let processor = self.processor.lock().await;
        StatusInfo {
            is_running: true,
            is_active: self.is_active.load(Ordering::Acquire),
            system_on: processor.system_on(),
            muted: processor.muted(),
            hand_preference: processor.settings().hand_preference.label().to_string(),
            last_action: self.last_action.lock().await.clone(),
        }
    }
}
