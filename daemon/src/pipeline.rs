use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::info;

use crate::engine::GestureProcessor;
use crate::tracking::ResultSlot;

/// Spawns the frame loop: ticks at the configured rate, feeds the
/// newest tracker result (or its absence) to the engine, and records
/// the label of whatever fired for the status surface.
///
/// Timestamps handed to the engine come from a private epoch taken at
/// spawn, so filters and cooldowns see one monotonic clock regardless
/// of how the tracker stamps its frames.
pub fn spawn_frame_loop(
    frame_rate: f64,
    processor: Arc<Mutex<GestureProcessor>>,
    slot: Arc<ResultSlot>,
    last_action: Arc<Mutex<Option<String>>>,
    is_active: Arc<AtomicBool>,
) -> JoinHandle<()> {
    let period = Duration::from_secs_f64(1.0 / frame_rate.max(1.0));

    tokio::spawn(async move {
        info!("Frame loop starting at {:.0} fps", 1.0 / period.as_secs_f64());
        let epoch = Instant::now();
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            if !is_active.load(Ordering::Acquire) {
                break;
            }

            let result = slot.latest();
            let now = epoch.elapsed().as_secs_f64();
            let action = processor.lock().await.process_frame(result.as_ref(), now);

            if let Some(action) = action {
                info!("Action: {}", action);
                *last_action.lock().await = Some(action.to_string());
            }
        }
        info!("Frame loop stopped");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::output::CommandDispatcher;
    use shared::observation::{
        CategoryScore, HandObservation, Landmark, RecognitionResult, LANDMARK_COUNT,
    };

    fn victory_frame() -> RecognitionResult {
        RecognitionResult {
            hands: vec![HandObservation {
                landmarks: vec![Landmark::default(); LANDMARK_COUNT],
                handedness: vec![CategoryScore::new("Left", 0.95)],
                gestures: vec![CategoryScore::new("Victory", 0.9)],
            }],
        }
    }

    #[tokio::test]
    async fn test_loop_processes_published_result() {
        let (dispatcher, _rx) = CommandDispatcher::detached();
        let processor = Arc::new(Mutex::new(GestureProcessor::new(
            &Config::default(),
            dispatcher,
        )));
        let slot = Arc::new(ResultSlot::new());
        let last_action = Arc::new(Mutex::new(None));
        let is_active = Arc::new(AtomicBool::new(true));

        slot.publish(victory_frame());
        let handle = spawn_frame_loop(
            200.0,
            Arc::clone(&processor),
            Arc::clone(&slot),
            Arc::clone(&last_action),
            Arc::clone(&is_active),
        );

        tokio::time::sleep(Duration::from_millis(50)).await;
        is_active.store(false, Ordering::Release);
        let _ = handle.await;

        assert!(processor.lock().await.system_on());
        assert_eq!(
            last_action.lock().await.as_deref(),
            Some("System Started")
        );
    }

    #[tokio::test]
    async fn test_loop_exits_when_deactivated() {
        let (dispatcher, _rx) = CommandDispatcher::detached();
        let processor = Arc::new(Mutex::new(GestureProcessor::new(
            &Config::default(),
            dispatcher,
        )));
        let is_active = Arc::new(AtomicBool::new(false));
        let handle = spawn_frame_loop(
            200.0,
            processor,
            Arc::new(ResultSlot::new()),
            Arc::new(Mutex::new(None)),
            Arc::clone(&is_active),
        );
        // First tick observes the cleared flag and returns.
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("loop should exit promptly")
            .unwrap();
    }
}
