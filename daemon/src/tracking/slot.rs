use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use shared::observation::RecognitionResult;
use tracing::debug;

/// How long a published result stays valid. If the tracker stops
/// publishing (crash, camera unplugged), the engine must see "hand
/// lost" rather than keep acting on the last frame forever.
const MAX_RESULT_AGE: Duration = Duration::from_millis(500);

struct Stamped {
    result: RecognitionResult,
    received: Instant,
}

/// Latest-value mailbox between the tracker and the frame loop.
///
/// The tracker publishes at its own cadence; the frame loop reads at
/// the configured frame rate. Only the newest result matters, so a
/// publish overwrites whatever the loop has not read yet, and reads do
/// not consume: two ticks between publishes both see the same result.
///
/// `try_begin_submission` is a one-slot admission gate for embedders
/// that drive a recognizer frame by frame: it refuses a new capture
/// while a previous one is still in flight, and `publish` releases it.
pub struct ResultSlot {
    latest: Mutex<Option<Stamped>>,
    in_flight: AtomicBool,
}

impl Default for ResultSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultSlot {
    pub fn new() -> Self {
        Self {
            latest: Mutex::new(None),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn publish(&self, result: RecognitionResult) {
        let mut guard = match self.latest.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = Some(Stamped {
            result,
            received: Instant::now(),
        });
        drop(guard);
        self.in_flight.store(false, Ordering::Release);
    }

    /// Returns the newest published result, or `None` when nothing has
    /// been published recently enough to act on.
    pub fn latest(&self) -> Option<RecognitionResult> {
        let mut guard = match self.latest.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        match guard.as_ref() {
            Some(stamped) if stamped.received.elapsed() <= MAX_RESULT_AGE => {
                Some(stamped.result.clone())
            }
            Some(_) => {
                debug!("Dropping stale tracker result");
                *guard = None;
                None
            }
            None => None,
        }
    }

    /// Claims the in-flight gate. Returns false while an earlier
    /// submission has not been published yet.
    pub fn try_begin_submission(&self) -> bool {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub fn clear(&self) {
        let mut guard = match self.latest.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = None;
        drop(guard);
        self.in_flight.store(false, Ordering::Release);
    }
}
