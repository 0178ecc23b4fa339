use shared::observation::{
    HandObservation, RecognitionResult, INDEX_TIP, MIDDLE_MCP, THUMB_TIP, WRIST,
};
use tracing::{debug, info};

use super::cooldown::CooldownGate;
use super::filter::OneEuroFilter;
use super::settings::{CooldownClass, EngineSettings, GestureToken};
use crate::config::Config;
use crate::output::dispatch::CommandDispatcher;
use crate::output::MediaCommand;
use shared::ipc::SettingsUpdate;

/// Human-readable action label returned by `process_frame`, for the
/// status surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    SystemStarted,
    SystemStopped,
    Muted,
    Unmuted,
    PlayPause,
    NextTrack,
    PrevTrack,
    SeekForward,
    SeekBackward,
    VolumeUp,
    VolumeDown,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::SystemStarted => "System Started",
            Self::SystemStopped => "System Stopped",
            Self::Muted => "Muted",
            Self::Unmuted => "Unmuted",
            Self::PlayPause => "Play/Pause",
            Self::NextTrack => "Next track",
            Self::PrevTrack => "Previous track",
            Self::SeekForward => "Seek Forward",
            Self::SeekBackward => "Seek Backward",
            Self::VolumeUp => "Volume Up",
            Self::VolumeDown => "Volume Down",
        };
        f.write_str(label)
    }
}

/// Read-only view of the last frame's geometry, for the status
/// surface / overlays. Never consulted by the engine itself.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TrackingSnapshot {
    pub wrist: Option<(f64, f64)>,
    pub pinch_center: Option<(f64, f64)>,
    pub pinch_anchor: Option<(f64, f64)>,
}

/// Discrete dispatch rules below the system toggle, in priority order.
#[derive(Debug, Clone, Copy)]
enum DiscreteRule {
    MuteToggle,
    PlayPause,
    NextTrack,
    PrevTrack,
}

/// The gesture decision engine: one instance per daemon, fed one
/// classification result per captured frame, emitting at most one
/// action per frame.
pub struct GestureProcessor {
    settings: EngineSettings,

    base_gap_threshold: f64,
    hand_calibration: f64,
    hand_size_floor: f64,
    scale_min: f64,
    scale_max: f64,
    dead_zone: f64,

    system_on: bool,
    muted: bool,
    pinch_anchor: Option<(f64, f64)>,

    toggle_gate: CooldownGate,
    pinch_gate: CooldownGate,
    seek_gate: CooldownGate,

    filter_gap: OneEuroFilter,
    filter_x: OneEuroFilter,
    filter_y: OneEuroFilter,

    sink: CommandDispatcher,
    snapshot: TrackingSnapshot,
}

impl GestureProcessor {
    pub fn new(config: &Config, sink: CommandDispatcher) -> Self {
        let e = &config.engine;
        let f = &config.filter;
        let c = &config.cooldowns;
        Self {
            settings: EngineSettings::from_config(config),
            base_gap_threshold: e.base_gap_threshold,
            hand_calibration: e.hand_calibration,
            hand_size_floor: e.hand_size_floor,
            scale_min: e.scale_min,
            scale_max: e.scale_max,
            dead_zone: e.dead_zone,
            system_on: false,
            muted: false,
            pinch_anchor: None,
            toggle_gate: CooldownGate::new(c.toggle),
            pinch_gate: CooldownGate::new(c.pinch),
            seek_gate: CooldownGate::new(c.seek),
            filter_gap: OneEuroFilter::new(f.freq, f.gap_min_cutoff, f.gap_beta, f.derivative_cutoff),
            filter_x: OneEuroFilter::new(
                f.freq,
                f.center_min_cutoff,
                f.center_beta,
                f.derivative_cutoff,
            ),
            filter_y: OneEuroFilter::new(
                f.freq,
                f.center_min_cutoff,
                f.center_beta,
                f.derivative_cutoff,
            ),
            sink,
            snapshot: TrackingSnapshot::default(),
        }
    }

    pub fn system_on(&self) -> bool {
        self.system_on
    }

    pub fn muted(&self) -> bool {
        self.muted
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn snapshot(&self) -> TrackingSnapshot {
        self.snapshot
    }

    /// Applies a partial settings change. Called between frames only;
    /// the frame loop and the socket server share the processor under
    /// one lock, so an update can never land mid-frame.
    pub fn apply_update(&mut self, update: &SettingsUpdate) {
        self.settings.apply_update(update);
        for (class, secs) in CooldownClass::sorted(&update.cooldowns) {
            let gate = match class {
                CooldownClass::Toggle => &mut self.toggle_gate,
                CooldownClass::Pinch => &mut self.pinch_gate,
                CooldownClass::Seek => &mut self.seek_gate,
            };
            gate.set_limit(secs);
        }
    }

    /// Evaluates one frame's classification result. `now` is the
    /// capture timestamp in seconds on any monotonic scale; it drives
    /// the smoothing filters and the cooldown gates.
    pub fn process_frame(
        &mut self,
        result: Option<&RecognitionResult>,
        now: f64,
    ) -> Option<Action> {
        // Step 1: validity and hand selection. An absent or handless
        // result, or no hand matching the preference, is "hand lost":
        // transient tracking state is cleared.
        let Some(hand) = result.and_then(|r| self.select_hand(r)) else {
            self.reset_tracking();
            return None;
        };

        // Step 2: landmark and gesture extraction. Structural gaps are
        // single-frame glitches: bail without touching pinch state.
        let (Some(wrist), Some(middle_mcp), Some(thumb_tip), Some(index_tip), Some(label)) = (
            hand.landmark(WRIST),
            hand.landmark(MIDDLE_MCP),
            hand.landmark(THUMB_TIP),
            hand.landmark(INDEX_TIP),
            hand.top_gesture(),
        ) else {
            return None;
        };
        // Labels outside the canonical vocabulary match no binding but
        // still flow through the pinch stage.
        let token = GestureToken::from_label(label).unwrap_or(GestureToken::None);

        self.snapshot.wrist = Some((wrist.x, wrist.y));

        // Step 3: scale normalization. Thresholds are divided by the
        // scale factor so a fixed physical finger gap reads the same
        // at any distance from the camera.
        let hand_size = wrist.distance_to(middle_mcp);
        let scale_factor = (self.hand_calibration / hand_size.max(self.hand_size_floor))
            .clamp(self.scale_min, self.scale_max);
        let gap_threshold = self.base_gap_threshold / scale_factor;

        // Step 4.1: system toggle, absorbing. A denied gate still
        // swallows the frame so a held toggle pose cannot leak into
        // lower-priority rules.
        if self.settings.system_toggle.matches(token) {
            if self.toggle_gate.ready(now) {
                self.system_on = !self.system_on;
                info!(
                    "System {}",
                    if self.system_on { "started" } else { "stopped" }
                );
                if !self.system_on {
                    self.clear_pinch();
                    self.sink.dispatch(MediaCommand::SystemOff);
                    return Some(Action::SystemStopped);
                }
                return Some(Action::SystemStarted);
            }
            return None;
        }

        // Step 4.2: everything below is inert while the system is off.
        if !self.system_on {
            self.clear_pinch();
            return None;
        }

        // Step 4.3: discrete rules, first match wins. A matched rule
        // with a denied gate stops the scan (the same token cannot
        // fire a lower rule) but still reaches the pinch stage.
        let rules = [
            (self.settings.mute_toggle, DiscreteRule::MuteToggle),
            (self.settings.play_pause, DiscreteRule::PlayPause),
            (self.settings.next_track, DiscreteRule::NextTrack),
            (self.settings.prev_track, DiscreteRule::PrevTrack),
        ];
        for (binding, rule) in rules {
            if !binding.matches(token) {
                continue;
            }
            if self.toggle_gate.ready(now) {
                return Some(self.fire_discrete(rule));
            }
            break;
        }

        // Step 5: continuous pinch tracking.
        if !self.settings.pinch_enabled() {
            self.clear_pinch();
            return None;
        }

        let raw_gap = thumb_tip.distance_to(index_tip);
        let (raw_cx, raw_cy) = thumb_tip.midpoint(index_tip);
        let gap = self.filter_gap.filter(raw_gap, now);
        let cx = self.filter_x.filter(raw_cx, now);
        let cy = self.filter_y.filter(raw_cy, now);
        self.snapshot.pinch_center = Some((cx, cy));

        if gap > gap_threshold {
            // Pinch released.
            self.pinch_anchor = None;
            self.snapshot.pinch_anchor = None;
            return None;
        }

        let Some((ax, ay)) = self.pinch_anchor else {
            // Pinch just started: anchor, no action this frame.
            self.pinch_anchor = Some((cx, cy));
            self.snapshot.pinch_anchor = self.pinch_anchor;
            return None;
        };

        let dx = ax - cx;
        let dy = ay - cy;
        let magnitude = dx.hypot(dy);
        // Dead zone is in fixed frame units, deliberately not
        // scale-adjusted (unlike the gap threshold).
        if magnitude <= self.dead_zone {
            return None;
        }

        let action = if dx.abs() > dy.abs() {
            if !self.seek_gate.ready(now) {
                return None;
            }
            if dx > 0.0 {
                self.sink.dispatch(MediaCommand::SeekForward);
                Action::SeekForward
            } else {
                self.sink.dispatch(MediaCommand::SeekBack);
                Action::SeekBackward
            }
        } else {
            if !self.pinch_gate.ready(now) {
                return None;
            }
            if dy > 0.0 {
                self.sink.dispatch(MediaCommand::VolumeUp);
                Action::VolumeUp
            } else {
                self.sink.dispatch(MediaCommand::VolumeDown);
                Action::VolumeDown
            }
        };

        // Re-base so a held drag keeps firing step by step.
        self.pinch_anchor = Some((cx, cy));
        self.snapshot.pinch_anchor = self.pinch_anchor;
        debug!("Pinch step fired: {}", action);
        Some(action)
    }

    fn select_hand<'a>(&self, result: &'a RecognitionResult) -> Option<&'a HandObservation> {
        result.hands.iter().find(|hand| {
            hand.top_handedness()
                .map(|label| self.settings.hand_preference.accepts(label))
                .unwrap_or(false)
        })
    }

    fn fire_discrete(&mut self, rule: DiscreteRule) -> Action {
        match rule {
            DiscreteRule::MuteToggle => {
                self.muted = !self.muted;
                self.sink.dispatch(MediaCommand::Mute);
                if self.muted {
                    Action::Muted
                } else {
                    Action::Unmuted
                }
            }
            DiscreteRule::PlayPause => {
                self.sink.dispatch(MediaCommand::PlayPause);
                Action::PlayPause
            }
            DiscreteRule::NextTrack => {
                self.sink.dispatch(MediaCommand::NextTrack);
                Action::NextTrack
            }
            DiscreteRule::PrevTrack => {
                self.sink.dispatch(MediaCommand::PrevTrack);
                Action::PrevTrack
            }
        }
    }

    /// Drops the anchor and its telemetry mirrors together, so the
    /// snapshot never shows a pinch the engine no longer tracks.
    fn clear_pinch(&mut self) {
        self.pinch_anchor = None;
        self.snapshot.pinch_center = None;
        self.snapshot.pinch_anchor = None;
    }

    fn reset_tracking(&mut self) {
        self.pinch_anchor = None;
        self.snapshot = TrackingSnapshot::default();
    }
}
