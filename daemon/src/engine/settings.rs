use std::collections::HashMap;

use shared::ipc::SettingsUpdate;
use tracing::{info, warn};

use crate::config::Config;

/// Canonical classifier vocabulary. Anything the tracker reports
/// outside this set is treated as `None` and matches no binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureToken {
    None,
    ClosedFist,
    OpenPalm,
    PointingUp,
    ThumbDown,
    ThumbUp,
    Victory,
    ILoveYou,
}

impl GestureToken {
    /// Parses a classifier label. Accepts the canonical spellings and
    /// the settings-surface spellings ("Fist", "Open palm", ...).
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "None" => Some(Self::None),
            "Closed_Fist" | "Fist" => Some(Self::ClosedFist),
            "Open_Palm" | "Open palm" => Some(Self::OpenPalm),
            "Pointing_Up" | "Pointing up" => Some(Self::PointingUp),
            "Thumb_Down" | "Thumb down" => Some(Self::ThumbDown),
            "Thumb_Up" | "Thumb up" => Some(Self::ThumbUp),
            "Victory" => Some(Self::Victory),
            "ILoveYou" | "I love you" => Some(Self::ILoveYou),
            _ => None,
        }
    }
}

/// What a logical action is bound to: a static classifier token, or
/// one axis of the continuous pinch gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    Token(GestureToken),
    PinchVertical,
    PinchHorizontal,
}

impl Binding {
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Pinch up/down" => Some(Self::PinchVertical),
            "Pinch left/right" => Some(Self::PinchHorizontal),
            other => GestureToken::from_label(other).map(Self::Token),
        }
    }

    pub fn matches(&self, token: GestureToken) -> bool {
        matches!(self, Self::Token(t) if *t == token && token != GestureToken::None)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HandPreference {
    #[default]
    Left,
    Right,
    Both,
}

impl HandPreference {
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Left" => Some(Self::Left),
            "Right" => Some(Self::Right),
            "Both" | "Both / No Preference" => Some(Self::Both),
            _ => None,
        }
    }

    /// Whether a hand with this top handedness label is acceptable.
    pub fn accepts(&self, handedness: &str) -> bool {
        match self {
            Self::Both => true,
            Self::Left => handedness == "Left",
            Self::Right => handedness == "Right",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Left => "Left",
            Self::Right => "Right",
            Self::Both => "Both / No Preference",
        }
    }
}

/// One complete snapshot of the engine's runtime-tunable settings.
/// Replaced/merged only between frames, never mid-frame.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    pub hand_preference: HandPreference,
    pub system_toggle: Binding,
    pub mute_toggle: Binding,
    pub play_pause: Binding,
    pub next_track: Binding,
    pub prev_track: Binding,
    pub volume: Binding,
    pub seek: Binding,
    pub rest: Binding,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            hand_preference: HandPreference::Left,
            system_toggle: Binding::Token(GestureToken::Victory),
            mute_toggle: Binding::Token(GestureToken::ClosedFist),
            play_pause: Binding::Token(GestureToken::PointingUp),
            next_track: Binding::Token(GestureToken::ThumbUp),
            prev_track: Binding::Token(GestureToken::ThumbDown),
            volume: Binding::PinchVertical,
            seek: Binding::PinchHorizontal,
            rest: Binding::Token(GestureToken::OpenPalm),
        }
    }
}

impl EngineSettings {
    pub fn from_config(config: &Config) -> Self {
        let mut settings = Self::default();
        match HandPreference::from_label(&config.input.hand_preference) {
            Some(pref) => settings.hand_preference = pref,
            None => warn!(
                "Unknown hand preference {:?} in config, keeping {:?}",
                config.input.hand_preference, settings.hand_preference
            ),
        }
        for (action, token) in &config.gestures.map {
            settings.bind(action, token);
        }
        settings
    }

    /// Both pinch stages are skipped entirely unless at least one
    /// analog action is actually bound to a pinch axis.
    pub fn pinch_enabled(&self) -> bool {
        self.volume == Binding::PinchVertical || self.seek == Binding::PinchHorizontal
    }

    fn bind(&mut self, action: &str, token: &str) {
        let Some(binding) = Binding::from_label(token) else {
            warn!("Ignoring unknown gesture token {:?} for {:?}", token, action);
            return;
        };
        let slot = match action {
            "System Toggle" => &mut self.system_toggle,
            "Mute Toggle" => &mut self.mute_toggle,
            "Play/Pause" => &mut self.play_pause,
            "Next Track" => &mut self.next_track,
            "Previous Track" => &mut self.prev_track,
            "Volume up/down" => &mut self.volume,
            "Seek forward/backward" => &mut self.seek,
            "Rest" => &mut self.rest,
            _ => {
                warn!("Ignoring unknown action name {:?}", action);
                return;
            }
        };
        *slot = binding;
    }

    /// Merges a partial update: recognized keys overwrite, everything
    /// else is ignored, untouched fields keep their previous values.
    pub fn apply_update(&mut self, update: &SettingsUpdate) {
        if let Some(pref) = &update.hand_preference {
            match HandPreference::from_label(pref) {
                Some(parsed) => self.hand_preference = parsed,
                None => warn!("Ignoring unknown hand preference {:?}", pref),
            }
        }
        for (action, token) in &update.gestures {
            self.bind(action, token);
        }
        if !update.is_empty() {
            info!("Engine settings updated: {:?}", self);
        }
    }
}

/// Cooldown names accepted over the settings surface, mapped to the
/// engine's action classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CooldownClass {
    Toggle,
    Pinch,
    Seek,
}

impl CooldownClass {
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Toggle cooldown" | "toggle" => Some(Self::Toggle),
            "Volume cooldown" | "pinch" => Some(Self::Pinch),
            "Seekbar cooldown" | "seek" => Some(Self::Seek),
            _ => None,
        }
    }

    pub fn sorted(update: &HashMap<String, f64>) -> Vec<(Self, f64)> {
        let mut entries: Vec<(Self, f64)> = update
            .iter()
            .filter_map(|(name, secs)| match Self::from_label(name) {
                Some(class) => Some((class, *secs)),
                None => {
                    warn!("Ignoring unknown cooldown name {:?}", name);
                    None
                }
            })
            .collect();
        entries.sort_by_key(|(class, _)| *class as u8);
        entries
    }
}
