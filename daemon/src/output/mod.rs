pub mod dispatch;
pub mod http;
pub mod keyboard;

pub use dispatch::CommandDispatcher;

use serde::{Deserialize, Serialize};

/// Fixed command vocabulary accepted by every sink backend.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaCommand {
    PlayPause,
    VolumeUp,
    VolumeDown,
    SeekBack,
    SeekForward,
    Mute,
    NextTrack,
    PrevTrack,
    /// Marker emitted when the system-toggle gesture turns the system
    /// off, distinct from the toggle action label itself.
    SystemOff,
}

impl std::fmt::Display for MediaCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::PlayPause => "play-pause",
            Self::VolumeUp => "volume-up",
            Self::VolumeDown => "volume-down",
            Self::SeekBack => "seek-back",
            Self::SeekForward => "seek-forward",
            Self::Mute => "mute",
            Self::NextTrack => "next-track",
            Self::PrevTrack => "prev-track",
            Self::SystemOff => "system-off",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names() {
        assert_eq!(MediaCommand::PlayPause.to_string(), "play-pause");
        assert_eq!(MediaCommand::SystemOff.to_string(), "system-off");
    }

    #[test]
    fn test_serde_round_trip() {
        let json = serde_json::to_string(&MediaCommand::SeekBack).unwrap();
        let parsed: MediaCommand = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, MediaCommand::SeekBack);
    }
}
