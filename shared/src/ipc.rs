use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::observation::RecognitionResult;

/// Socket path shared by the daemon and the clients (the CLI and the
/// external tracker). XDG runtime dir when available, /tmp otherwise.
pub fn socket_path() -> PathBuf {
    if let Ok(dir) = std::env::var("XDG_RUNTIME_DIR") {
        PathBuf::from(dir).join("wavectld.sock")
    } else {
        PathBuf::from("/tmp/wavectld.sock")
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum Command {
    /// Start the frame-processing loop.
    Start,
    /// Stop the frame-processing loop.
    Stop,
    Status,
    /// Latest classification result from the tracker. Latest-value
    /// semantics: a new publish replaces whatever was in the slot.
    Publish(RecognitionResult),
    UpdateConfig(SettingsUpdate),
}

/// Partial runtime settings change. Every field is optional; maps may
/// name any subset of cooldowns/actions. Unrecognized keys are ignored
/// by the engine, missing keys retain their previous values.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct SettingsUpdate {
    #[serde(default)]
    pub hand_preference: Option<String>,
    #[serde(default)]
    pub cooldowns: HashMap<String, f64>,
    #[serde(default)]
    pub gestures: HashMap<String, String>,
}

impl SettingsUpdate {
    pub fn is_empty(&self) -> bool {
        self.hand_preference.is_none() && self.cooldowns.is_empty() && self.gestures.is_empty()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum Response {
    Ok,
    Error(String),
    Status(StatusInfo),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StatusInfo {
    pub is_running: bool,
    /// Whether the frame loop is active.
    pub is_active: bool,
    /// Master enable toggled by the system-toggle gesture.
    pub system_on: bool,
    pub muted: bool,
    pub hand_preference: String,
    pub last_action: Option<String>,
}

#[derive(Error, Debug)]
pub enum IpcError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Connection refused: is wavectld running?")]
    ConnectionRefused,

    #[error("Connection timeout")]
    Timeout,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observation::{CategoryScore, HandObservation, Landmark};

    #[test]
    fn test_command_serialization_start() {
        let cmd = Command::Start;
        let json = serde_json::to_string(&cmd).unwrap();
        assert_eq!(json, r#""Start""#);
    }

    #[test]
    fn test_command_round_trip_all_variants() {
        let mut update = SettingsUpdate::default();
        update.hand_preference = Some("Right".to_string());
        update.cooldowns.insert("Toggle cooldown".to_string(), 0.8);
        update
            .gestures
            .insert("Play/Pause".to_string(), "Open palm".to_string());

        let commands = vec![
            Command::Start,
            Command::Stop,
            Command::Status,
            Command::Publish(RecognitionResult {
                hands: vec![HandObservation {
                    landmarks: vec![Landmark::new(0.5, 0.5)],
                    handedness: vec![CategoryScore::new("Left", 1.0)],
                    gestures: vec![CategoryScore::new("Victory", 0.9)],
                }],
            }),
            Command::UpdateConfig(update),
        ];
        for cmd in commands {
            let json = serde_json::to_string(&cmd).unwrap();
            let deserialized: Command = serde_json::from_str(&json).unwrap();
            assert_eq!(cmd, deserialized);
        }
    }

    #[test]
    fn test_settings_update_is_empty() {
        assert!(SettingsUpdate::default().is_empty());
        let update = SettingsUpdate {
            hand_preference: Some("Left".to_string()),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }

    #[test]
    fn test_settings_update_partial_json() {
        // Missing maps deserialize to empty, not an error.
        let update: SettingsUpdate =
            serde_json::from_str(r#"{"hand_preference":"Both / No Preference"}"#).unwrap();
        assert_eq!(update.hand_preference.as_deref(), Some("Both / No Preference"));
        assert!(update.cooldowns.is_empty());
        assert!(update.gestures.is_empty());
    }

    #[test]
    fn test_response_serialization_ok() {
        let resp = Response::Ok;
        let json = serde_json::to_string(&resp).unwrap();
        assert_eq!(json, r#""Ok""#);
    }

    #[test]
    fn test_response_round_trip_all_variants() {
        let responses = vec![
            Response::Ok,
            Response::Error("error".to_string()),
            Response::Status(StatusInfo {
                is_running: true,
                is_active: false,
                system_on: true,
                muted: false,
                hand_preference: "Left".to_string(),
                last_action: Some("Play/Pause".to_string()),
            }),
        ];
        for resp in responses {
            let json = serde_json::to_string(&resp).unwrap();
            let deserialized: Response = serde_json::from_str(&json).unwrap();
            assert_eq!(resp, deserialized);
        }
    }

    #[test]
    fn test_ipc_error_display_connection_refused() {
        let err = IpcError::ConnectionRefused;
        assert!(err.to_string().contains("Connection refused"));
    }

    #[test]
    fn test_ipc_error_display_io() {
        let err = IpcError::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "test"));
        assert!(err.to_string().contains("IO error"));
    }

    #[test]
    fn test_socket_path_fallback() {
        let path = socket_path();
        assert!(path.to_string_lossy().ends_with("wavectld.sock"));
    }
}
