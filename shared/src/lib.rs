pub mod ipc;
pub mod observation;

pub use ipc::{Command, IpcError, Response, SettingsUpdate, StatusInfo};
pub use observation::{CategoryScore, HandObservation, Landmark, RecognitionResult};
