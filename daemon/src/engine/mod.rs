pub mod cooldown;
pub mod filter;
pub mod processor;
pub mod settings;

pub use cooldown::CooldownGate;
pub use filter::OneEuroFilter;
pub use processor::{Action, GestureProcessor, TrackingSnapshot};
pub use settings::{Binding, EngineSettings, GestureToken, HandPreference};
