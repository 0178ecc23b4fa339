pub mod config;
pub mod engine;
pub mod output;
pub mod pipeline;
pub mod rate_limit;
pub mod server;
pub mod state;
pub mod tracking;

pub use engine::cooldown::CooldownGate;
pub use engine::filter::OneEuroFilter;
pub use engine::processor::{Action, GestureProcessor};
pub use output::dispatch::CommandDispatcher;
pub use output::MediaCommand;
pub use rate_limit::CommandRateLimiter;
pub use tracking::slot::ResultSlot;
