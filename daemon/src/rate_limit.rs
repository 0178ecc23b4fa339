use governor::{clock, state::InMemoryState, state::NotKeyed, Quota, RateLimiter};
use std::num::NonZeroU32;

/// Flood guard in front of the output sink.
///
/// The engine's cooldown gates debounce individual gestures; this
/// token bucket caps the aggregate command rate so a misconfigured
/// gesture map (e.g. a 0-second cooldown) cannot hammer the sink.
pub struct CommandRateLimiter {
    limiter: RateLimiter<NotKeyed, InMemoryState, clock::DefaultClock>,
    enabled: bool,
}

impl CommandRateLimiter {
    /// # Panics
    /// Panics if `commands_per_second` or `burst_capacity` is 0.
    pub fn new(commands_per_second: u32, burst_capacity: u32, enabled: bool) -> Self {
        let quota = Quota::per_second(Self::non_zero(commands_per_second))
            .allow_burst(Self::non_zero(burst_capacity));

        Self {
            limiter: RateLimiter::direct(quota),
            enabled,
        }
    }

    /// Immediate check, never waits. True means the command may
    /// proceed; false means it should be dropped.
    pub fn check(&self) -> bool {
        if !self.enabled {
            return true;
        }
        self.limiter.check().is_ok()
    }

    fn non_zero(value: u32) -> NonZeroU32 {
        NonZeroU32::new(value).expect("rate limit values must be non-zero")
    }
}
