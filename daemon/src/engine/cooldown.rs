/// Debounce timer for one action class.
///
/// Driven by the frame clock, not the wall clock: callers pass the
/// same monotonic timestamp the smoothing filters see. `ready()`
/// returns true at most once per `limit` seconds; the first call after
/// construction always fires, and only a firing re-arms the timer, so
/// hammering a hot gate never pushes the next allowed firing out.
#[derive(Debug)]
pub struct CooldownGate {
    limit: f64,
    last_fire: Option<f64>,
}

impl CooldownGate {
    pub fn new(limit_secs: f64) -> Self {
        Self {
            limit: limit_secs.max(0.0),
            last_fire: None,
        }
    }

    pub fn ready(&mut self, now: f64) -> bool {
        match self.last_fire {
            Some(last) if now - last < self.limit => false,
            _ => {
                self.last_fire = Some(now);
                true
            }
        }
    }

    pub fn limit(&self) -> f64 {
        self.limit
    }

    /// Updates the interval without resetting the last-fire timestamp.
    pub fn set_limit(&mut self, limit_secs: f64) {
        self.limit = limit_secs.max(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_call_fires() {
        let mut gate = CooldownGate::new(10.0);
        assert!(gate.ready(0.0));
    }

    #[test]
    fn test_denied_within_limit() {
        let mut gate = CooldownGate::new(0.6);
        assert!(gate.ready(1.0));
        assert!(!gate.ready(1.3));
        assert!(!gate.ready(1.59));
    }

    #[test]
    fn test_fires_again_after_limit() {
        let mut gate = CooldownGate::new(0.6);
        assert!(gate.ready(1.0));
        assert!(gate.ready(1.6));
    }

    #[test]
    fn test_denied_call_does_not_rearm() {
        let mut gate = CooldownGate::new(0.6);
        assert!(gate.ready(1.0));
        // Denied at 1.5, but the window still ends at 1.6.
        assert!(!gate.ready(1.5));
        assert!(gate.ready(1.6));
    }

    #[test]
    fn test_set_limit_keeps_timestamp() {
        let mut gate = CooldownGate::new(100.0);
        assert!(gate.ready(1.0));
        gate.set_limit(0.0);
        assert!(gate.ready(1.0));
    }

    #[test]
    fn test_negative_limit_clamped() {
        let gate = CooldownGate::new(-1.0);
        assert_eq!(gate.limit(), 0.0);
    }
}
