use std::f64::consts::PI;

/// One Euro filter: adaptive low-pass for a single tracked scalar.
///
/// Near-zero velocity the output follows the `min_cutoff` low-pass
/// response (maximum smoothing); as the signal speeds up the cutoff
/// rises with the velocity estimate scaled by `beta`, trading
/// smoothing for lag. Each tracked scalar gets its own instance so its
/// own velocity drives the adaptation.
#[derive(Debug)]
pub struct OneEuroFilter {
    /// Nominal sampling frequency (Hz), used for the very first sample
    /// and whenever timestamps fail to advance.
    freq: f64,
    min_cutoff: f64,
    beta: f64,
    d_cutoff: f64,

    x_prev: f64,
    dx_prev: f64,
    t_prev: Option<f64>,
}

impl OneEuroFilter {
    pub fn new(freq: f64, min_cutoff: f64, beta: f64, d_cutoff: f64) -> Self {
        Self {
            freq: freq.max(1e-6),
            min_cutoff,
            beta,
            d_cutoff,
            x_prev: 0.0,
            dx_prev: 0.0,
            t_prev: None,
        }
    }

    fn smoothing_factor(t_e: f64, cutoff: f64) -> f64 {
        let r = 2.0 * PI * cutoff * t_e;
        r / (r + 1.0)
    }

    /// Filters one sample taken at `t` seconds. The first sample
    /// passes through unchanged.
    pub fn filter(&mut self, x: f64, t: f64) -> f64 {
        let t_e = match self.t_prev {
            None => {
                self.x_prev = x;
                self.t_prev = Some(t);
                return x;
            }
            Some(prev) if t > prev => t - prev,
            // Stalled or repeated timestamp: assume one nominal period.
            Some(_) => 1.0 / self.freq,
        };

        let a_d = Self::smoothing_factor(t_e, self.d_cutoff);
        let dx = (x - self.x_prev) / t_e;
        let dx_hat = a_d * dx + (1.0 - a_d) * self.dx_prev;

        let cutoff = self.min_cutoff + self.beta * dx_hat.abs();
        let a = Self::smoothing_factor(t_e, cutoff);
        let x_hat = a * x + (1.0 - a) * self.x_prev;

        self.x_prev = x_hat;
        self.dx_prev = dx_hat;
        self.t_prev = Some(t);
        x_hat
    }

    pub fn reset(&mut self) {
        self.t_prev = None;
        self.dx_prev = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_sample_passes_through() {
        let mut f = OneEuroFilter::new(30.0, 1.0, 0.5, 1.0);
        assert_eq!(f.filter(0.42, 0.0), 0.42);
    }

    #[test]
    fn test_constant_signal_stays_constant() {
        let mut f = OneEuroFilter::new(30.0, 1.0, 0.5, 1.0);
        for i in 0..100 {
            let out = f.filter(0.5, i as f64 / 30.0);
            assert!((out - 0.5).abs() < 1e-9);
        }
    }

    #[test]
    fn test_slow_step_is_smoothed() {
        let mut f = OneEuroFilter::new(30.0, 1.0, 0.0, 1.0);
        f.filter(0.0, 0.0);
        // With beta = 0 the cutoff stays at min_cutoff; a unit step is
        // only partially tracked on the next sample.
        let out = f.filter(1.0, 1.0 / 30.0);
        assert!(out > 0.0 && out < 1.0);
    }

    #[test]
    fn test_high_beta_tracks_fast_motion_closer() {
        let mut slow = OneEuroFilter::new(30.0, 1.0, 0.0, 1.0);
        let mut fast = OneEuroFilter::new(30.0, 1.0, 50.0, 1.0);
        slow.filter(0.0, 0.0);
        fast.filter(0.0, 0.0);
        let out_slow = slow.filter(1.0, 1.0 / 30.0);
        let out_fast = fast.filter(1.0, 1.0 / 30.0);
        assert!(out_fast > out_slow);
    }

    #[test]
    fn test_stalled_timestamp_uses_nominal_period() {
        let mut f = OneEuroFilter::new(30.0, 1.0, 0.0, 1.0);
        f.filter(0.0, 1.0);
        // Same timestamp again: must not divide by zero and must keep
        // moving toward the input.
        let out = f.filter(1.0, 1.0);
        assert!(out.is_finite());
        assert!(out > 0.0);
    }

    #[test]
    fn test_reset_reprimes() {
        let mut f = OneEuroFilter::new(30.0, 1.0, 0.5, 1.0);
        f.filter(0.9, 0.0);
        f.filter(0.9, 1.0 / 30.0);
        f.reset();
        assert_eq!(f.filter(0.1, 1.0), 0.1);
    }

    #[test]
    fn test_jitter_reduced_at_low_speed() {
        // A noisy but stationary signal should come out with less
        // spread than it went in.
        let mut f = OneEuroFilter::new(30.0, 1.0, 0.0, 1.0);
        let noise = [0.01, -0.012, 0.008, -0.009, 0.011, -0.01, 0.009, -0.011];
        let mut max_out: f64 = 0.0;
        f.filter(0.5, 0.0);
        for (i, n) in noise.iter().cycle().take(64).enumerate() {
            let out = f.filter(0.5 + n, (i + 1) as f64 / 30.0);
            max_out = max_out.max((out - 0.5).abs());
        }
        assert!(max_out < 0.01);
    }
}
