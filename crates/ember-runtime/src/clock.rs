//! Deterministic frame clock

/// Longest frame the clock will report; longer stalls are clamped
const MAX_FRAME_TIME: f64 = 0.25;

/// Tracks game time frame by frame.
///
/// The host decides how much time passes: [`step`](Self::step) advances by the
/// fixed timestep, [`advance`](Self::advance) by an explicit delta. Either way the
/// timeline is reproducible.
pub struct GameClock {
    /// Total elapsed game time in seconds
    pub total_time: f64,
    /// Time since last frame in seconds
    pub delta_time: f64,
    /// Fixed timestep interval (default: 1/60 second)
    pub fixed_timestep: f64,
    /// Frames advanced so far
    pub frame: u64,
}

impl Default for GameClock {
    fn default() -> Self {
        Self {
            total_time: 0.0,
            delta_time: 0.0,
            fixed_timestep: 1.0 / 60.0,
            frame: 0,
        }
    }
}

impl GameClock {
    /// Create a new game clock with default 60Hz fixed timestep
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a game clock with a custom fixed timestep
    pub fn with_fixed_timestep(hz: f64) -> Self {
        Self {
            fixed_timestep: 1.0 / hz,
            ..Self::default()
        }
    }

    /// Advance by one fixed timestep
    pub fn step(&mut self) {
        self.advance(self.fixed_timestep);
    }

    /// Advance by an explicit delta. Negative deltas are treated as zero.
    pub fn advance(&mut self, dt: f64) {
        // Clamp to avoid spiral of death
        self.delta_time = dt.clamp(0.0, MAX_FRAME_TIME);
        self.total_time += self.delta_time;
        self.frame += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_defaults() {
        let clock = GameClock::new();
        assert!((clock.fixed_timestep - 1.0 / 60.0).abs() < 1e-10);
        assert_eq!(clock.total_time, 0.0);
        assert_eq!(clock.delta_time, 0.0);
        assert_eq!(clock.frame, 0);
    }

    #[test]
    fn test_custom_timestep() {
        let clock = GameClock::with_fixed_timestep(30.0);
        assert!((clock.fixed_timestep - 1.0 / 30.0).abs() < 1e-10);
    }

    #[test]
    fn test_step_uses_fixed_timestep() {
        let mut clock = GameClock::with_fixed_timestep(20.0);
        for _ in 0..20 {
            clock.step();
        }
        assert!((clock.delta_time - 0.05).abs() < 1e-10);
        assert!((clock.total_time - 1.0).abs() < 1e-9);
        assert_eq!(clock.frame, 20);
    }

    #[test]
    fn test_step_clamps_slow_rates() {
        let mut clock = GameClock::with_fixed_timestep(2.0);
        clock.step();
        assert_eq!(clock.delta_time, MAX_FRAME_TIME);
    }

    #[test]
    fn test_advance_accumulates() {
        let mut clock = GameClock::new();
        for _ in 0..10 {
            clock.advance(0.1);
        }
        assert!((clock.total_time - 1.0).abs() < 1e-9);
        assert_eq!(clock.frame, 10);
    }

    #[test]
    fn test_advance_clamps() {
        let mut clock = GameClock::new();
        clock.advance(5.0);
        assert_eq!(clock.delta_time, MAX_FRAME_TIME);
        clock.advance(-1.0);
        assert_eq!(clock.delta_time, 0.0);
        assert_eq!(clock.total_time, MAX_FRAME_TIME);
    }
}
