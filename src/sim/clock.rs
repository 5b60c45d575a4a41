//! Frame clock
//!
//! Elapsed game time is derived from the tick counter, never measured. The
//! host drives ticks through [`FixedStep`], which converts wall-clock frame
//! times into a whole number of simulation steps.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::tuning::Tuning;

/// What the clock noticed while entering a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClockSignals {
    pub evac_opened: bool,
    pub timed_out: bool,
}

/// Round clock, counted in simulation ticks
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameClock {
    /// Index of the tick being simulated (0 on the first playing tick)
    pub tick: u64,
    /// Latched once the remaining time drops below the evacuation warning
    pub evac_open: bool,
    /// Latched once the round time is used up
    pub timed_out: bool,
}

impl GameClock {
    /// Whole seconds elapsed at the current tick
    pub fn elapsed_secs(&self) -> u64 {
        self.tick / TICKS_PER_SECOND
    }

    /// Whole minutes elapsed at the current tick
    pub fn elapsed_minutes(&self) -> u64 {
        self.elapsed_secs() / 60
    }

    pub fn remaining_secs(&self, tuning: &Tuning) -> u64 {
        tuning.round_secs.saturating_sub(self.elapsed_secs())
    }

    /// Whether the current tick lands on a multiple of `interval` ticks
    #[inline]
    pub fn every(&self, interval: u64) -> bool {
        interval > 0 && self.tick % interval == 0
    }

    /// Evaluate the latches for the current tick. Each fires at most once per session.
    pub fn enter_tick(&mut self, tuning: &Tuning) -> ClockSignals {
        let mut signals = ClockSignals::default();
        let remaining = self.remaining_secs(tuning);

        if !self.evac_open && remaining < tuning.evac_warning_secs {
            self.evac_open = true;
            signals.evac_opened = true;
        }
        if !self.timed_out && self.tick >= tuning.round_ticks() {
            self.timed_out = true;
            signals.timed_out = true;
        }
        signals
    }

    /// Finish the current tick
    pub fn advance(&mut self) {
        self.tick += 1;
    }
}

/// Wall-clock to fixed-step adapter for host loops
#[derive(Debug, Clone, Default)]
pub struct FixedStep {
    accumulator: f32,
}

impl FixedStep {
    /// Feed one frame's wall-clock duration; returns how many ticks to run
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        // Clamp long stalls (debugger, suspended tab) instead of fast-forwarding
        self.accumulator += frame_dt.clamp(0.0, 0.1);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        substeps
    }

    /// Fraction of a tick left over, for render interpolation
    pub fn alpha(&self) -> f32 {
        (self.accumulator / SIM_DT).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elapsed_time_from_ticks() {
        let mut clock = GameClock::default();
        assert_eq!(clock.elapsed_secs(), 0);
        clock.tick = 59;
        assert_eq!(clock.elapsed_secs(), 0);
        clock.tick = 60;
        assert_eq!(clock.elapsed_secs(), 1);
        clock.tick = 3 * 60 * 60 + 5 * 60;
        assert_eq!(clock.elapsed_minutes(), 3);
        assert_eq!(clock.elapsed_secs(), 185);
    }

    #[test]
    fn test_timeout_latches_exactly_once_at_nine_minutes() {
        let tuning = Tuning::default();
        let mut clock = GameClock::default();
        let mut timeouts = Vec::new();

        for _ in 0..(9 * 60 * 60 + 600) {
            if clock.enter_tick(&tuning).timed_out {
                timeouts.push(clock.tick);
            }
            clock.advance();
        }

        assert_eq!(timeouts, vec![9 * 60 * 60]);
        assert!(clock.timed_out);
    }

    #[test]
    fn test_evac_window_opens_below_two_minutes() {
        let tuning = Tuning::default();
        let mut clock = GameClock {
            tick: (540 - 120) * 60,
            ..Default::default()
        };
        // Exactly two minutes left: not yet
        assert!(!clock.enter_tick(&tuning).evac_opened);
        clock.tick += 60;
        assert!(clock.enter_tick(&tuning).evac_opened);
        clock.tick += 60;
        assert!(!clock.enter_tick(&tuning).evac_opened);
        assert!(clock.evac_open);
    }

    #[test]
    fn test_every() {
        let clock = GameClock {
            tick: 300,
            ..Default::default()
        };
        assert!(clock.every(20));
        assert!(clock.every(300));
        assert!(!clock.every(7));
        assert!(!clock.every(0));
    }

    #[test]
    fn test_fixed_step_accumulates_and_caps() {
        let mut step = FixedStep::default();
        assert_eq!(step.advance(SIM_DT * 0.5), 0);
        assert_eq!(step.advance(SIM_DT * 0.6), 1);
        // A huge stall is clamped to 0.1s (six ticks plus the leftover fraction)
        assert_eq!(step.advance(5.0), 6);
        assert!(step.alpha() < 1.0);
    }
}
