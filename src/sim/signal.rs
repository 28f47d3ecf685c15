//! Traffic signal timing for the two intersection approaches

use serde::Serialize;
use tracing::debug;

/// Color shown by one approach's signal heads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalColor {
    Green,
    Yellow,
    Red,
}

impl SignalColor {
    pub fn is_red(self) -> bool {
        self == SignalColor::Red
    }
}

/// Phase durations in milliseconds.
///
/// Red is never stored: it is always the other approach's green plus yellow,
/// so the two approaches stay exactly complementary. The full cycle,
/// `2 * (green + yellow)`, always fits in a `u32`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalTiming {
    green_ms: u32,
    yellow_ms: u32,
}

impl SignalTiming {
    /// Returns `None` when the full cycle would not fit in a `u32`
    pub fn new(green_ms: u32, yellow_ms: u32) -> Option<Self> {
        green_ms
            .checked_add(yellow_ms)
            .and_then(|half| half.checked_mul(2))
            .map(|_| Self {
                green_ms,
                yellow_ms,
            })
    }

    pub fn green_ms(&self) -> u32 {
        self.green_ms
    }

    pub fn yellow_ms(&self) -> u32 {
        self.yellow_ms
    }

    pub fn red_ms(&self) -> u32 {
        self.green_ms + self.yellow_ms
    }

    /// Full cycle: green + yellow for each approach
    pub fn cycle_ms(&self) -> u32 {
        self.green_ms + self.yellow_ms + self.red_ms()
    }
}

impl Default for SignalTiming {
    fn default() -> Self {
        Self {
            green_ms: 5000,
            yellow_ms: 1000,
        }
    }
}

/// Which part of the cycle the intersection is in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalPhase {
    AGreen,
    AYellow,
    BGreen,
    BYellow,
}

impl SignalPhase {
    /// Colors for (approach A, approach B). Exactly one side is ever non-red.
    pub fn colors(self) -> (SignalColor, SignalColor) {
        match self {
            SignalPhase::AGreen => (SignalColor::Green, SignalColor::Red),
            SignalPhase::AYellow => (SignalColor::Yellow, SignalColor::Red),
            SignalPhase::BGreen => (SignalColor::Red, SignalColor::Green),
            SignalPhase::BYellow => (SignalColor::Red, SignalColor::Yellow),
        }
    }
}

/// Public signal state read by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SignalState {
    /// North-south approach
    pub approach_a: SignalColor,
    /// West-east approach
    pub approach_b: SignalColor,
    pub elapsed_ms: u32,
}

/// Purely time-driven four-phase signal automaton
#[derive(Debug, Clone)]
pub struct SignalController {
    timing: SignalTiming,
    elapsed_ms: u32,
    phase: SignalPhase,
}

impl SignalController {
    pub fn new(timing: SignalTiming) -> Self {
        Self {
            timing,
            elapsed_ms: 0,
            phase: Self::phase_at(&timing, 0),
        }
    }

    pub fn timing(&self) -> SignalTiming {
        self.timing
    }

    pub fn phase(&self) -> SignalPhase {
        self.phase
    }

    /// Advance the cycle counter by `dt_ms`, wrapping to zero at cycle end
    pub fn advance(&mut self, dt_ms: u32) -> SignalState {
        let cycle = self.timing.cycle_ms();
        self.elapsed_ms = self.elapsed_ms.saturating_add(dt_ms);
        if self.elapsed_ms >= cycle {
            self.elapsed_ms = 0;
        }

        let phase = Self::phase_at(&self.timing, self.elapsed_ms);
        if phase != self.phase {
            debug!(
                from = ?self.phase,
                to = ?phase,
                elapsed_ms = self.elapsed_ms,
                "Signal phase change"
            );
            self.phase = phase;
        }

        self.state()
    }

    pub fn state(&self) -> SignalState {
        let (approach_a, approach_b) = self.phase.colors();
        SignalState {
            approach_a,
            approach_b,
            elapsed_ms: self.elapsed_ms,
        }
    }

    fn phase_at(timing: &SignalTiming, elapsed_ms: u32) -> SignalPhase {
        let a_yellow_start = timing.green_ms;
        let b_green_start = timing.green_ms + timing.yellow_ms;
        let b_yellow_start = timing.cycle_ms() - timing.yellow_ms;

        if elapsed_ms < a_yellow_start {
            SignalPhase::AGreen
        } else if elapsed_ms < b_green_start {
            SignalPhase::AYellow
        } else if elapsed_ms < b_yellow_start {
            SignalPhase::BGreen
        } else {
            SignalPhase::BYellow
        }
    }
}

impl Default for SignalController {
    fn default() -> Self {
        Self::new(SignalTiming::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TICK_MS: u32 = 20;

    #[test]
    fn default_timing_has_complementary_red() {
        let timing = SignalTiming::default();
        assert_eq!(timing.red_ms(), 6000);
        assert_eq!(timing.cycle_ms(), 12_000);
    }

    #[test]
    fn rejects_cycle_that_overflows() {
        assert!(SignalTiming::new(u32::MAX - 10, 1000).is_none());
        assert!(SignalTiming::new(2_147_483_648, 1000).is_none());

        let widest = SignalTiming::new(u32::MAX / 2 - 1000, 1000).unwrap();
        assert_eq!(widest.cycle_ms(), u32::MAX - 1);
    }

    #[test]
    fn starts_with_a_green() {
        let signals = SignalController::default();
        let state = signals.state();
        assert_eq!(state.approach_a, SignalColor::Green);
        assert_eq!(state.approach_b, SignalColor::Red);
        assert_eq!(state.elapsed_ms, 0);
    }

    #[test]
    fn a_turns_yellow_after_250_ticks() {
        let mut signals = SignalController::default();
        for _ in 0..249 {
            assert_eq!(signals.advance(TICK_MS).approach_a, SignalColor::Green);
        }
        let state = signals.advance(TICK_MS);
        assert_eq!(state.elapsed_ms, 5000);
        assert_eq!(state.approach_a, SignalColor::Yellow);
        assert_eq!(state.approach_b, SignalColor::Red);
    }

    #[test]
    fn phase_boundaries_follow_timing() {
        let timing = SignalTiming::default();
        assert_eq!(SignalController::phase_at(&timing, 4999), SignalPhase::AGreen);
        assert_eq!(SignalController::phase_at(&timing, 5999), SignalPhase::AYellow);
        assert_eq!(SignalController::phase_at(&timing, 6000), SignalPhase::BGreen);
        assert_eq!(SignalController::phase_at(&timing, 10_999), SignalPhase::BGreen);
        assert_eq!(SignalController::phase_at(&timing, 11_000), SignalPhase::BYellow);
        assert_eq!(SignalController::phase_at(&timing, 11_999), SignalPhase::BYellow);
    }

    #[test]
    fn exactly_one_approach_is_non_red_at_all_times() {
        let mut signals = SignalController::new(SignalTiming::new(3000, 700).unwrap());
        for _ in 0..5_000 {
            let state = signals.advance(TICK_MS);
            let non_red = [state.approach_a, state.approach_b]
                .iter()
                .filter(|c| !c.is_red())
                .count();
            assert_eq!(non_red, 1, "at {} ms", state.elapsed_ms);
        }
    }

    #[test]
    fn state_repeats_after_one_cycle() {
        let mut signals = SignalController::default();
        let initial = signals.state();
        let ticks = signals.timing().cycle_ms() / TICK_MS;
        let mut last = initial;
        for _ in 0..ticks {
            last = signals.advance(TICK_MS);
        }
        assert_eq!(last, initial);
    }

    #[test]
    fn counter_never_reaches_cycle_length() {
        let mut signals = SignalController::default();
        let cycle = signals.timing().cycle_ms();
        for _ in 0..2_000 {
            assert!(signals.advance(30).elapsed_ms < cycle);
        }
    }
}
