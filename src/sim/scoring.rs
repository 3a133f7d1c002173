//! Streak multipliers and the announcer

use crate::tuning::Tuning;

/// Rotating flavor lines for good catches
pub const CATCH_CALLOUTS: [&str; 6] = [
    "Nice catch!",
    "Special delivery!",
    "Loaded up!",
    "Keep on truckin'!",
    "Cargo secured!",
    "Right on time!",
];

pub const HAZARD_CALLOUT: &str = "Ouch! Watch the road!";

/// Score multiplier for a catch that brings the streak to `streak`
pub fn streak_multiplier(streak: u32, tuning: &Tuning) -> f32 {
    if streak > tuning.streak_threshold + 2 {
        tuning.hot_streak_multiplier
    } else if streak >= tuning.streak_threshold {
        tuning.streak_multiplier
    } else {
        1.0
    }
}

/// Points awarded for a good object worth `base` (positive, enforced by pool validation)
pub fn catch_points(base: i32, multiplier: f32) -> u64 {
    (base as f32 * multiplier).round() as u64
}

/// Apply a hazard's negative value, flooring the score at zero
pub fn apply_damage(score: u64, value: i32) -> u64 {
    score.saturating_add_signed(value as i64)
}

/// Cycles through [`CATCH_CALLOUTS`] in order
#[derive(Debug, Clone, Default)]
pub struct Announcer {
    next: usize,
}

impl Announcer {
    pub fn reset(&mut self) {
        self.next = 0;
    }

    pub fn next_callout(&mut self) -> &'static str {
        let text = CATCH_CALLOUTS[self.next % CATCH_CALLOUTS.len()];
        self.next = (self.next + 1) % CATCH_CALLOUTS.len();
        text
    }
}
