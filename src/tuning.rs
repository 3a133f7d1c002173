//! Data-driven game balance
//!
//! Every number the simulation reads lives here. Distances are world pixels and
//! rates are per nominal frame (a frame delta of 1.0 is one 60 Hz frame).

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Number of difficulty stages a session ramps through.
pub const STAGE_COUNT: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === World ===
    pub world_width: f32,
    pub world_height: f32,

    // === Session ===
    /// Session length in whole seconds
    pub session_seconds: u32,
    /// Time-remaining boundaries between stages 0/1 and 1/2 (strictly decreasing)
    pub stage_thresholds: [u32; 2],
    /// Frames between spawns, per stage
    pub spawn_intervals: [f32; STAGE_COUNT],
    /// Fall speed multiplier, per stage
    pub speed_multipliers: [f32; STAGE_COUNT],

    // === Vehicle ===
    /// Distance from the bottom edge to the vehicle's ground line
    pub vehicle_ground_offset: f32,
    pub vehicle_scale: f32,
    pub acceleration: f32,
    /// Velocity multiplier applied every discrete-mode frame (0 < friction < 1)
    pub friction: f32,
    pub max_speed: f32,
    /// Fraction of the remaining distance covered per frame while dragging
    pub drag_easing: f32,
    /// Tilt (radians) reached at full speed
    pub tilt: f32,
    pub tilt_smoothing: f32,
    pub wheel_spin_rate: f32,
    /// Closest the vehicle's center may get to either screen edge
    pub edge_margin: f32,

    // === Falling objects ===
    /// Added to every object's fall speed each frame
    pub gravity: f32,
    pub fall_speed_min: f32,
    pub fall_speed_max: f32,
    pub rotation_speed_max: f32,
    /// Horizontal inset from both edges for spawn positions
    pub spawn_inset: f32,
    /// How far above the top edge objects appear
    pub spawn_height: f32,
    pub hazard_probability: f32,
    pub good_scale: f32,
    pub hazard_scale: f32,
    /// Extra bounds around hazards for their glow backdrop
    pub hazard_glow_padding: f32,

    // === Scoring ===
    pub streak_threshold: u32,
    pub streak_multiplier: f32,
    /// Applies once the streak exceeds `streak_threshold + 2`
    pub hot_streak_multiplier: f32,
    pub prize_threshold: u64,
    pub shake_intensity: f32,

    // === Particles ===
    pub burst_count: u32,
    pub burst_speed: f32,
    pub burst_decay: f32,
    pub ambient_max: usize,
    /// Frames between ambient respawns
    pub ambient_interval: f32,
    pub ambient_decay: f32,
    pub ambient_speed: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            world_width: 1280.0,
            world_height: 720.0,

            session_seconds: 45,
            stage_thresholds: [35, 15],
            spawn_intervals: [55.0, 40.0, 28.0],
            speed_multipliers: [1.0, 1.35, 1.7],

            vehicle_ground_offset: 24.0,
            vehicle_scale: 0.5,
            acceleration: 0.9,
            friction: 0.88,
            max_speed: 14.0,
            drag_easing: 0.18,
            tilt: 0.12,
            tilt_smoothing: 0.15,
            wheel_spin_rate: 0.04,
            edge_margin: 70.0,

            gravity: 0.02,
            fall_speed_min: 2.5,
            fall_speed_max: 4.5,
            rotation_speed_max: 0.05,
            spawn_inset: 60.0,
            spawn_height: 80.0,
            hazard_probability: 0.3,
            good_scale: 0.45,
            hazard_scale: 0.5,
            hazard_glow_padding: 12.0,

            streak_threshold: 3,
            streak_multiplier: 1.5,
            hot_streak_multiplier: 2.0,
            prize_threshold: 500,
            shake_intensity: 0.6,

            burst_count: 14,
            burst_speed: 6.0,
            burst_decay: 0.035,
            ambient_max: 40,
            ambient_interval: 6.0,
            ambient_decay: 0.004,
            ambient_speed: 0.6,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) tuning table; missing keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Speed stage for the given time remaining. Non-decreasing as time runs down.
    pub fn stage_for(&self, time_remaining: u32) -> usize {
        let [first, second] = self.stage_thresholds;
        if time_remaining > first {
            0
        } else if time_remaining > second {
            1
        } else {
            2
        }
    }

    pub fn spawn_interval(&self, stage: usize) -> f32 {
        self.spawn_intervals[stage.min(STAGE_COUNT - 1)]
    }

    pub fn speed_multiplier(&self, stage: usize) -> f32 {
        self.speed_multipliers[stage.min(STAGE_COUNT - 1)]
    }

    /// World-space y of the vehicle's ground line
    pub fn vehicle_y(&self) -> f32 {
        self.world_height - self.vehicle_ground_offset
    }

    pub fn validate(&self) -> Result<()> {
        fn invalid(field: &'static str, reason: impl Into<String>) -> Result<()> {
            Err(Error::InvalidTuning {
                field,
                reason: reason.into(),
            })
        }

        if !(self.world_width > 0.0 && self.world_height > 0.0) {
            return invalid("world_width", "world dimensions must be positive");
        }
        if self.session_seconds == 0 {
            return invalid("session_seconds", "must be at least one second");
        }
        let [first, second] = self.stage_thresholds;
        if !(first > second && first < self.session_seconds) {
            return invalid(
                "stage_thresholds",
                format!(
                    "need session_seconds ({}) > {first} > {second}",
                    self.session_seconds
                ),
            );
        }
        if self.spawn_intervals.iter().any(|&i| !(i > 0.0)) {
            return invalid("spawn_intervals", "every interval must be positive");
        }
        if self.speed_multipliers.iter().any(|&m| !(m > 0.0)) {
            return invalid("speed_multipliers", "every multiplier must be positive");
        }
        if !(self.friction > 0.0 && self.friction < 1.0) {
            return invalid("friction", "must lie strictly between 0 and 1");
        }
        if !(self.max_speed > 0.0) {
            return invalid("max_speed", "must be positive");
        }
        if !(self.drag_easing > 0.0 && self.drag_easing <= 1.0) {
            return invalid("drag_easing", "must lie in (0, 1]");
        }
        if !(self.tilt_smoothing > 0.0 && self.tilt_smoothing <= 1.0) {
            return invalid("tilt_smoothing", "must lie in (0, 1]");
        }
        if self.edge_margin * 2.0 >= self.world_width {
            return invalid("edge_margin", "margins leave no room to drive");
        }
        if self.spawn_inset * 2.0 >= self.world_width {
            return invalid("spawn_inset", "insets leave no room to spawn");
        }
        if !(0.0..=1.0).contains(&self.hazard_probability) {
            return invalid("hazard_probability", "must be a probability");
        }
        if !(self.fall_speed_min > 0.0 && self.fall_speed_min <= self.fall_speed_max) {
            return invalid("fall_speed_min", "need 0 < fall_speed_min <= fall_speed_max");
        }
        if self.rotation_speed_max < 0.0 {
            return invalid("rotation_speed_max", "must not be negative");
        }
        if self.streak_threshold == 0 {
            return invalid("streak_threshold", "must be at least 1");
        }
        if !(self.ambient_interval > 0.0) {
            return invalid("ambient_interval", "must be positive");
        }
        if !(self.burst_decay > 0.0 && self.ambient_decay > 0.0) {
            return invalid("burst_decay", "particle decay rates must be positive");
        }
        Ok(())
    }
}
