//! Player-facing presentation preferences
//!
//! Kept apart from [`crate::tuning::Tuning`]: settings never change gameplay, only how
//! much cosmetic work the session does.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    /// Share of the tuned ambient particle budget this preset allows
    pub fn ambient_share(&self) -> f32 {
        match self {
            QualityPreset::Low => 0.25,
            QualityPreset::Medium => 0.6,
            QualityPreset::High => 1.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub quality: QualityPreset,
    /// Screen shake on hazard hits
    pub screen_shake: bool,
    /// Particle effects (bursts and ambient drift)
    pub particles: bool,
    /// Reduced motion (suppresses shake)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            screen_shake: true,
            particles: true,
            reduced_motion: false,
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    /// Ambient particle cap after applying the preset to the tuned ceiling
    pub fn max_ambient_particles(&self, tuned_max: usize) -> usize {
        if !self.particles {
            0
        } else {
            (tuned_max as f32 * self.quality.ambient_share()).round() as usize
        }
    }
}
