//! Effect events emitted by the simulation
//!
//! Scoring and collision never touch presentation directly; they push events
//! here and the host drains them once per frame (sound, tweens, HUD popups).

use std::sync::Arc;

use glam::Vec2;
use serde::Serialize;

use super::state::ObjectKind;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    /// Playing began (fresh start or restart)
    SessionStarted { seconds: u32 },
    /// A good object landed in the truck
    Caught {
        label: Arc<str>,
        points: u64,
        multiplier: f32,
        streak: u32,
    },
    /// A hazard hit the truck
    HazardHit { label: Arc<str>, damage: i32 },
    /// Particle spray at an impact point
    Burst {
        #[serde(skip)]
        pos: Vec2,
        color: u32,
        kind: ObjectKind,
    },
    ScreenShake { intensity: f32 },
    /// Announcer text to flash on screen
    Callout { text: &'static str },
    StageChanged { stage: usize },
    /// The prize threshold was crossed; play is paused until continued
    PrizeUnlocked { score: u64 },
    Resumed,
    SessionEnded { score: u64 },
}
