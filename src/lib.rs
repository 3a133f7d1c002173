//! Truck Catch - a single-screen arcade catch game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (vehicle, spawning, collisions, session state)
//! - `assets`: Manifest walking and texture loading
//! - `input`: Keyboard, pointer and gamepad aggregation
//! - `hud`: Display values computed from a session
//! - `tuning`: Data-driven game balance

pub mod assets;
pub mod error;
pub mod hud;
pub mod input;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use assets::{MissingAssetPolicy, SessionAssets, Texture};
pub use error::{Error, Result};
pub use hud::Hud;
pub use input::{InputAggregator, InputFrame, InputMode};
pub use settings::{QualityPreset, Settings};
pub use sim::{GameEvent, Phase, Session};
pub use tuning::Tuning;

/// Host loop constants
pub mod consts {
    /// Reference frame rate; a `dt` of 1.0 is one frame at this rate
    pub const FRAME_RATE: f32 = 60.0;
    /// Fixed simulation step in seconds
    pub const SIM_DT: f32 = 1.0 / FRAME_RATE;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
}
