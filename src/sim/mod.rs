//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Frame-unit timestep supplied by the host
//! - Seeded RNG only
//! - Stable iteration order (by arena slot)
//! - No rendering or platform dependencies

pub mod arena;
pub mod autopilot;
pub mod clock;
pub mod collision;
pub mod event;
pub mod particles;
pub mod scoring;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod vehicle;

pub use arena::{Arena, Handle};
pub use autopilot::autopilot;
pub use clock::{CountdownClock, FixedStep, IntervalDriver, TimerHandle};
pub use collision::Aabb;
pub use event::GameEvent;
pub use particles::{Particle, ParticleSystem};
pub use scoring::{CATCH_CALLOUTS, HAZARD_CALLOUT, streak_multiplier};
pub use spawn::{PoolEntry, SpawnPools, Spawner, spawn_object, weighted_choice};
pub use state::{FallingObject, ObjectKind, Phase, Session, SessionStats};
pub use tick::{clock_second, continue_play, start, tick};
pub use vehicle::{Vehicle, Wheel};
