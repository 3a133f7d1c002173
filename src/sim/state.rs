//! Session state and core simulation types
//!
//! Everything the state machine reads or writes lives in [`Session`]; the
//! subsystems in `tick` take it by `&mut` and never stash state elsewhere.

use std::sync::Arc;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::arena::Arena;
use super::clock::{CountdownClock, TimerHandle};
use super::collision::Aabb;
use super::event::GameEvent;
use super::particles::ParticleSystem;
use super::scoring::Announcer;
use super::spawn::Spawner;
use super::vehicle::Vehicle;
use crate::assets::{SessionAssets, Texture};
use crate::error::Result;
use crate::settings::Settings;
use crate::tuning::Tuning;

const FX_SEED_SALT: u64 = 0x9E37_79B9_7F4A_7C15;

/// Session state machine phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Assets loaded, waiting for the first start
    Idle,
    /// Clock running, simulation live
    Playing,
    /// Prize overlay up; clock cancelled, simulation frozen
    Paused,
    /// Time ran out; final score on display
    Ended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    Good,
    Hazard,
}

/// Something falling toward the truck. `kind` never changes after spawn.
#[derive(Debug, Clone, PartialEq)]
pub struct FallingObject {
    pub kind: ObjectKind,
    pub label: Arc<str>,
    pub texture: Texture,
    pub weight: f32,
    pub value: i32,
    pub tint: u32,
    /// Sprite center
    pub pos: Vec2,
    pub fall_speed: f32,
    pub rotation: f32,
    pub rotation_speed: f32,
    pub scale: f32,
}

impl FallingObject {
    pub fn update(&mut self, dt: f32, gravity: f32) {
        self.fall_speed += gravity * dt;
        self.pos.y += self.fall_speed * dt;
        self.rotation += self.rotation_speed * dt;
    }

    /// Full rendered bounds, including the glow drawn behind hazards
    pub fn bounds(&self, glow_padding: f32) -> Aabb {
        let sprite = Aabb::from_center(self.pos, self.texture.size() * self.scale);
        match self.kind {
            ObjectKind::Good => sprite,
            ObjectKind::Hazard => sprite.expand(glow_padding),
        }
    }

    /// Entirely below the visible area
    pub fn is_offscreen(&self, world_height: f32, glow_padding: f32) -> bool {
        self.bounds(glow_padding).top > world_height
    }
}

/// Per-session counters for the end-of-session summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    pub catches: u32,
    pub hazards_hit: u32,
    pub misses: u32,
    pub best_streak: u32,
}

/// Complete state of one play session
#[derive(Debug, Clone)]
pub struct Session {
    pub tuning: Tuning,
    pub settings: Settings,
    pub assets: SessionAssets,
    /// Seed for reproducibility
    pub seed: u64,
    /// Gameplay rolls (spawn kind, entry, position, speed)
    pub(crate) rng: Pcg32,
    /// Cosmetic rolls only, so particle settings never shift gameplay
    pub(crate) fx_rng: Pcg32,
    pub phase: Phase,
    pub score: u64,
    /// Whole seconds left on the countdown
    pub time_remaining: u32,
    /// Consecutive good catches since the last hazard hit
    pub streak: u32,
    /// Difficulty stage, 0..STAGE_COUNT; only ever increases within a session
    pub stage: usize,
    /// The prize pause fires once per session
    pub prize_achieved: bool,
    pub vehicle: Vehicle,
    pub objects: Arena<FallingObject>,
    pub particles: ParticleSystem,
    pub spawner: Spawner,
    pub clock: CountdownClock,
    pub announcer: Announcer,
    pub stats: SessionStats,
    /// Simulation frame counter for the current session
    pub frames: u64,
    /// Effects produced since the last drain
    pub events: Vec<GameEvent>,
}

impl Session {
    /// Build an idle session; call [`super::start`] to begin play.
    pub fn new(tuning: Tuning, settings: Settings, assets: SessionAssets, seed: u64) -> Result<Self> {
        tuning.validate()?;

        let body_size = assets.body.size() * tuning.vehicle_scale;
        let wheel_offsets: Vec<Vec2> = assets
            .wheels
            .iter()
            .map(|(_, offset)| *offset * tuning.vehicle_scale)
            .collect();
        let vehicle = Vehicle::new(
            tuning.world_width / 2.0,
            tuning.vehicle_y(),
            body_size,
            &wheel_offsets,
        );

        Ok(Self {
            time_remaining: tuning.session_seconds,
            tuning,
            settings,
            assets,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            fx_rng: Pcg32::seed_from_u64(seed ^ FX_SEED_SALT),
            phase: Phase::Idle,
            score: 0,
            streak: 0,
            stage: 0,
            prize_achieved: false,
            vehicle,
            objects: Arena::with_capacity(32),
            particles: ParticleSystem::new(),
            spawner: Spawner::default(),
            clock: CountdownClock::default(),
            announcer: Announcer::default(),
            stats: SessionStats::default(),
            frames: 0,
            events: Vec::new(),
        })
    }

    /// Handle of the running countdown, if any
    pub fn timer_handle(&self) -> Option<TimerHandle> {
        self.clock.active()
    }

    /// Take all pending effect events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::sim::{PoolEntry, SpawnPools};

    pub fn entry(label: &str, weight: f32, value: i32) -> PoolEntry {
        PoolEntry {
            label: label.into(),
            texture: Texture::placeholder(0, label),
            weight,
            value,
            tint: 0x00FF00,
            scale: 0.5,
        }
    }

    /// 64x64 placeholders everywhere, one entry per pool
    pub fn assets() -> SessionAssets {
        SessionAssets {
            body: Texture {
                id: 0,
                path: "body.png".into(),
                width: 320,
                height: 120,
                placeholder: false,
            },
            wheels: vec![
                (Texture::placeholder(1, "wheel.png"), Vec2::new(-100.0, -10.0)),
                (Texture::placeholder(1, "wheel.png"), Vec2::new(100.0, -10.0)),
            ],
            background: Texture::placeholder(2, "bg.png"),
            pools: SpawnPools::new(
                vec![entry("crate", 1.0, 10)],
                vec![entry("anvil", 1.0, -30)],
            )
            .expect("valid pools"),
        }
    }

    pub fn session(seed: u64) -> Session {
        Session::new(Tuning::default(), Settings::default(), assets(), seed).expect("valid session")
    }

    pub fn object(kind: ObjectKind, value: i32, pos: Vec2) -> FallingObject {
        FallingObject {
            kind,
            label: "test".into(),
            texture: Texture::placeholder(0, "test.png"),
            weight: 1.0,
            value,
            tint: 0xFF0000,
            pos,
            fall_speed: 0.0,
            rotation: 0.0,
            rotation_speed: 0.0,
            scale: 0.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn new_session_is_idle_and_full_time() {
        let session = session(1);
        assert_eq!(session.phase, Phase::Idle);
        assert_eq!(session.time_remaining, 45);
        assert_eq!(session.timer_handle(), None);
        assert!(session.objects.is_empty());
        // Body is texture size scaled
        assert_eq!(session.vehicle.body_size, Vec2::new(160.0, 60.0));
        assert_eq!(session.vehicle.wheels[0].offset, Vec2::new(-50.0, -5.0));
    }

    #[test]
    fn hazard_bounds_include_glow() {
        let good = object(ObjectKind::Good, 10, Vec2::new(100.0, 100.0));
        let hazard = object(ObjectKind::Hazard, -10, Vec2::new(100.0, 100.0));
        let g = good.bounds(12.0);
        let h = hazard.bounds(12.0);
        assert_eq!(g.right - g.left, 32.0);
        assert_eq!(h.right - h.left, 56.0);
    }

    #[test]
    fn object_falls_and_leaves_screen() {
        let mut obj = object(ObjectKind::Good, 10, Vec2::new(100.0, 700.0));
        obj.fall_speed = 4.0;
        obj.rotation_speed = 0.1;
        obj.update(1.0, 0.0);
        assert_eq!(obj.pos.y, 704.0);
        assert!((obj.rotation - 0.1).abs() < 1e-6);
        assert!(!obj.is_offscreen(720.0, 0.0));

        obj.pos.y = 737.0;
        assert!(obj.is_offscreen(720.0, 0.0));
    }

    #[test]
    fn invalid_tuning_is_rejected() {
        let tuning = Tuning {
            max_speed: 0.0,
            ..Default::default()
        };
        assert!(Session::new(tuning, Settings::default(), assets(), 0).is_err());
    }
}
