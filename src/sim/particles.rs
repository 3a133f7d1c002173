//! Visual-feedback particles
//!
//! Two populations share one arena: short-lived bursts spawned on impacts, and a
//! capped set of ambient motes that drift and wrap around the screen edges.
//! Nothing here affects gameplay.

use glam::Vec2;
use rand::Rng;

use super::arena::Arena;
use crate::tuning::Tuning;

/// Burst particles slow down by this factor every frame
const BURST_DRAG: f32 = 0.96;
/// Downward pull on burst particles, per frame
const BURST_GRAVITY: f32 = 0.15;
const AMBIENT_TINT: u32 = 0xFFF8E7;

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// 0xRRGGBB
    pub color: u32,
    /// 1.0 at spawn, removed at 0.0; doubles as alpha
    pub life: f32,
    pub decay: f32,
    pub size: f32,
    pub ambient: bool,
}

impl Particle {
    pub fn alpha(&self) -> f32 {
        self.life.clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ParticleSystem {
    particles: Arena<Particle>,
    ambient_timer: f32,
    ambient_count: usize,
}

impl ParticleSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn ambient_count(&self) -> usize {
        self.ambient_count
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.values()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
        self.ambient_count = 0;
        self.ambient_timer = 0.0;
    }

    /// Radial spray of `count` particles at `at`
    pub fn burst(&mut self, rng: &mut impl Rng, at: Vec2, color: u32, count: u32, tuning: &Tuning) {
        for _ in 0..count {
            let angle = rng.random_range(0.0..std::f32::consts::TAU);
            let speed = tuning.burst_speed * rng.random_range(0.4..1.0);
            self.particles.insert(Particle {
                pos: at,
                vel: Vec2::new(angle.cos(), angle.sin()) * speed,
                color,
                life: 1.0,
                decay: tuning.burst_decay * rng.random_range(0.8..1.2),
                size: rng.random_range(2.0..5.0),
                ambient: false,
            });
        }
    }

    fn spawn_ambient(&mut self, rng: &mut impl Rng, world: Vec2, tuning: &Tuning) {
        let angle = rng.random_range(0.0..std::f32::consts::TAU);
        self.particles.insert(Particle {
            pos: Vec2::new(
                rng.random_range(0.0..world.x),
                rng.random_range(0.0..world.y),
            ),
            vel: Vec2::new(angle.cos(), angle.sin()) * tuning.ambient_speed,
            color: AMBIENT_TINT,
            life: 1.0,
            decay: tuning.ambient_decay,
            size: rng.random_range(1.0..3.0),
            ambient: true,
        });
        self.ambient_count += 1;
    }

    /// Advance all particles one frame and top up the ambient population, one
    /// mote per `ambient_interval`, never beyond `ambient_cap`.
    pub fn update(&mut self, rng: &mut impl Rng, dt: f32, tuning: &Tuning, ambient_cap: usize) {
        let world = Vec2::new(tuning.world_width, tuning.world_height);

        for (_, p) in self.particles.iter_mut() {
            p.pos += p.vel * dt;
            if p.ambient {
                p.pos.x = p.pos.x.rem_euclid(world.x);
                p.pos.y = p.pos.y.rem_euclid(world.y);
            } else {
                p.vel *= BURST_DRAG;
                p.vel.y += BURST_GRAVITY * dt;
            }
            p.life -= p.decay * dt;
        }

        let mut expired_ambient = 0;
        self.particles.retain(|_, p| {
            let alive = p.life > 0.0;
            if !alive && p.ambient {
                expired_ambient += 1;
            }
            alive
        });
        self.ambient_count -= expired_ambient;

        self.ambient_timer += dt;
        if self.ambient_timer >= tuning.ambient_interval {
            self.ambient_timer = 0.0;
            if self.ambient_count < ambient_cap {
                self.spawn_ambient(rng, world, tuning);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn burst_particles_fade_out() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(7);
        let mut ps = ParticleSystem::new();
        ps.burst(&mut rng, Vec2::new(100.0, 100.0), 0xFF0000, 12, &tuning);
        assert_eq!(ps.len(), 12);
        assert!(ps.iter().all(|p| !p.ambient && p.alpha() == 1.0));

        // Longest possible lifetime is 1 / (decay * 0.8) frames
        let frames = (1.0 / (tuning.burst_decay * 0.8)).ceil() as usize + 1;
        for _ in 0..frames {
            ps.update(&mut rng, 1.0, &tuning, 0);
        }
        assert!(ps.is_empty());
    }

    #[test]
    fn ambient_population_respects_cap() {
        let tuning = Tuning {
            ambient_interval: 1.0,
            ambient_decay: 0.0001,
            ..Default::default()
        };
        let mut rng = Pcg32::seed_from_u64(11);
        let mut ps = ParticleSystem::new();
        for _ in 0..500 {
            ps.update(&mut rng, 1.0, &tuning, 15);
            assert!(ps.ambient_count() <= 15);
        }
        assert_eq!(ps.ambient_count(), 15);
    }

    #[test]
    fn ambient_spawns_are_throttled() {
        let tuning = Tuning {
            ambient_interval: 10.0,
            ..Default::default()
        };
        let mut rng = Pcg32::seed_from_u64(3);
        let mut ps = ParticleSystem::new();
        for _ in 0..9 {
            ps.update(&mut rng, 1.0, &tuning, 100);
        }
        assert_eq!(ps.ambient_count(), 0);
        ps.update(&mut rng, 1.0, &tuning, 100);
        assert_eq!(ps.ambient_count(), 1);
    }

    #[test]
    fn ambient_wraps_instead_of_leaving() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(5);
        let mut ps = ParticleSystem::new();
        ps.spawn_ambient(&mut rng, Vec2::new(tuning.world_width, tuning.world_height), &tuning);
        for (_, p) in ps.particles.iter_mut() {
            p.pos = Vec2::new(tuning.world_width - 0.1, 5.0);
            p.vel = Vec2::new(1.0, 0.0);
        }
        ps.update(&mut rng, 1.0, &tuning, 0);
        let p = ps.iter().next().expect("still alive");
        assert!(p.pos.x < 1.0);
    }

    #[test]
    fn clear_resets_ambient_bookkeeping() {
        let tuning = Tuning {
            ambient_interval: 1.0,
            ..Default::default()
        };
        let mut rng = Pcg32::seed_from_u64(1);
        let mut ps = ParticleSystem::new();
        for _ in 0..5 {
            ps.update(&mut rng, 1.0, &tuning, 10);
        }
        assert!(ps.ambient_count() > 0);
        ps.clear();
        assert!(ps.is_empty());
        assert_eq!(ps.ambient_count(), 0);
    }
}
