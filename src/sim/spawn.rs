//! Falling object spawning
//!
//! A frame-counted timer releases one object per spawn interval. Each spawn
//! picks a pool (hazard or good), then an entry by weighted random choice.

use std::sync::Arc;

use glam::Vec2;
use rand::Rng;

use super::state::{FallingObject, ObjectKind};
use crate::assets::Texture;
use crate::error::{Error, Result};
use crate::tuning::Tuning;

/// One spawnable object type
#[derive(Debug, Clone, PartialEq)]
pub struct PoolEntry {
    pub label: Arc<str>,
    pub texture: Texture,
    /// Relative spawn probability within the pool
    pub weight: f32,
    /// Points for good objects, (negative) damage for hazards
    pub value: i32,
    /// Burst particle color, 0xRRGGBB
    pub tint: u32,
    pub scale: f32,
}

/// Validated good and hazard pools
#[derive(Debug, Clone)]
pub struct SpawnPools {
    pub good: Vec<PoolEntry>,
    pub hazard: Vec<PoolEntry>,
}

impl SpawnPools {
    pub fn new(good: Vec<PoolEntry>, hazard: Vec<PoolEntry>) -> Result<Self> {
        validate_pool(ObjectKind::Good, &good)?;
        validate_pool(ObjectKind::Hazard, &hazard)?;
        Ok(Self { good, hazard })
    }

    pub fn pool(&self, kind: ObjectKind) -> &[PoolEntry] {
        match kind {
            ObjectKind::Good => &self.good,
            ObjectKind::Hazard => &self.hazard,
        }
    }
}

/// A pool must be non-empty, every weight finite and positive, and every value
/// signed for its pool: points for good entries, damage for hazards.
pub fn validate_pool(kind: ObjectKind, entries: &[PoolEntry]) -> Result<()> {
    if entries.is_empty() {
        return Err(Error::EmptyPool { kind });
    }
    if let Some((index, entry)) = entries
        .iter()
        .enumerate()
        .find(|(_, e)| !(e.weight.is_finite() && e.weight > 0.0))
    {
        return Err(Error::NonPositiveWeight {
            kind,
            index,
            weight: entry.weight,
        });
    }
    let wrong_sign = |value: i32| match kind {
        ObjectKind::Good => value <= 0,
        ObjectKind::Hazard => value >= 0,
    };
    if let Some((index, entry)) = entries.iter().enumerate().find(|(_, e)| wrong_sign(e.value)) {
        return Err(Error::WrongValueSign {
            kind,
            index,
            value: entry.value,
        });
    }
    Ok(())
}

/// Pick an item with probability proportional to its weight.
///
/// Draws `r` in `[0, total)` and walks the items subtracting weights until `r`
/// goes non-positive. Falls back to the last item when rounding leaves `r`
/// slightly positive. Returns `None` only for an empty slice.
pub fn weighted_choice<'a, T>(
    rng: &mut impl Rng,
    items: &'a [T],
    weight: impl Fn(&T) -> f32,
) -> Option<&'a T> {
    let total: f32 = items.iter().map(&weight).sum();
    let mut r = rng.random::<f32>() * total;
    for item in items {
        r -= weight(item);
        if r <= 0.0 {
            return Some(item);
        }
    }
    items.last()
}

/// Spawn cadence
#[derive(Debug, Clone, Default)]
pub struct Spawner {
    timer: f32,
}

impl Spawner {
    pub fn reset(&mut self) {
        self.timer = 0.0;
    }

    /// Accumulate `dt`; true when an object is due
    pub fn update(&mut self, dt: f32, interval: f32) -> bool {
        self.timer += dt;
        if self.timer > interval {
            self.timer = 0.0;
            true
        } else {
            false
        }
    }
}

/// Roll a new falling object for the given stage
pub fn spawn_object(
    rng: &mut impl Rng,
    pools: &SpawnPools,
    tuning: &Tuning,
    stage: usize,
) -> FallingObject {
    let kind = if rng.random::<f32>() < tuning.hazard_probability {
        ObjectKind::Hazard
    } else {
        ObjectKind::Good
    };
    let pool = pools.pool(kind);
    // Pools are validated non-empty at construction
    let entry = weighted_choice(rng, pool, |e| e.weight).unwrap_or(&pool[0]);

    let x = rng.random_range(tuning.spawn_inset..=tuning.world_width - tuning.spawn_inset);
    let fall_speed = rng.random_range(tuning.fall_speed_min..=tuning.fall_speed_max)
        * tuning.speed_multiplier(stage);
    let rotation_speed = if tuning.rotation_speed_max > 0.0 {
        rng.random_range(-tuning.rotation_speed_max..=tuning.rotation_speed_max)
    } else {
        0.0
    };

    log::debug!(
        "Spawned {:?} `{}` at x={x:.0} (speed {fall_speed:.2})",
        kind,
        entry.label
    );

    FallingObject {
        kind,
        label: entry.label.clone(),
        texture: entry.texture.clone(),
        weight: entry.weight,
        value: entry.value,
        tint: entry.tint,
        pos: Vec2::new(x, -tuning.spawn_height),
        fall_speed,
        rotation: 0.0,
        rotation_speed,
        scale: entry.scale,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn entry(label: &str, weight: f32, value: i32) -> PoolEntry {
        PoolEntry {
            label: label.into(),
            texture: Texture::placeholder(0, label),
            weight,
            value,
            tint: 0xFFFFFF,
            scale: 0.5,
        }
    }

    #[test]
    fn weighted_frequencies_match_weights() {
        let mut rng = Pcg32::seed_from_u64(2024);
        let weights = [1.0f32, 1.0, 2.0];
        let items = [0usize, 1, 2];
        let mut counts = [0usize; 3];
        let n = 20_000;
        for _ in 0..n {
            let picked = weighted_choice(&mut rng, &items, |&i| weights[i])
                .expect("non-empty");
            counts[*picked] += 1;
        }
        let expected = [0.25, 0.25, 0.5];
        for (count, want) in counts.iter().zip(expected) {
            let freq = *count as f64 / n as f64;
            assert!((freq - want).abs() < 0.02, "freq {freq} vs {want}");
        }
    }

    #[test]
    fn weighted_choice_on_empty_is_none() {
        let mut rng = Pcg32::seed_from_u64(1);
        let empty: [f32; 0] = [];
        assert!(weighted_choice(&mut rng, &empty, |w| *w).is_none());
    }

    #[test]
    fn single_entry_always_wins() {
        let mut rng = Pcg32::seed_from_u64(9);
        for _ in 0..100 {
            assert_eq!(weighted_choice(&mut rng, &[7], |_| 0.5), Some(&7));
        }
    }

    #[test]
    fn empty_pool_is_rejected() {
        let err = SpawnPools::new(vec![], vec![entry("rock", 1.0, -10)]).unwrap_err();
        assert!(matches!(err, Error::EmptyPool { kind: ObjectKind::Good }));
    }

    #[test]
    fn non_positive_weight_is_rejected() {
        for bad in [0.0, -1.0, f32::NAN] {
            let err = SpawnPools::new(
                vec![entry("apple", 1.0, 10)],
                vec![entry("rock", 1.0, -10), entry("bomb", bad, -50)],
            )
            .unwrap_err();
            assert!(matches!(
                err,
                Error::NonPositiveWeight {
                    kind: ObjectKind::Hazard,
                    index: 1,
                    ..
                }
            ));
        }
    }

    #[test]
    fn wrongly_signed_values_are_rejected() {
        let err = SpawnPools::new(
            vec![entry("apple", 1.0, 10)],
            vec![entry("rock", 1.0, -10), entry("gift", 1.0, 40)],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Error::WrongValueSign {
                kind: ObjectKind::Hazard,
                index: 1,
                value: 40
            }
        ));

        for bad in [0, -5] {
            let err = SpawnPools::new(
                vec![entry("apple", 1.0, bad)],
                vec![entry("rock", 1.0, -10)],
            )
            .unwrap_err();
            assert!(matches!(
                err,
                Error::WrongValueSign {
                    kind: ObjectKind::Good,
                    index: 0,
                    ..
                }
            ));
        }
    }

    #[test]
    fn spawner_fires_after_interval() {
        let mut spawner = Spawner::default();
        let fired: Vec<bool> = (0..12).map(|_| spawner.update(1.0, 5.0)).collect();
        // Timer must exceed the interval, then restarts from zero
        assert_eq!(fired.iter().filter(|&&f| f).count(), 2);
        assert!(fired[5] && fired[11]);
    }

    #[test]
    fn spawned_objects_stay_inside_inset() {
        let tuning = Tuning::default();
        let pools = SpawnPools::new(
            vec![entry("apple", 1.0, 10)],
            vec![entry("rock", 1.0, -10)],
        )
        .expect("valid pools");
        let mut rng = Pcg32::seed_from_u64(42);
        let mut hazards = 0;
        for _ in 0..2_000 {
            let obj = spawn_object(&mut rng, &pools, &tuning, 2);
            assert!(obj.pos.x >= tuning.spawn_inset);
            assert!(obj.pos.x <= tuning.world_width - tuning.spawn_inset);
            assert!(obj.pos.y < 0.0);
            assert!(obj.fall_speed >= tuning.fall_speed_min * tuning.speed_multipliers[2]);
            if obj.kind == ObjectKind::Hazard {
                hazards += 1;
            }
        }
        let share = hazards as f32 / 2_000.0;
        assert!((share - tuning.hazard_probability).abs() < 0.05);
    }
}
