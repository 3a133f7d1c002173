//! The player's truck

use glam::Vec2;

use super::collision::Aabb;
use crate::input::InputMode;
use crate::tuning::Tuning;

/// A cosmetic wheel. Spins with the truck's speed; has no physical role.
#[derive(Debug, Clone, PartialEq)]
pub struct Wheel {
    /// Alignment point relative to the body's bottom-center anchor
    pub offset: Vec2,
    pub rotation: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Vehicle {
    pub x: f32,
    /// Ground line; fixed for the whole session
    pub y: f32,
    pub velocity: f32,
    pub acceleration: f32,
    /// Visual tilt, eased toward a target derived from velocity
    pub rotation: f32,
    pub wheels: Vec<Wheel>,
    /// Rendered body sprite size (texture size times scale)
    pub body_size: Vec2,
}

impl Vehicle {
    pub fn new(x: f32, y: f32, body_size: Vec2, wheel_offsets: &[Vec2]) -> Self {
        Self {
            x,
            y,
            velocity: 0.0,
            acceleration: 0.0,
            rotation: 0.0,
            wheels: wheel_offsets
                .iter()
                .map(|&offset| Wheel {
                    offset,
                    rotation: 0.0,
                })
                .collect(),
            body_size,
        }
    }

    /// Park at `x` with no motion
    pub fn reset(&mut self, x: f32) {
        self.x = x;
        self.velocity = 0.0;
        self.acceleration = 0.0;
        self.rotation = 0.0;
        for wheel in &mut self.wheels {
            wheel.rotation = 0.0;
        }
    }

    /// Advance one frame under the given steering mode
    pub fn update(&mut self, mode: InputMode, dt: f32, tuning: &Tuning) {
        match mode {
            InputMode::Discrete { left, right } => {
                self.acceleration = match (left, right) {
                    (true, false) => -tuning.acceleration,
                    (false, true) => tuning.acceleration,
                    _ => 0.0,
                };
                self.velocity += self.acceleration * dt;
                self.velocity *= tuning.friction;
                self.velocity = self.velocity.clamp(-tuning.max_speed, tuning.max_speed);
                self.x += self.velocity * dt;
            }
            InputMode::Drag { target_x } => {
                // Exponential approach, not physical acceleration
                self.acceleration = 0.0;
                self.velocity = (target_x - self.x) * tuning.drag_easing;
                self.x += self.velocity * dt;
            }
        }

        let target_tilt = (self.velocity / tuning.max_speed) * tuning.tilt;
        self.rotation += (target_tilt - self.rotation) * tuning.tilt_smoothing;

        for wheel in &mut self.wheels {
            wheel.rotation += self.velocity * tuning.wheel_spin_rate * dt;
        }

        let min_x = tuning.edge_margin;
        let max_x = tuning.world_width - tuning.edge_margin;
        if self.x < min_x {
            self.x = min_x;
            self.velocity = 0.0;
        } else if self.x > max_x {
            self.x = max_x;
            self.velocity = 0.0;
        }
    }

    /// Hit box of the body sprite alone. Wheels hang outside the intended
    /// catch region and are excluded.
    pub fn body_bounds(&self) -> Aabb {
        Aabb::from_bottom_center(Vec2::new(self.x, self.y), self.body_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn truck(tuning: &Tuning) -> Vehicle {
        Vehicle::new(
            tuning.world_width / 2.0,
            tuning.vehicle_y(),
            Vec2::new(160.0, 60.0),
            &[Vec2::new(-50.0, -10.0), Vec2::new(50.0, -10.0)],
        )
    }

    #[test]
    fn holding_right_accelerates_then_caps() {
        let tuning = Tuning::default();
        let mut v = truck(&tuning);
        let start = v.x;
        for _ in 0..10 {
            v.update(
                InputMode::Discrete {
                    left: false,
                    right: true,
                },
                1.0,
                &tuning,
            );
        }
        assert!(v.velocity > 0.0);
        assert!(v.x > start);
        assert!(v.rotation > 0.0);
        assert!(v.wheels.iter().all(|w| w.rotation > 0.0));
    }

    #[test]
    fn friction_bleeds_speed_when_released() {
        let tuning = Tuning::default();
        let mut v = truck(&tuning);
        v.velocity = 10.0;
        let idle = InputMode::Discrete {
            left: false,
            right: false,
        };
        v.update(idle, 1.0, &tuning);
        assert!((v.velocity - 10.0 * tuning.friction).abs() < 1e-5);
        for _ in 0..200 {
            v.update(idle, 1.0, &tuning);
        }
        assert!(v.velocity.abs() < 1e-3);
    }

    #[test]
    fn both_directions_cancel() {
        let tuning = Tuning::default();
        let mut v = truck(&tuning);
        v.update(
            InputMode::Discrete {
                left: true,
                right: true,
            },
            1.0,
            &tuning,
        );
        assert_eq!(v.acceleration, 0.0);
        assert_eq!(v.velocity, 0.0);
    }

    #[test]
    fn drag_converges_on_target() {
        let tuning = Tuning::default();
        let mut v = truck(&tuning);
        let target_x = 300.0;
        let before = (v.x - target_x).abs();
        v.update(InputMode::Drag { target_x }, 1.0, &tuning);
        let after = (v.x - target_x).abs();
        assert!((after - before * (1.0 - tuning.drag_easing)).abs() < 1e-3);

        for _ in 0..200 {
            v.update(InputMode::Drag { target_x }, 1.0, &tuning);
        }
        assert!((v.x - target_x).abs() < 0.5);
    }

    #[test]
    fn drag_is_not_speed_clamped() {
        let tuning = Tuning::default();
        let mut v = truck(&tuning);
        v.x = tuning.edge_margin;
        v.update(
            InputMode::Drag {
                target_x: tuning.world_width - tuning.edge_margin,
            },
            1.0,
            &tuning,
        );
        assert!(v.velocity > tuning.max_speed);
    }

    #[test]
    fn edge_clamp_zeroes_velocity() {
        let tuning = Tuning::default();
        let mut v = truck(&tuning);
        v.x = tuning.edge_margin + 1.0;
        v.velocity = -tuning.max_speed;
        v.update(
            InputMode::Discrete {
                left: true,
                right: false,
            },
            1.0,
            &tuning,
        );
        assert_eq!(v.x, tuning.edge_margin);
        assert_eq!(v.velocity, 0.0);
    }

    #[test]
    fn body_bounds_exclude_wheels() {
        let tuning = Tuning::default();
        let v = truck(&tuning);
        let b = v.body_bounds();
        assert_eq!(b.bottom, v.y);
        assert_eq!(b.right - b.left, 160.0);
        assert_eq!(b.bottom - b.top, 60.0);
    }

    proptest! {
        #[test]
        fn discrete_speed_never_exceeds_max(
            steps in prop::collection::vec((any::<bool>(), any::<bool>(), 0.1f32..3.0), 1..300)
        ) {
            let tuning = Tuning::default();
            let mut v = truck(&tuning);
            for (left, right, dt) in steps {
                v.update(InputMode::Discrete { left, right }, dt, &tuning);
                prop_assert!(v.velocity.abs() <= tuning.max_speed);
                prop_assert!(v.x >= tuning.edge_margin);
                prop_assert!(v.x <= tuning.world_width - tuning.edge_margin);
            }
        }
    }
}
