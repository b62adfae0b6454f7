//! Damped springs.
//!
//! `a = (-stiffness * (x - target) - damping * v) / mass`, integrated with
//! semi-implicit Euler in sub-steps no longer than [`MAX_SUBSTEP`] seconds so
//! stiff, light springs stay stable at low frame rates.

use glam::Vec2;

/// Longest integration step in seconds.
pub const MAX_SUBSTEP: f32 = 1.0 / 240.0;
/// Longest frame delta integrated in one update, e.g. after a suspend.
pub const MAX_FRAME_DELTA: f32 = 0.25;

/// Distance and speed below which a spring counts as settled.
const REST_DELTA: f32 = 0.01;
const REST_SPEED: f32 = 0.01;

/// Spring constants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringConfig {
    /// Pull toward the target per unit of displacement.
    pub stiffness: f32,
    /// Resistance per unit of velocity.
    pub damping: f32,
    pub mass: f32,
}

impl SpringConfig {
    /// Outer cursor ring.
    pub const CURSOR_RING: SpringConfig = SpringConfig::new(300.0, 25.0, 0.5);
    /// Inner cursor dot; stiffer and lighter than the ring.
    pub const CURSOR_DOT: SpringConfig = SpringConfig::new(500.0, 28.0, 0.2);
    /// Tracing beam endpoints; heavily damped.
    pub const BEAM: SpringConfig = SpringConfig::new(500.0, 90.0, 1.0);

    /// Constants from stiffness, damping and mass.
    pub const fn new(stiffness: f32, damping: f32, mass: f32) -> Self {
        Self {
            stiffness,
            damping,
            mass,
        }
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        SpringConfig::new(100.0, 10.0, 1.0)
    }
}

/// A scalar chasing its target.
#[derive(Debug, Clone, Copy)]
pub struct Spring {
    config: SpringConfig,
    value: f32,
    velocity: f32,
    target: f32,
}

impl Spring {
    /// A spring at rest at `value`.
    pub fn new(config: SpringConfig, value: f32) -> Self {
        Self {
            config,
            value,
            velocity: 0.0,
            target: value,
        }
    }

    #[inline]
    pub fn value(&self) -> f32 {
        self.value
    }

    #[inline]
    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Retarget without changing value or velocity.
    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Jump to `value` and stop.
    pub fn snap_to(&mut self, value: f32) {
        self.value = value;
        self.target = value;
        self.velocity = 0.0;
    }

    /// Close enough to the target and slow enough to snap.
    pub fn is_settled(&self) -> bool {
        (self.value - self.target).abs() < REST_DELTA && self.velocity.abs() < REST_SPEED
    }

    /// Advance by `dt` seconds and return the new value.
    pub fn update(&mut self, dt: f32) -> f32 {
        if dt <= 0.0 || self.is_settled() {
            if self.is_settled() {
                self.value = self.target;
                self.velocity = 0.0;
            }
            return self.value;
        }

        let dt = dt.min(MAX_FRAME_DELTA);
        let mass = self.config.mass.max(f32::EPSILON);
        let steps = (dt / MAX_SUBSTEP).ceil().max(1.0) as u32;
        let h = dt / steps as f32;
        for _ in 0..steps {
            let force = -self.config.stiffness * (self.value - self.target) - self.config.damping * self.velocity;
            self.velocity += force / mass * h;
            self.value += self.velocity * h;
        }
        self.value
    }
}

/// Two springs chasing a 2D target.
#[derive(Debug, Clone, Copy)]
pub struct Follower {
    x: Spring,
    y: Spring,
}

impl Follower {
    /// A follower at rest at `position`.
    pub fn new(config: SpringConfig, position: Vec2) -> Self {
        Self {
            x: Spring::new(config, position.x),
            y: Spring::new(config, position.y),
        }
    }

    /// Current smoothed position.
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x.value(), self.y.value())
    }

    /// Retarget both axes.
    pub fn set_target(&mut self, target: Vec2) {
        self.x.set_target(target.x);
        self.y.set_target(target.y);
    }

    /// Jump to `position` and stop.
    pub fn snap_to(&mut self, position: Vec2) {
        self.x.snap_to(position.x);
        self.y.snap_to(position.y);
    }

    pub fn is_settled(&self) -> bool {
        self.x.is_settled() && self.y.is_settled()
    }

    /// Advance by `dt` seconds and return the new position.
    pub fn update(&mut self, dt: f32) -> Vec2 {
        Vec2::new(self.x.update(dt), self.y.update(dt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spring_converges() {
        let mut spring = Spring::new(SpringConfig::CURSOR_RING, 0.0);
        spring.set_target(100.0);
        for _ in 0..120 {
            spring.update(1.0 / 60.0);
        }
        assert!(spring.is_settled());
        assert_eq!(spring.value(), 100.0);
    }

    #[test]
    fn test_spring_moves_toward_target() {
        let mut spring = Spring::new(SpringConfig::BEAM, 0.0);
        spring.set_target(10.0);
        let v = spring.update(1.0 / 60.0);
        assert!(v > 0.0 && v < 10.0);
    }

    #[test]
    fn test_large_step_stays_stable() {
        let mut spring = Spring::new(SpringConfig::CURSOR_DOT, 0.0);
        spring.set_target(1.0);
        let v = spring.update(0.5);
        assert!(v.is_finite());
        assert!((v - 1.0).abs() < 0.5);
    }

    #[test]
    fn test_huge_dt_is_capped() {
        let mut capped = Spring::new(SpringConfig::CURSOR_RING, 0.0);
        capped.set_target(50.0);
        let mut reference = capped;

        let v = capped.update(1.0e9);
        assert!(v.is_finite());
        assert_eq!(v, reference.update(MAX_FRAME_DELTA));
    }

    #[test]
    fn test_zero_dt_is_noop() {
        let mut spring = Spring::new(SpringConfig::default(), 3.0);
        spring.set_target(5.0);
        assert_eq!(spring.update(0.0), 3.0);
    }

    #[test]
    fn test_follower() {
        let mut follower = Follower::new(SpringConfig::CURSOR_RING, Vec2::splat(-100.0));
        follower.set_target(Vec2::new(200.0, 300.0));
        for _ in 0..180 {
            follower.update(1.0 / 60.0);
        }
        assert!(follower.is_settled());
        assert_eq!(follower.position(), Vec2::new(200.0, 300.0));
    }
}
