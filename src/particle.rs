//! Particle records and how they are spawned.

use glam::Vec2;
use rand::Rng;

use crate::config::FieldConfig;

/// One ambient particle.
///
/// Color is shared by the whole field and lives in its [`FieldConfig`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    /// Position in surface units, kept in `[0, width) × [0, height)`.
    pub position: Vec2,
    /// Displacement per frame.
    pub velocity: Vec2,
    pub radius: f32,
    /// Fixed at creation, in `[0.1, 0.6)`.
    pub opacity: f32,
}

impl Particle {
    pub fn new(position: Vec2, velocity: Vec2, radius: f32, opacity: f32) -> Self {
        Self {
            position,
            velocity,
            radius,
            opacity,
        }
    }

    /// Spawn a particle uniformly over a `width × height` surface.
    ///
    /// Uses `unit * extent` rather than `gen_range` so a zero-sized surface
    /// collapses every particle to the origin instead of panicking.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, width: f32, height: f32, config: &FieldConfig) -> Self {
        let position = Vec2::new(
            wrap_coordinate(rng.gen::<f32>() * width, width),
            wrap_coordinate(rng.gen::<f32>() * height, height),
        );
        let velocity = Vec2::new(
            (rng.gen::<f32>() - 0.5) * config.speed,
            (rng.gen::<f32>() - 0.5) * config.speed,
        );
        let radius = rng.gen::<f32>() * config.max_radius + 0.5;
        let opacity = rng.gen::<f32>() * 0.5 + 0.1;

        Self {
            position,
            velocity,
            radius,
            opacity,
        }
    }
}

/// Wrap `value` into `[0, extent)`, carrying the overflow across the edge.
///
/// A zero (or negative) extent pins the coordinate to 0.
#[inline]
pub fn wrap_coordinate(value: f32, extent: f32) -> f32 {
    if extent <= 0.0 {
        return 0.0;
    }
    let wrapped = value.rem_euclid(extent);
    // rem_euclid can round up to `extent` for tiny negative inputs.
    if wrapped >= extent {
        0.0
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_random_ranges() {
        let config = FieldConfig::default();
        let mut rng = SmallRng::seed_from_u64(1);
        for _ in 0..500 {
            let p = Particle::random(&mut rng, 800.0, 600.0, &config);
            assert!(p.position.x >= 0.0 && p.position.x < 800.0);
            assert!(p.position.y >= 0.0 && p.position.y < 600.0);
            assert!(p.velocity.x >= -0.25 && p.velocity.x < 0.25);
            assert!(p.velocity.y >= -0.25 && p.velocity.y < 0.25);
            assert!(p.radius >= 0.5 && p.radius < 2.5);
            assert!(p.opacity >= 0.1 && p.opacity < 0.6);
        }
    }

    #[test]
    fn test_random_on_empty_surface() {
        let config = FieldConfig::default();
        let mut rng = SmallRng::seed_from_u64(2);
        let p = Particle::random(&mut rng, 0.0, 0.0, &config);
        assert_eq!(p.position, Vec2::ZERO);
    }

    #[test]
    fn test_wrap_overflow() {
        assert!((wrap_coordinate(801.0, 800.0) - 1.0).abs() < 1e-4);
        assert!((wrap_coordinate(-1.0, 800.0) - 799.0).abs() < 1e-4);
        assert_eq!(wrap_coordinate(800.0, 800.0), 0.0);
        assert_eq!(wrap_coordinate(400.0, 800.0), 400.0);
    }

    #[test]
    fn test_wrap_tiny_negative_stays_in_range() {
        let w = wrap_coordinate(-1e-9, 800.0);
        assert!((0.0..800.0).contains(&w));
    }

    #[test]
    fn test_wrap_zero_extent() {
        assert_eq!(wrap_coordinate(5.0, 0.0), 0.0);
    }
}
