//! Field configuration.
//!
//! Every setting has a default, so a config file only needs the keys it
//! changes:
//!
//! ```json
//! { "particle_count": 80, "color": "#a855f7", "interactive": false }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::color::Rgb;
use crate::error::ConfigError;

/// Default interaction radius around the pointer, in surface units.
pub const DEFAULT_INTERACTION_RADIUS: f32 = 100.0;
/// Default maximum distance for a connecting line.
pub const DEFAULT_CONNECTION_DISTANCE: f32 = 150.0;
/// Default opacity of a line between two coincident particles.
pub const DEFAULT_LINE_OPACITY: f32 = 0.3;
/// Default stroke width of connecting lines.
pub const DEFAULT_LINE_WIDTH: f32 = 0.5;

/// How connecting-line pairs are found during render.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionStrategy {
    /// Compare every particle with every other particle. Quadratic, fine for
    /// tens of particles.
    #[default]
    Exhaustive,
    /// Bucket particles into a uniform grid with cells as wide as the
    /// connection distance. Use this for counts in the thousands.
    Grid,
}

/// Configuration of one particle field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Number of particles, fixed between reinitializations.
    pub particle_count: u32,
    /// Shared particle and line color.
    pub color: Rgb,
    /// Radii are drawn from `[0.5, max_radius + 0.5)`.
    pub max_radius: f32,
    /// Velocity components are drawn from `[-speed / 2, speed / 2)`.
    pub speed: f32,
    /// Pointer-coupled and host-driven when true; autonomous when false.
    pub interactive: bool,
    /// Pointer repulsion reaches this far.
    pub interaction_radius: f32,
    /// Pairs closer than this are joined by a line.
    pub connection_distance: f32,
    /// Line opacity at zero distance, fading to 0 at `connection_distance`.
    pub line_opacity: f32,
    /// Stroke width of connecting lines.
    pub line_width: f32,
    /// Optional cap on particle speed after pointer repulsion.
    pub max_velocity: Option<f32>,
    /// How connecting pairs are searched.
    pub connections: ConnectionStrategy,
    /// RNG seed for reproducible layouts. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            particle_count: 50,
            color: Rgb::BLUE,
            max_radius: 2.0,
            speed: 0.5,
            interactive: true,
            interaction_radius: DEFAULT_INTERACTION_RADIUS,
            connection_distance: DEFAULT_CONNECTION_DISTANCE,
            line_opacity: DEFAULT_LINE_OPACITY,
            line_width: DEFAULT_LINE_WIDTH,
            max_velocity: None,
            connections: ConnectionStrategy::Exhaustive,
            seed: None,
        }
    }
}

impl FieldConfig {
    /// Same as [`FieldConfig::default`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of particles.
    pub fn with_particle_count(mut self, count: u32) -> Self {
        self.particle_count = count;
        self
    }

    /// Set the particle and line color.
    pub fn with_color(mut self, color: Rgb) -> Self {
        self.color = color;
        self
    }

    /// Set the color from a `#rgb` / `#rrggbb` string.
    pub fn with_hex_color(mut self, hex: &str) -> Result<Self, ConfigError> {
        self.color = Rgb::from_hex(hex)?;
        Ok(self)
    }

    /// Set the upper bound of the random radius range.
    pub fn with_max_radius(mut self, radius: f32) -> Self {
        self.max_radius = radius;
        self
    }

    /// Set the spread of initial velocity components.
    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    /// Choose pointer-coupled (host-driven) or autonomous mode.
    pub fn with_interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    /// Set the pointer repulsion radius.
    pub fn with_interaction_radius(mut self, radius: f32) -> Self {
        self.interaction_radius = radius;
        self
    }

    /// Set the maximum distance for a connecting line.
    pub fn with_connection_distance(mut self, distance: f32) -> Self {
        self.connection_distance = distance;
        self
    }

    /// Set line opacity (at zero distance) and stroke width.
    pub fn with_line_style(mut self, opacity: f32, width: f32) -> Self {
        self.line_opacity = opacity;
        self.line_width = width;
        self
    }

    /// Clamp particle speed to `max` after each step. Negative caps are
    /// raised to 0.
    ///
    /// Off by default: repeated pointer pushes then accumulate without bound.
    pub fn with_max_velocity(mut self, max: f32) -> Self {
        self.max_velocity = Some(max.max(0.0));
        self
    }

    /// Set the pair search strategy.
    pub fn with_connections(mut self, strategy: ConnectionStrategy) -> Self {
        self.connections = strategy;
        self
    }

    /// Seed the RNG for a reproducible layout.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check that every numeric setting is finite and in range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn non_negative(field: &'static str, v: f32) -> Result<(), ConfigError> {
            if !v.is_finite() || v < 0.0 {
                return Err(ConfigError::InvalidValue {
                    field,
                    reason: format!("expected a finite value >= 0, got {}", v),
                });
            }
            Ok(())
        }

        non_negative("max_radius", self.max_radius)?;
        non_negative("speed", self.speed)?;
        non_negative("interaction_radius", self.interaction_radius)?;
        non_negative("line_width", self.line_width)?;
        if let Some(max) = self.max_velocity {
            non_negative("max_velocity", max)?;
        }

        if !self.connection_distance.is_finite() || self.connection_distance <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "connection_distance",
                reason: format!("expected a finite value > 0, got {}", self.connection_distance),
            });
        }
        if !(0.0..=1.0).contains(&self.line_opacity) {
            return Err(ConfigError::InvalidValue {
                field: "line_opacity",
                reason: format!("expected 0.0..=1.0, got {}", self.line_opacity),
            });
        }
        Ok(())
    }

    /// Save the configuration to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load and validate a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Parse and validate a configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: FieldConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FieldConfig::default();
        assert_eq!(config.particle_count, 50);
        assert_eq!(config.color, Rgb::BLUE);
        assert!((config.max_radius - 2.0).abs() < 0.001);
        assert!((config.speed - 0.5).abs() < 0.001);
        assert!(config.interactive);
        assert_eq!(config.connections, ConnectionStrategy::Exhaustive);
        assert!(config.max_velocity.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = FieldConfig::new()
            .with_particle_count(10)
            .with_speed(1.0)
            .with_interactive(false)
            .with_max_velocity(3.0)
            .with_seed(7)
            .with_hex_color("#fff")
            .unwrap();

        assert_eq!(config.particle_count, 10);
        assert!(!config.interactive);
        assert_eq!(config.max_velocity, Some(3.0));
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.color, Rgb::WHITE);
    }

    #[test]
    fn test_negative_max_velocity_raised_to_zero() {
        let config = FieldConfig::new().with_max_velocity(-0.01);
        assert_eq!(config.max_velocity, Some(0.0));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = FieldConfig::from_json(r##"{ "particle_count": 80, "color": "#a855f7" }"##).unwrap();
        assert_eq!(config.particle_count, 80);
        assert_eq!(config.color, Rgb::new(0xa8, 0x55, 0xf7));
        assert!(config.interactive);
        assert!((config.connection_distance - DEFAULT_CONNECTION_DISTANCE).abs() < 0.001);
    }

    #[test]
    fn test_strategy_json_name() {
        let config = FieldConfig::from_json(r#"{ "connections": "grid" }"#).unwrap();
        assert_eq!(config.connections, ConnectionStrategy::Grid);
    }

    #[test]
    fn test_invalid_json_color() {
        let err = FieldConfig::from_json(r#"{ "color": "nope" }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = FieldConfig::new().with_speed(f32::NAN);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field: "speed", .. })
        ));

        let config = FieldConfig::new().with_connection_distance(0.0);
        assert!(config.validate().is_err());

        let config = FieldConfig::new().with_line_style(1.5, 0.5);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("driftfield-config-{}.json", std::process::id()));
        let config = FieldConfig::new().with_particle_count(12).with_seed(99);
        config.save(&path).unwrap();

        let loaded = FieldConfig::load(&path).unwrap();
        assert_eq!(loaded, config);

        let _ = std::fs::remove_file(&path);
    }
}
