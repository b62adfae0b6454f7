//! Colors shared by the field, its surfaces, and its config.
//!
//! Colors are stored as 8-bit RGB, which is what the hex strings in
//! configuration files carry. Drawing calls take an [`Rgba`] with a
//! floating-point alpha so per-particle opacity survives until the surface
//! decides how to quantize it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ConfigError;

/// An 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    /// Default particle color (`#3b82f6`).
    pub const BLUE: Rgb = Rgb::new(0x3b, 0x82, 0xf6);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rgb` or `#rrggbb` (the leading `#` is optional).
    pub fn from_hex(s: &str) -> Result<Self, ConfigError> {
        let digits = s.trim().trim_start_matches('#');
        let invalid = || ConfigError::InvalidColor(s.to_string());

        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        match digits.len() {
            3 => {
                let mut channels = [0u8; 3];
                for (i, c) in digits.chars().enumerate() {
                    let v = c.to_digit(16).ok_or_else(invalid)? as u8;
                    channels[i] = v * 17;
                }
                Ok(Rgb::new(channels[0], channels[1], channels[2]))
            }
            6 => {
                let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| invalid());
                Ok(Rgb::new(channel(0)?, channel(2)?, channel(4)?))
            }
            _ => Err(invalid()),
        }
    }

    /// Lowercase `#rrggbb`.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Attach an opacity, clamped to `0.0..=1.0`.
    pub fn with_alpha(self, alpha: f32) -> Rgba {
        Rgba {
            rgb: self,
            alpha: alpha.clamp(0.0, 1.0),
        }
    }

    /// Channels as linear-ish floats in `0.0..=1.0` (no gamma conversion).
    pub fn to_f32_array(&self) -> [f32; 3] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        ]
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Rgb::BLUE
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Rgb {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rgb::from_hex(s)
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Rgb::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// A color with floating-point opacity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub rgb: Rgb,
    pub alpha: f32,
}

impl Rgba {
    /// Alpha quantized the way a CSS `#rrggbbaa` string carries it
    /// (truncated, not rounded).
    pub fn alpha_u8(&self) -> u8 {
        (self.alpha * 255.0).floor() as u8
    }

    /// CSS-style `#rrggbbaa`.
    pub fn to_hex(&self) -> String {
        format!("{}{:02x}", self.rgb.to_hex(), self.alpha_u8())
    }

    /// Channels plus alpha as floats, the layout GPU instances use.
    pub fn to_f32_array(&self) -> [f32; 4] {
        let [r, g, b] = self.rgb.to_f32_array();
        [r, g, b, self.alpha]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_long_hex() {
        let c = Rgb::from_hex("#3b82f6").unwrap();
        assert_eq!(c, Rgb::BLUE);
        assert_eq!(c.to_hex(), "#3b82f6");
    }

    #[test]
    fn test_parse_short_hex() {
        let c: Rgb = "#abc".parse().unwrap();
        assert_eq!(c, Rgb::new(0xaa, 0xbb, 0xcc));
    }

    #[test]
    fn test_parse_without_hash() {
        assert_eq!(Rgb::from_hex("ffffff").unwrap(), Rgb::WHITE);
    }

    #[test]
    fn test_reject_invalid_hex() {
        assert!(Rgb::from_hex("#12345").is_err());
        assert!(Rgb::from_hex("#gg0000").is_err());
        assert!(Rgb::from_hex("").is_err());
        assert!(Rgb::from_hex("#ffé").is_err());
    }

    #[test]
    fn test_alpha_hex_truncates() {
        // 0.3 * 255 = 76.5 -> 76 -> 0x4c
        let c = Rgb::BLUE.with_alpha(0.3);
        assert_eq!(c.alpha_u8(), 76);
        assert_eq!(c.to_hex(), "#3b82f64c");
    }

    #[test]
    fn test_alpha_clamped() {
        assert_eq!(Rgb::WHITE.with_alpha(2.0).alpha, 1.0);
        assert_eq!(Rgb::WHITE.with_alpha(-1.0).alpha, 0.0);
    }

    #[test]
    fn test_serde_as_hex_string() {
        let json = serde_json::to_string(&Rgb::BLUE).unwrap();
        assert_eq!(json, "\"#3b82f6\"");
        let back: Rgb = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Rgb::BLUE);
        assert!(serde_json::from_str::<Rgb>("\"blue\"").is_err());
    }
}
