//! Pointer parallax.

use glam::Vec2;

use super::Rect;

/// Pixels of travel per unit of `strength`.
const STRENGTH_SCALE: f32 = 0.3;
/// Pixels of travel per unit of layer depth.
const LAYER_TRAVEL: f32 = 20.0;

/// Which way content drifts as the pointer moves down or right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParallaxDirection {
    #[default]
    Up,
    Down,
    Left,
    Right,
}

/// A section whose content shifts with the pointer along one axis.
#[derive(Debug, Clone)]
pub struct ParallaxSection {
    /// Maximum travel in pixels.
    travel: f32,
    direction: ParallaxDirection,
    disabled: bool,
    in_view: bool,
    offset: Vec2,
}

impl ParallaxSection {
    /// `strength` runs from 0 to 100 and is clamped; 100 means 30px travel.
    pub fn new(strength: f32, direction: ParallaxDirection) -> Self {
        Self {
            travel: strength.clamp(0.0, 100.0) * STRENGTH_SCALE,
            direction,
            disabled: false,
            in_view: false,
            offset: Vec2::ZERO,
        }
    }

    /// A section that never moves.
    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    /// Maximum offset in pixels.
    pub fn travel(&self) -> f32 {
        self.travel
    }

    /// Visibility changed; out-of-view sections ignore the pointer.
    pub fn set_in_view(&mut self, in_view: bool) {
        self.in_view = in_view;
    }

    /// Recompute the offset for a pointer at `pointer` over a section at
    /// `rect`. Returns the current offset.
    pub fn pointer_moved(&mut self, pointer: Vec2, rect: Rect) -> Vec2 {
        if self.disabled || !self.in_view || rect.width == 0.0 || rect.height == 0.0 {
            return self.offset();
        }

        let center = rect.center();
        let rel = Vec2::new(
            (pointer.x - center.x) / (rect.width / 2.0),
            (pointer.y - center.y) / (rect.height / 2.0),
        );

        self.offset = match self.direction {
            ParallaxDirection::Up => Vec2::new(0.0, rel.y * self.travel),
            ParallaxDirection::Down => Vec2::new(0.0, -rel.y * self.travel),
            ParallaxDirection::Left => Vec2::new(rel.x * self.travel, 0.0),
            ParallaxDirection::Right => Vec2::new(-rel.x * self.travel, 0.0),
        };
        self.offset
    }

    /// Current translation; always zero when disabled.
    pub fn offset(&self) -> Vec2 {
        if self.disabled {
            Vec2::ZERO
        } else {
            self.offset
        }
    }
}

/// Translation of a background layer at `depth` for a pointer over `rect`.
///
/// Deeper layers move further, opposite to the pointer.
pub fn layer_offset(pointer: Vec2, rect: Rect, depth: f32) -> Vec2 {
    (rect.normalized(pointer) - Vec2::splat(0.5)) * depth * -LAYER_TRAVEL
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect() -> Rect {
        Rect::new(0.0, 0.0, 400.0, 200.0)
    }

    #[test]
    fn test_strength_clamped() {
        assert!((ParallaxSection::new(250.0, ParallaxDirection::Up).travel() - 30.0).abs() < 1e-4);
        assert_eq!(ParallaxSection::new(-5.0, ParallaxDirection::Up).travel(), 0.0);
    }

    #[test]
    fn test_vertical_offsets() {
        let mut up = ParallaxSection::new(20.0, ParallaxDirection::Up);
        up.set_in_view(true);
        let offset = up.pointer_moved(Vec2::new(200.0, 200.0), rect());
        assert!(offset.x.abs() < 1e-6);
        assert!((offset.y - 6.0).abs() < 1e-4);

        let mut down = ParallaxSection::new(20.0, ParallaxDirection::Down);
        down.set_in_view(true);
        let offset = down.pointer_moved(Vec2::new(200.0, 200.0), rect());
        assert!((offset.y + 6.0).abs() < 1e-4);
    }

    #[test]
    fn test_horizontal_offsets() {
        let mut right = ParallaxSection::new(100.0, ParallaxDirection::Right);
        right.set_in_view(true);
        let offset = right.pointer_moved(Vec2::new(400.0, 100.0), rect());
        assert!((offset.x + 30.0).abs() < 1e-4);
        assert_eq!(offset.y, 0.0);
    }

    #[test]
    fn test_out_of_view_keeps_offset() {
        let mut section = ParallaxSection::new(50.0, ParallaxDirection::Up);
        assert_eq!(section.pointer_moved(Vec2::new(0.0, 0.0), rect()), Vec2::ZERO);
    }

    #[test]
    fn test_disabled() {
        let mut section = ParallaxSection::new(50.0, ParallaxDirection::Up).disabled();
        section.set_in_view(true);
        assert_eq!(section.pointer_moved(Vec2::new(0.0, 0.0), rect()), Vec2::ZERO);
    }

    #[test]
    fn test_layer_offset() {
        let offset = layer_offset(Vec2::new(400.0, 200.0), rect(), 2.0);
        assert_eq!(offset, Vec2::new(-20.0, -20.0));
        assert_eq!(layer_offset(Vec2::new(200.0, 100.0), rect(), 3.0), Vec2::ZERO);
    }
}
