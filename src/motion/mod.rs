//! Pointer- and scroll-driven motion helpers.
//!
//! Small numeric models behind the page's other decorative effects:
//!
//! | Effect | Type |
//! |--------|------|
//! | Spring-smoothed values and 2D followers | [`Spring`], [`Follower`] |
//! | Custom cursor ring and dot | [`CursorFollower`] |
//! | Scroll-linked tracing beam | [`ScrollBeam`] |
//! | Pointer parallax sections and layers | [`ParallaxSection`], [`layer_offset`] |
//! | Header scroll state and active section | [`ScrollSpy`] |
//! | Typewriter text reveal | [`Typewriter`] |
//!
//! All of them are advanced explicitly with a frame delta; none of them
//! schedule work on their own.

mod beam;
mod cursor;
mod parallax;
mod spring;
mod spy;
mod typewriter;

pub use beam::{scroll_progress, ScrollBeam, SCROLL_TOP_THRESHOLD};
pub use cursor::{CursorFollower, MIN_CURSOR_VIEWPORT_WIDTH};
pub use parallax::{layer_offset, ParallaxDirection, ParallaxSection};
pub use spring::{Follower, Spring, SpringConfig};
pub use spy::{ScrollSpy, ACTIVE_LINE, SCROLLED_THRESHOLD};
pub use typewriter::Typewriter;

use glam::Vec2;

/// An axis-aligned box in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// A box with its top-left corner at `(left, top)`.
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Bottom edge, `top + height`.
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    /// Pointer position relative to the box, `(0, 0)` at the top-left and
    /// `(1, 1)` at the bottom-right. Zero-sized boxes map to the origin.
    pub fn normalized(&self, pointer: Vec2) -> Vec2 {
        let x = if self.width != 0.0 { (pointer.x - self.left) / self.width } else { 0.0 };
        let y = if self.height != 0.0 { (pointer.y - self.top) / self.height } else { 0.0 };
        Vec2::new(x, y)
    }
}

/// Map `value` from `input` range to `output` range, clamped to the output.
pub fn interpolate(value: f32, input: (f32, f32), output: (f32, f32)) -> f32 {
    let span = input.1 - input.0;
    if span == 0.0 {
        return output.0;
    }
    let t = ((value - input.0) / span).clamp(0.0, 1.0);
    output.0 + (output.1 - output.0) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_normalized() {
        let rect = Rect::new(100.0, 50.0, 200.0, 100.0);
        assert_eq!(rect.normalized(Vec2::new(200.0, 100.0)), Vec2::new(0.5, 0.5));
        assert_eq!(rect.center(), Vec2::new(200.0, 100.0));
        assert_eq!(Rect::new(0.0, 0.0, 0.0, 0.0).normalized(Vec2::ONE), Vec2::ZERO);
    }

    #[test]
    fn test_interpolate_clamps() {
        assert_eq!(interpolate(0.4, (0.0, 0.8), (50.0, 950.0)), 500.0);
        assert_eq!(interpolate(1.0, (0.0, 0.8), (50.0, 950.0)), 950.0);
        assert_eq!(interpolate(-1.0, (0.0, 1.0), (50.0, 950.0)), 50.0);
        assert_eq!(interpolate(3.0, (2.0, 2.0), (1.0, 9.0)), 1.0);
    }
}
