//! Custom cursor: a ring and a dot that chase the pointer on springs.

use glam::Vec2;

use super::spring::{Follower, SpringConfig};

/// Narrower viewports (touch devices) get no custom cursor.
pub const MIN_CURSOR_VIEWPORT_WIDTH: f32 = 768.0;

/// Where the cursor parks before the pointer has moved.
const OFFSCREEN: Vec2 = Vec2::new(-100.0, -100.0);

/// Custom cursor: a ring and a dot chasing the pointer on springs.
#[derive(Debug, Clone)]
pub struct CursorFollower {
    ring: Follower,
    dot: Follower,
    hovering: bool,
    clicking: bool,
    visible: bool,
}

impl CursorFollower {
    /// A hidden cursor parked offscreen.
    pub fn new() -> Self {
        Self {
            ring: Follower::new(SpringConfig::CURSOR_RING, OFFSCREEN),
            dot: Follower::new(SpringConfig::CURSOR_DOT, OFFSCREEN),
            hovering: false,
            clicking: false,
            visible: false,
        }
    }

    /// Pointer moved to `position`; `over_clickable` is whether it is over a
    /// link or button.
    pub fn pointer_moved(&mut self, position: Vec2, over_clickable: bool) {
        self.ring.set_target(position);
        self.dot.set_target(position);
        self.hovering = over_clickable;
        self.visible = true;
    }

    /// Pointer left the window; hides the cursor.
    pub fn pointer_left(&mut self) {
        self.visible = false;
    }

    /// Mouse button went down or up.
    pub fn set_pressed(&mut self, pressed: bool) {
        self.clicking = pressed;
    }

    /// Advance the ring and dot springs by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        self.ring.update(dt);
        self.dot.update(dt);
    }

    /// Center of the outer ring.
    pub fn ring_position(&self) -> Vec2 {
        self.ring.position()
    }

    /// Center of the inner dot.
    pub fn dot_position(&self) -> Vec2 {
        self.dot.position()
    }

    /// Ring grows over clickables and shrinks while pressed.
    pub fn ring_scale(&self) -> f32 {
        if self.hovering {
            1.5
        } else if self.clicking {
            0.8
        } else {
            1.0
        }
    }

    /// Ring opacity for the current state.
    pub fn ring_opacity(&self) -> f32 {
        if self.clicking {
            0.5
        } else {
            1.0
        }
    }

    /// Dot scale; grows while clicking.
    pub fn dot_scale(&self) -> f32 {
        if self.clicking {
            4.0
        } else {
            1.0
        }
    }

    /// Whether the pointer is inside the window.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Whether a viewport of this width shows the custom cursor at all.
    pub fn enabled_for(viewport_width: f32) -> bool {
        viewport_width >= MIN_CURSOR_VIEWPORT_WIDTH
    }
}

impl Default for CursorFollower {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_hidden_offscreen() {
        let cursor = CursorFollower::new();
        assert!(!cursor.is_visible());
        assert_eq!(cursor.ring_position(), OFFSCREEN);
    }

    #[test]
    fn test_dot_leads_ring() {
        let mut cursor = CursorFollower::new();
        cursor.pointer_moved(Vec2::new(400.0, 300.0), false);
        cursor.update(1.0 / 60.0);

        let target = Vec2::new(400.0, 300.0);
        assert!(cursor.is_visible());
        assert!(cursor.dot_position().distance(target) < cursor.ring_position().distance(target));
    }

    #[test]
    fn test_scales() {
        let mut cursor = CursorFollower::new();
        assert_eq!(cursor.ring_scale(), 1.0);

        cursor.set_pressed(true);
        assert_eq!(cursor.ring_scale(), 0.8);
        assert_eq!(cursor.ring_opacity(), 0.5);
        assert_eq!(cursor.dot_scale(), 4.0);

        cursor.pointer_moved(Vec2::ZERO, true);
        assert_eq!(cursor.ring_scale(), 1.5);
    }

    #[test]
    fn test_enabled_for_viewport() {
        assert!(!CursorFollower::enabled_for(600.0));
        assert!(CursorFollower::enabled_for(1280.0));
    }
}
