//! Scroll-linked tracing beam.
//!
//! A vertical beam whose two endpoints follow scroll progress through a
//! section. The head (`y1`) finishes its travel at 80% progress, the tail
//! (`y2`) at 100%, so the beam stretches and then closes as the reader
//! scrolls. Both endpoints are spring-smoothed.

use super::interpolate;
use super::spring::{Spring, SpringConfig};

/// Endpoints stay this far from the beam's ends.
const END_INSET: f32 = 50.0;

/// Scroll offset after which the scroll-to-top button shows.
pub const SCROLL_TOP_THRESHOLD: f32 = 300.0;

/// Progress through a section, 0 when its top reaches the viewport top and 1
/// when its bottom reaches the viewport bottom.
pub fn scroll_progress(scroll_y: f32, section_top: f32, section_height: f32, viewport_height: f32) -> f32 {
    let start = section_top;
    let end = section_top + section_height - viewport_height;
    if end <= start {
        return if scroll_y >= start { 1.0 } else { 0.0 };
    }
    ((scroll_y - start) / (end - start)).clamp(0.0, 1.0)
}

/// A vertical beam whose ends trail scroll progress on springs.
#[derive(Debug, Clone)]
pub struct ScrollBeam {
    height: f32,
    progress: f32,
    scroll_y: f32,
    head: Spring,
    tail: Spring,
}

impl ScrollBeam {
    /// A beam `height` units tall at zero progress.
    pub fn new(height: f32) -> Self {
        Self {
            height,
            progress: 0.0,
            scroll_y: 0.0,
            head: Spring::new(SpringConfig::BEAM, END_INSET),
            tail: Spring::new(SpringConfig::BEAM, END_INSET),
        }
    }

    /// Content height changed (e.g. on window resize).
    pub fn set_height(&mut self, height: f32) {
        self.height = height;
        self.retarget();
    }

    /// Record the page scroll offset and the progress through the section.
    pub fn set_scroll(&mut self, scroll_y: f32, progress: f32) {
        self.scroll_y = scroll_y;
        self.progress = progress.clamp(0.0, 1.0);
        self.retarget();
    }

    fn retarget(&mut self) {
        let range = (END_INSET, self.height - END_INSET);
        self.head.set_target(interpolate(self.progress, (0.0, 0.8), range));
        self.tail.set_target(interpolate(self.progress, (0.0, 1.0), range));
    }

    /// Advance both endpoint springs by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        self.head.update(dt);
        self.tail.update(dt);
    }

    /// Current `(y1, y2)`.
    pub fn endpoints(&self) -> (f32, f32) {
        (self.head.value(), self.tail.value())
    }

    /// Where the endpoints are heading.
    pub fn targets(&self) -> (f32, f32) {
        (self.head.target(), self.tail.target())
    }

    /// Whether the scroll-to-top button should show.
    pub fn show_scroll_top(&self) -> bool {
        self.scroll_y > SCROLL_TOP_THRESHOLD
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress() {
        assert_eq!(scroll_progress(0.0, 0.0, 2000.0, 1000.0), 0.0);
        assert_eq!(scroll_progress(500.0, 0.0, 2000.0, 1000.0), 0.5);
        assert_eq!(scroll_progress(5000.0, 0.0, 2000.0, 1000.0), 1.0);
        // Section shorter than the viewport.
        assert_eq!(scroll_progress(10.0, 0.0, 500.0, 1000.0), 1.0);
    }

    #[test]
    fn test_targets() {
        let mut beam = ScrollBeam::new(1000.0);
        beam.set_scroll(400.0, 0.4);
        let (head, tail) = beam.targets();
        assert!((head - 500.0).abs() < 1e-3);
        assert!((tail - 410.0).abs() < 1e-3);

        beam.set_scroll(900.0, 0.9);
        let (head, _) = beam.targets();
        assert!((head - 950.0).abs() < 1e-3);
    }

    #[test]
    fn test_endpoints_settle() {
        let mut beam = ScrollBeam::new(1000.0);
        beam.set_scroll(2000.0, 1.0);
        for _ in 0..600 {
            beam.update(1.0 / 60.0);
        }
        let (head, tail) = beam.endpoints();
        assert!((head - 950.0).abs() < 0.1);
        assert!((tail - 950.0).abs() < 0.1);
    }

    #[test]
    fn test_scroll_top_button() {
        let mut beam = ScrollBeam::new(1000.0);
        beam.set_scroll(100.0, 0.1);
        assert!(!beam.show_scroll_top());
        beam.set_scroll(301.0, 0.2);
        assert!(beam.show_scroll_top());
    }
}
