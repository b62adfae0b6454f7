//! Scroll spy for a navigation header.

use super::Rect;

/// Scroll offset past which the header counts as scrolled.
pub const SCROLLED_THRESHOLD: f32 = 10.0;
/// Viewport line, in pixels from the top, that picks the active section.
pub const ACTIVE_LINE: f32 = 200.0;

/// Tracks whether the page has scrolled and which section is active.
#[derive(Debug, Clone)]
pub struct ScrollSpy {
    active: String,
    scrolled: bool,
}

impl ScrollSpy {
    /// A spy with `initial` active and the page at the top.
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            active: initial.into(),
            scrolled: false,
        }
    }

    /// Id of the active section.
    pub fn active(&self) -> &str {
        &self.active
    }

    /// Whether the page is scrolled past [`SCROLLED_THRESHOLD`].
    pub fn is_scrolled(&self) -> bool {
        self.scrolled
    }

    /// Update from the scroll offset and the sections' viewport boxes, in
    /// page order. The first section straddling [`ACTIVE_LINE`] becomes
    /// active; if none does, the previous one stays. Returns true if the
    /// active section changed.
    pub fn update(&mut self, scroll_y: f32, sections: &[(&str, Rect)]) -> bool {
        self.scrolled = scroll_y > SCROLLED_THRESHOLD;

        let hit = sections
            .iter()
            .find(|(_, rect)| rect.top <= ACTIVE_LINE && rect.bottom() >= ACTIVE_LINE);
        match hit {
            Some((id, _)) if *id != self.active => {
                self.active = (*id).to_string();
                true
            }
            _ => false,
        }
    }
}
