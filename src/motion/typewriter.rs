//! Typewriter text reveal.

use std::time::Duration;

/// Reveals `text` one character at a time after an initial delay.
#[derive(Debug, Clone)]
pub struct Typewriter {
    text: String,
    /// Byte offset after each character, so `visible` slices on char
    /// boundaries.
    boundaries: Vec<usize>,
    delay: Duration,
    speed: Duration,
    elapsed: Duration,
    revealed: usize,
    completion_reported: bool,
}

impl Typewriter {
    /// Default: no delay, one character every 50ms.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let boundaries = text.char_indices().map(|(i, c)| i + c.len_utf8()).collect();
        Self {
            text,
            boundaries,
            delay: Duration::ZERO,
            speed: Duration::from_millis(50),
            elapsed: Duration::ZERO,
            revealed: 0,
            completion_reported: false,
        }
    }

    /// Wait `delay` before the first character.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Time per character. Zero reveals everything at once.
    pub fn with_speed(mut self, speed: Duration) -> Self {
        self.speed = speed;
        self
    }

    /// Whether the initial delay has passed.
    pub fn has_started(&self) -> bool {
        self.elapsed >= self.delay
    }

    /// Whether every character is visible.
    pub fn is_complete(&self) -> bool {
        self.has_started() && self.revealed == self.boundaries.len()
    }

    /// The revealed prefix.
    pub fn visible(&self) -> &str {
        match self.revealed {
            0 => "",
            n => &self.text[..self.boundaries[n - 1]],
        }
    }

    /// Advance the clock. Returns true exactly once, on the call that
    /// finishes the text.
    pub fn advance(&mut self, dt: Duration) -> bool {
        self.elapsed += dt;

        if self.has_started() {
            let typing = self.elapsed - self.delay;
            let due = if self.speed.is_zero() {
                self.boundaries.len()
            } else {
                usize::try_from(typing.as_nanos() / self.speed.as_nanos()).unwrap_or(usize::MAX)
            };
            self.revealed = due.min(self.boundaries.len());
        }

        if self.is_complete() && !self.completion_reported {
            self.completion_reported = true;
            return true;
        }
        false
    }

    /// Start over from an empty reveal.
    pub fn restart(&mut self) {
        self.elapsed = Duration::ZERO;
        self.revealed = 0;
        self.completion_reported = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn test_reveals_in_order() {
        let mut tw = Typewriter::new("hello");
        assert_eq!(tw.visible(), "");

        tw.advance(MS * 50);
        assert_eq!(tw.visible(), "h");
        tw.advance(MS * 100);
        assert_eq!(tw.visible(), "hel");
        assert!(!tw.is_complete());
    }

    #[test]
    fn test_delay() {
        let mut tw = Typewriter::new("abc").with_delay(MS * 200).with_speed(MS * 10);
        tw.advance(MS * 150);
        assert!(!tw.has_started());
        assert_eq!(tw.visible(), "");

        tw.advance(MS * 70);
        assert!(tw.has_started());
        assert_eq!(tw.visible(), "ab");
    }

    #[test]
    fn test_completes_once() {
        let mut tw = Typewriter::new("hi").with_speed(MS * 10);
        assert!(!tw.advance(MS * 10));
        assert!(tw.advance(MS * 10));
        assert!(!tw.advance(MS * 10));
        assert_eq!(tw.visible(), "hi");
    }

    #[test]
    fn test_empty_text_completes_on_start() {
        let mut tw = Typewriter::new("").with_delay(MS * 5);
        assert!(!tw.advance(MS * 1));
        assert!(tw.advance(MS * 5));
    }

    #[test]
    fn test_huge_delta_reveals_everything() {
        let mut tw = Typewriter::new("overflow").with_speed(Duration::from_nanos(1));
        assert!(tw.advance(Duration::from_secs(u64::MAX / 2)));
        assert_eq!(tw.visible(), "overflow");
    }

    #[test]
    fn test_multibyte() {
        let mut tw = Typewriter::new("héllo").with_speed(MS * 10);
        tw.advance(MS * 20);
        assert_eq!(tw.visible(), "hé");
    }

    #[test]
    fn test_restart() {
        let mut tw = Typewriter::new("ab").with_speed(MS * 10);
        tw.advance(MS * 100);
        tw.restart();
        assert_eq!(tw.visible(), "");
        assert!(tw.advance(MS * 20));
    }
}
