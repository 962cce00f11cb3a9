//! Hero image slider.
//!
//! A timer-driven index over the hero slides. The host feeds elapsed time
//! through [`HeroSlider::tick`]; hovering pauses autoplay and choosing a dot
//! restarts the timer.

use std::time::Duration;

/// Time each slide stays on screen during autoplay.
pub const SLIDE_DURATION: Duration = Duration::from_secs(4);

/// Slider state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeroSlider {
    slide_count: usize,
    current: usize,
    playing: bool,
    elapsed: Duration,
    slide_duration: Duration,
}

impl HeroSlider {
    /// Create a slider over `slide_count` slides, autoplaying.
    ///
    /// Returns `None` when there are no slides; the page then has no slider.
    #[must_use]
    pub const fn new(slide_count: usize) -> Option<Self> {
        Self::with_duration(slide_count, SLIDE_DURATION)
    }

    /// Like [`HeroSlider::new`] with a custom slide duration.
    #[must_use]
    pub const fn with_duration(slide_count: usize, slide_duration: Duration) -> Option<Self> {
        if slide_count == 0 {
            return None;
        }
        Some(Self {
            slide_count,
            current: 0,
            playing: true,
            elapsed: Duration::ZERO,
            slide_duration,
        })
    }

    /// Index of the visible slide (also the active text and dot).
    #[must_use]
    pub const fn current(&self) -> usize {
        self.current
    }

    /// Whether autoplay is running.
    #[must_use]
    pub const fn is_playing(&self) -> bool {
        self.playing
    }

    /// Horizontal offset of the slide strip, in percent (`translateX`).
    #[must_use]
    pub fn offset_percent(&self) -> i64 {
        -i64::try_from(self.current).unwrap_or(i64::MAX) * 100
    }

    /// Whether slide `index` carries the `active` class.
    #[must_use]
    pub const fn is_active(&self, index: usize) -> bool {
        index == self.current
    }

    /// Advance to the next slide, wrapping around.
    pub const fn next(&mut self) {
        self.current = (self.current + 1) % self.slide_count;
    }

    /// Jump to a slide (dot click) and restart autoplay.
    ///
    /// Out-of-range indices are ignored.
    pub const fn go_to(&mut self, index: usize) {
        if index >= self.slide_count {
            return;
        }
        self.current = index;
        self.resume();
    }

    /// Stop autoplay (pointer entered the slider).
    pub const fn pause(&mut self) {
        self.playing = false;
        self.elapsed = Duration::ZERO;
    }

    /// Restart autoplay from a fresh interval (pointer left the slider).
    pub const fn resume(&mut self) {
        self.playing = true;
        self.elapsed = Duration::ZERO;
    }

    /// Feed elapsed time. Returns the number of slides advanced.
    pub fn tick(&mut self, dt: Duration) -> usize {
        if !self.playing || self.slide_duration.is_zero() {
            return 0;
        }

        self.elapsed += dt;
        let mut advanced = 0;
        while self.elapsed >= self.slide_duration {
            self.elapsed -= self.slide_duration;
            self.next();
            advanced += 1;
        }
        advanced
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_no_slides_no_slider() {
        assert!(HeroSlider::new(0).is_none());
    }

    #[test]
    fn test_tick_advances_and_wraps() {
        let mut slider = HeroSlider::new(3).unwrap();
        assert_eq!(slider.tick(Duration::from_secs(3)), 0);
        assert_eq!(slider.tick(Duration::from_secs(1)), 1);
        assert_eq!(slider.current(), 1);
        assert_eq!(slider.tick(Duration::from_secs(8)), 2);
        assert_eq!(slider.current(), 0);
    }

    #[test]
    fn test_pause_stops_autoplay() {
        let mut slider = HeroSlider::new(3).unwrap();
        slider.pause();
        assert_eq!(slider.tick(Duration::from_secs(60)), 0);
        slider.resume();
        assert_eq!(slider.tick(SLIDE_DURATION), 1);
    }

    #[test]
    fn test_go_to_restarts_timer() {
        let mut slider = HeroSlider::new(3).unwrap();
        slider.tick(Duration::from_secs(3));
        slider.go_to(2);
        assert_eq!(slider.current(), 2);
        assert_eq!(slider.offset_percent(), -200);
        // The 3 seconds before the click do not count
        assert_eq!(slider.tick(Duration::from_secs(3)), 0);
        slider.go_to(7);
        assert_eq!(slider.current(), 2);
    }

    #[test]
    fn test_active_flags() {
        let mut slider = HeroSlider::new(2).unwrap();
        slider.next();
        assert!(slider.is_active(1));
        assert!(!slider.is_active(0));
    }
}
