//! Current-slide cursor over a deck.
//!
//! The navigator does not own the slides. Every call takes the current slide
//! count so that a deck shrunk by an edit clamps the cursor on the next read
//! instead of leaving it dangling.

use crate::types::SlideRecord;

/// Cursor over a slide sequence, clamped to `[0, len - 1]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SlideNavigator {
    index: usize,
}

impl SlideNavigator {
    /// Create a navigator positioned on the first slide.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current index clamped to a deck of `len` slides. `None` when empty.
    pub fn index(&self, len: usize) -> Option<usize> {
        if len == 0 {
            None
        } else {
            Some(self.index.min(len - 1))
        }
    }

    /// Advance one slide. No-op on the last slide.
    pub fn next(&mut self, len: usize) {
        if let Some(current) = self.index(len) {
            self.index = (current + 1).min(len - 1);
        }
    }

    /// Go back one slide. No-op on the first slide.
    pub fn previous(&mut self, len: usize) {
        if let Some(current) = self.index(len) {
            self.index = current.saturating_sub(1);
        }
    }

    /// Jump to `index`, clamped to the last slide.
    pub fn go_to(&mut self, index: usize, len: usize) {
        self.index = if len == 0 { 0 } else { index.min(len - 1) };
    }

    /// The slide under the cursor.
    pub fn current<'a>(&self, slides: &'a [SlideRecord]) -> Option<&'a SlideRecord> {
        self.index(slides.len()).and_then(|idx| slides.get(idx))
    }

    /// 1-based position and total, for a "3 / 7" indicator.
    pub fn position(&self, len: usize) -> Option<(usize, usize)> {
        self.index(len).map(|idx| (idx + 1, len))
    }

    /// True when there is no previous slide.
    pub fn is_first(&self, len: usize) -> bool {
        self.index(len).map_or(true, |idx| idx == 0)
    }

    /// True when there is no next slide.
    pub fn is_last(&self, len: usize) -> bool {
        self.index(len).map_or(true, |idx| idx + 1 == len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_previous_at_start_is_noop() {
        let mut nav = SlideNavigator::new();
        nav.previous(3);
        assert_eq!(nav.index(3), Some(0));
    }

    #[test]
    fn test_next_clamps_at_end() {
        let mut nav = SlideNavigator::new();
        nav.next(3);
        nav.next(3);
        nav.next(3);
        assert_eq!(nav.index(3), Some(2));
    }

    #[test]
    fn test_shrunk_deck_clamps_on_read() {
        let mut nav = SlideNavigator::new();
        nav.go_to(4, 5);
        assert_eq!(nav.index(5), Some(4));

        assert_eq!(nav.index(2), Some(1));
        nav.previous(2);
        assert_eq!(nav.index(2), Some(0));
    }

    #[test]
    fn test_empty_deck() {
        let mut nav = SlideNavigator::new();
        nav.next(0);
        nav.previous(0);
        nav.go_to(3, 0);

        assert_eq!(nav.index(0), None);
        assert_eq!(nav.position(0), None);
        assert!(nav.is_first(0));
        assert!(nav.is_last(0));
    }

    #[test]
    fn test_current_and_position() {
        let slides = vec![
            SlideRecord::new("A", "", 0),
            SlideRecord::new("B", "", 1),
            SlideRecord::new("C", "", 2),
        ];
        let mut nav = SlideNavigator::new();
        nav.go_to(1, slides.len());

        assert_eq!(nav.current(&slides).map(|s| s.title.as_str()), Some("B"));
        assert_eq!(nav.position(slides.len()), Some((2, 3)));
        assert!(!nav.is_first(slides.len()));
        assert!(!nav.is_last(slides.len()));

        nav.go_to(99, slides.len());
        assert!(nav.is_last(slides.len()));
    }
}
