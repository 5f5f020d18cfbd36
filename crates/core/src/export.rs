//! Read-only export of a deck to JSON and plain-text outlines.
//!
//! Outlines are written in either generator convention, so an exported
//! outline parses back into the same slides.

use regex::Regex;
use std::sync::LazyLock;

use crate::error::Result;
use crate::types::{Deck, SlideRecord};

/// Regex matching whitespace runs in a file name.
static WHITESPACE_RUN_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Export a deck as pretty-printed JSON.
pub fn to_json(deck: &Deck) -> Result<String> {
    Ok(serde_json::to_string_pretty(deck)?)
}

/// Build a download file name from a deck title, e.g. `My_Deck.json`.
pub fn export_file_name(title: &str, extension: &str) -> String {
    let stem = WHITESPACE_RUN_REGEX.replace_all(title.trim(), "_");
    let stem = if stem.is_empty() {
        "presentation".into()
    } else {
        stem
    };

    format!("{}.{}", stem, extension.trim_start_matches('.'))
}

/// Marker convention used when writing an outline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutlineStyle {
    /// `Slide N: Title` followed by the body.
    #[default]
    Plain,
    /// `**Slide N: Title**`, a `**Content:**` label, then the body.
    Emphasized,
}

/// Formatter rendering slides back into generator-style text.
#[derive(Debug, Clone, Default)]
pub struct OutlineFormatter {
    style: OutlineStyle,
}

impl OutlineFormatter {
    /// Create a formatter using plain markers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the marker convention.
    pub fn with_style(mut self, style: OutlineStyle) -> Self {
        self.style = style;
        self
    }

    /// Format slides, separated by blank lines.
    ///
    /// # Example output
    /// ```text
    /// Slide 1: Intro
    /// Welcome to the talk.
    ///
    /// Slide 2: Details
    /// More info here.
    /// ```
    pub fn format(&self, slides: &[SlideRecord]) -> String {
        slides
            .iter()
            .enumerate()
            .map(|(idx, slide)| self.format_slide(idx + 1, slide))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Format a whole deck with a trailing newline.
    pub fn format_deck(&self, deck: &Deck) -> String {
        let formatted = self.format(&deck.slides);
        if formatted.is_empty() {
            formatted
        } else {
            format!("{}\n", formatted)
        }
    }

    fn format_slide(&self, number: usize, slide: &SlideRecord) -> String {
        let body = slide.body.trim();
        match self.style {
            OutlineStyle::Plain if body.is_empty() => {
                format!("Slide {}: {}", number, slide.title)
            }
            OutlineStyle::Plain => format!("Slide {}: {}\n{}", number, slide.title, body),
            OutlineStyle::Emphasized => {
                format!("**Slide {}: {}**\n\n**Content:**\n{}", number, slide.title, body)
                    .trim_end()
                    .to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::DeckBuilder;
    use crate::parser::parse_slides;

    fn slides() -> Vec<SlideRecord> {
        vec![
            SlideRecord::new("Intro", "Welcome to the talk.", 0),
            SlideRecord::new("Details", "More info\n- point one", 1),
            SlideRecord::new("Close", "", 2),
        ]
    }

    #[test]
    fn test_export_file_name() {
        assert_eq!(export_file_name("My  Great\tDeck", "json"), "My_Great_Deck.json");
        assert_eq!(export_file_name("  ", ".pptx"), "presentation.pptx");
        assert_eq!(export_file_name("Solo", "txt"), "Solo.txt");
    }

    #[test]
    fn test_format_plain() {
        let formatter = OutlineFormatter::new();
        let expected = "Slide 1: Intro\nWelcome to the talk.\n\nSlide 2: Details\nMore info\n- point one\n\nSlide 3: Close";
        assert_eq!(formatter.format(&slides()), expected);
    }

    #[test]
    fn test_format_empty() {
        let formatter = OutlineFormatter::new();
        assert_eq!(formatter.format(&[]), "");
    }

    #[test]
    fn test_plain_outline_parses_back() {
        let text = OutlineFormatter::new().format(&slides());
        assert_eq!(parse_slides(&text), slides());
    }

    #[test]
    fn test_emphasized_outline_parses_back() {
        let text = OutlineFormatter::new()
            .with_style(OutlineStyle::Emphasized)
            .format(&slides());

        assert!(text.starts_with("**Slide 1: Intro**\n\n**Content:**\n"));
        assert_eq!(parse_slides(&text), slides());
    }

    #[test]
    fn test_format_deck_trailing_newline() {
        let deck = DeckBuilder::new()
            .build("T", "Slide 1: Only\nbody")
            .unwrap();
        let text = OutlineFormatter::new().format_deck(&deck);
        assert_eq!(text, "Slide 1: Only\nbody\n");
    }

    #[test]
    fn test_json_export_is_read_only() {
        let deck = DeckBuilder::new()
            .build("T", "Slide 1: Only\nbody")
            .unwrap();
        let before = deck.clone();

        let json = to_json(&deck).unwrap();
        assert!(json.contains("\"createdAt\""));
        assert!(json.contains("\"content\": \"body\""));
        assert_eq!(deck, before);
    }
}
