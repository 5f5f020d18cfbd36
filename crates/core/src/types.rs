//! Domain types for representing a generated slide deck.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::parser::SlideParser;

/// A single slide recovered from generated text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideRecord {
    /// Slide heading. Never empty after trimming.
    pub title: String,

    /// Slide body text. May be empty.
    #[serde(rename = "content")]
    pub body: String,

    /// 0-based position in the deck.
    #[serde(default)]
    pub order: usize,
}

impl SlideRecord {
    /// Create a new slide record.
    pub fn new(title: impl Into<String>, body: impl Into<String>, order: usize) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            order,
        }
    }

    /// Body split into its non-empty lines.
    pub fn body_lines(&self) -> Vec<&str> {
        self.body
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect()
    }
}

/// A change to one slide's text. `None` fields are left as they are.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideEdit {
    pub title: Option<String>,
    pub body: Option<String>,
}

impl SlideEdit {
    /// Edit that replaces only the title.
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            body: None,
        }
    }

    /// Edit that replaces only the body.
    pub fn body(body: impl Into<String>) -> Self {
        Self {
            title: None,
            body: Some(body.into()),
        }
    }
}

/// A generated presentation: ordered slides plus the text they came from.
///
/// `id`, `created_at` and the raw text are fixed at creation. Only the title
/// and the derived slides change through edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deck {
    id: String,

    /// Display title of the deck.
    pub title: String,

    created_at: DateTime<Utc>,

    /// Slides in source order.
    pub slides: Vec<SlideRecord>,

    #[serde(rename = "result", alias = "rawText")]
    raw_text: String,
}

impl Deck {
    pub(crate) fn from_parts(
        id: String,
        title: String,
        created_at: DateTime<Utc>,
        slides: Vec<SlideRecord>,
        raw_text: String,
    ) -> Self {
        Self {
            id,
            title,
            created_at,
            slides,
            raw_text,
        }
    }

    /// Identifier assigned at creation.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Creation timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// The unparsed generator output this deck was built from.
    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    /// Number of slides.
    pub fn len(&self) -> usize {
        self.slides.len()
    }

    /// True if no slide boundaries were recognized.
    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    /// Change the deck's display title.
    pub fn rename(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Apply a text edit to the slide at `index`.
    ///
    /// The edit is validated before anything is changed, so a rejected edit
    /// leaves the slide untouched.
    pub fn edit_slide(&mut self, index: usize, edit: SlideEdit) -> Result<()> {
        let len = self.slides.len();
        let slide = self
            .slides
            .get_mut(index)
            .ok_or(Error::SlideIndexOutOfRange { index, len })?;

        if let Some(title) = &edit.title {
            if title.trim().is_empty() {
                return Err(Error::EmptyTitle);
            }
        }

        if let Some(title) = edit.title {
            slide.title = title.trim().to_string();
        }
        if let Some(body) = edit.body {
            slide.body = body;
        }

        Ok(())
    }

    /// Re-derive the slides from the raw text, discarding edits.
    pub fn reparse(&mut self, parser: &SlideParser) {
        self.slides = parser.parse(&self.raw_text);
    }

    /// Rewrite every slide's `order` to match its position.
    pub fn reindex(&mut self) {
        for (idx, slide) in self.slides.iter_mut().enumerate() {
            slide.order = idx;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_deck() -> Deck {
        let raw = "Slide 1: Intro\nHello\n\nSlide 2: End\nBye";
        Deck::from_parts(
            "deck-1".to_string(),
            "Talk".to_string(),
            Utc::now(),
            SlideParser::new().parse(raw),
            raw.to_string(),
        )
    }

    #[test]
    fn test_edit_slide_title_and_body() {
        let mut deck = sample_deck();
        deck.edit_slide(
            1,
            SlideEdit {
                title: Some("  Wrap up ".to_string()),
                body: Some("Thanks for listening".to_string()),
            },
        )
        .unwrap();

        assert_eq!(deck.slides[1].title, "Wrap up");
        assert_eq!(deck.slides[1].body, "Thanks for listening");
        assert_eq!(deck.slides[1].order, 1);
    }

    #[test]
    fn test_edit_keeps_identity_and_raw_text() {
        let mut deck = sample_deck();
        let id = deck.id().to_string();
        let created = deck.created_at();
        let raw = deck.raw_text().to_string();

        deck.edit_slide(0, SlideEdit::body("Changed")).unwrap();
        deck.rename("New name");

        assert_eq!(deck.id(), id);
        assert_eq!(deck.created_at(), created);
        assert_eq!(deck.raw_text(), raw);
        assert_eq!(deck.title, "New name");
    }

    #[test]
    fn test_edit_rejects_empty_title() {
        let mut deck = sample_deck();
        let err = deck
            .edit_slide(0, SlideEdit::title("   "))
            .unwrap_err();
        assert!(matches!(err, Error::EmptyTitle));
        assert_eq!(deck.slides[0].title, "Intro");
    }

    #[test]
    fn test_edit_out_of_range() {
        let mut deck = sample_deck();
        let err = deck.edit_slide(5, SlideEdit::body("x")).unwrap_err();
        assert!(matches!(
            err,
            Error::SlideIndexOutOfRange { index: 5, len: 2 }
        ));
    }

    #[test]
    fn test_reparse_restores_generated_slides() {
        let mut deck = sample_deck();
        deck.edit_slide(0, SlideEdit::title("Edited")).unwrap();
        deck.reparse(&SlideParser::new());
        assert_eq!(deck.slides[0].title, "Intro");
    }

    #[test]
    fn test_serialized_field_names() {
        let deck = sample_deck();
        let value = serde_json::to_value(&deck).unwrap();

        assert!(value.get("createdAt").is_some());
        assert_eq!(value["result"], deck.raw_text());
        assert_eq!(value["slides"][0]["content"], "Hello");
        assert_eq!(value["slides"][1]["order"], 1);
    }

    #[test]
    fn test_deserialize_accepts_raw_text_alias_and_missing_order() {
        let json = r#"{
            "id": "abc",
            "title": "Old",
            "createdAt": "2024-05-01T10:00:00.000Z",
            "slides": [{"title": "A", "content": "a"}, {"title": "B", "content": ""}],
            "rawText": "Slide 1: A\na\nSlide 2: B"
        }"#;
        let mut deck: Deck = serde_json::from_str(json).unwrap();
        deck.reindex();

        assert_eq!(deck.id(), "abc");
        assert_eq!(deck.raw_text(), "Slide 1: A\na\nSlide 2: B");
        assert_eq!(deck.slides[1].order, 1);
    }

    #[test]
    fn test_body_lines() {
        let slide = SlideRecord::new("T", "one\n\n  two  \n", 0);
        assert_eq!(slide.body_lines(), vec!["one", "two"]);
    }
}
