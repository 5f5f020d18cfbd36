//! Deck construction from generator output.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::parser::SlideParser;
use crate::types::Deck;

/// Source of deck identifiers.
pub trait IdSource {
    /// Produce a fresh, unique identifier.
    fn next_id(&self) -> Result<String>;
}

/// Random v4 UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidSource;

impl IdSource for UuidSource {
    fn next_id(&self) -> Result<String> {
        Ok(Uuid::new_v4().to_string())
    }
}

/// Source of creation timestamps.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// The system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Builds decks by parsing generator output and stamping identity.
#[derive(Debug, Clone, Default)]
pub struct DeckBuilder<I = UuidSource, C = SystemClock> {
    parser: SlideParser,
    ids: I,
    clock: C,
}

impl DeckBuilder {
    /// Create a builder using random UUIDs and the system clock.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<I: IdSource, C: Clock> DeckBuilder<I, C> {
    /// Create a builder with explicit id and time sources.
    pub fn with_sources(parser: SlideParser, ids: I, clock: C) -> Self {
        Self { parser, ids, clock }
    }

    /// Replace the slide parser.
    pub fn with_parser(mut self, parser: SlideParser) -> Self {
        self.parser = parser;
        self
    }

    /// The parser used for new decks.
    pub fn parser(&self) -> &SlideParser {
        &self.parser
    }

    /// Build a deck from generator output.
    ///
    /// The raw text is stored verbatim. A deck with no recognized slides is
    /// still a valid deck. Only identifier generation can fail.
    pub fn build(&self, title: impl Into<String>, raw_text: impl Into<String>) -> Result<Deck> {
        let raw_text = raw_text.into();
        let id = self.ids.next_id()?;
        if id.is_empty() {
            return Err(Error::IdGeneration("identifier source returned an empty id".to_string()));
        }

        let slides = self.parser.parse(&raw_text);
        log::debug!("Built deck {} with {} slides", id, slides.len());

        Ok(Deck::from_parts(
            id,
            title.into(),
            self.clock.now(),
            slides,
            raw_text,
        ))
    }
}
