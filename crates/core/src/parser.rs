//! Slide boundary detection for generated presentation text.
//!
//! The generator is asked for one of two conventions but follows neither
//! reliably, so each convention is a [`BoundaryStrategy`]. The parser runs
//! every strategy and keeps the one that finds the most markers, breaking
//! ties by priority order. [`BoundaryStrategy::Mixed`] accepts both forms,
//! so text that switches convention midway still yields every slide.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::normalize::TextNormalizer;
use crate::types::SlideRecord;

/// Marker lines wrapped in bold markup, e.g. `**Slide 2: Summary**`.
static EMPHASIZED_MARKER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*(?:#{1,6}[ \t]*)?(?:\*\*|__)[ \t]*Slide[ \t]+\d+[ \t]*:(?P<title>[^\n]*)$")
        .unwrap()
});

/// Marker lines with or without bold markup.
static MIXED_MARKER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*(?:#{1,6}[ \t]*)?(?:(?:\*\*|__)[ \t]*)?Slide[ \t]+\d+[ \t]*:(?P<title>[^\n]*)$")
        .unwrap()
});

/// Unadorned marker lines, e.g. `Slide 2: Summary`.
static PLAIN_MARKER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*(?:#{1,6}[ \t]*)?Slide[ \t]+\d+[ \t]*:(?P<title>[^\n]*)$").unwrap()
});

/// One recognized convention for locating slide markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryStrategy {
    /// `**Slide N: Title**`, optionally followed by a `**Content:**` label.
    Emphasized,
    /// `Slide N: Title` with no markup.
    Plain,
    /// Either form, for text that mixes the two.
    Mixed,
}

impl BoundaryStrategy {
    /// Default priority order.
    pub const DEFAULT_ORDER: [BoundaryStrategy; 3] = [
        BoundaryStrategy::Emphasized,
        BoundaryStrategy::Plain,
        BoundaryStrategy::Mixed,
    ];

    fn marker_regex(self) -> &'static Regex {
        match self {
            Self::Emphasized => &EMPHASIZED_MARKER_REGEX,
            Self::Plain => &PLAIN_MARKER_REGEX,
            Self::Mixed => &MIXED_MARKER_REGEX,
        }
    }

    /// Locate every marker line this strategy recognizes, in source order.
    fn find_markers(self, text: &str) -> Vec<Marker> {
        self.marker_regex()
            .captures_iter(text)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let title = caps.name("title")?;
                Some(Marker {
                    start: whole.start(),
                    end: whole.end(),
                    raw_title: title.as_str().to_string(),
                })
            })
            .collect()
    }
}

/// Which convention the generator was asked to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatHint {
    /// Plain `Slide N: Title` lines.
    SlideBySlide,
    /// Bold-wrapped markers.
    Emphasized,
}

impl FormatHint {
    /// Map a request's `slideBySlide` flag to the convention it asks for.
    pub fn from_slide_by_slide(slide_by_slide: bool) -> Self {
        if slide_by_slide {
            Self::SlideBySlide
        } else {
            Self::Emphasized
        }
    }

    fn preferred_strategy(self) -> BoundaryStrategy {
        match self {
            Self::SlideBySlide => BoundaryStrategy::Plain,
            Self::Emphasized => BoundaryStrategy::Emphasized,
        }
    }
}

/// A matched marker line.
#[derive(Debug)]
struct Marker {
    /// Byte offset where the marker line starts.
    start: usize,
    /// Byte offset just past the marker line (before its newline).
    end: usize,
    /// Text following `Slide N:` on the marker line.
    raw_title: String,
}

/// Outcome of a parse, with the detection details kept for logging and
/// debugging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseReport {
    /// The strategy that produced the slides, if any matched.
    pub strategy: Option<BoundaryStrategy>,
    /// Number of marker lines that strategy found.
    pub markers_found: usize,
    /// The recovered slides.
    pub slides: Vec<SlideRecord>,
}

impl ParseReport {
    /// Markers dropped because no title could be recovered.
    pub fn dropped(&self) -> usize {
        self.markers_found - self.slides.len()
    }
}

/// Parser turning generated text into ordered slide records.
///
/// Parsing is pure: no I/O, no clock, no randomness, and never an error.
/// Input without recognizable markers yields an empty sequence.
#[derive(Debug, Clone)]
pub struct SlideParser {
    strategies: Vec<BoundaryStrategy>,
    normalizer: TextNormalizer,
}

impl Default for SlideParser {
    fn default() -> Self {
        Self {
            strategies: BoundaryStrategy::DEFAULT_ORDER.to_vec(),
            normalizer: TextNormalizer::new(),
        }
    }
}

impl SlideParser {
    /// Create a parser with the default strategy order.
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefer the strategy matching `hint` when strategies tie.
    pub fn with_hint(mut self, hint: FormatHint) -> Self {
        let preferred = hint.preferred_strategy();
        self.strategies.retain(|s| *s != preferred);
        self.strategies.insert(0, preferred);
        self
    }

    /// Use a custom normalizer for titles and bodies.
    pub fn with_normalizer(mut self, normalizer: TextNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// Strategies in the order they are tried.
    pub fn strategies(&self) -> &[BoundaryStrategy] {
        &self.strategies
    }

    /// Parse raw generated text into slides.
    pub fn parse(&self, raw_text: &str) -> Vec<SlideRecord> {
        self.parse_detailed(raw_text).slides
    }

    /// Parse raw generated text, reporting which strategy matched.
    pub fn parse_detailed(&self, raw_text: &str) -> ParseReport {
        let text = self.normalizer.normalize_source(raw_text);

        let mut best: Option<(BoundaryStrategy, Vec<Marker>)> = None;
        for &strategy in &self.strategies {
            let markers = strategy.find_markers(&text);
            log::trace!("{:?} strategy found {} markers", strategy, markers.len());

            // Strictly more, so earlier strategies win ties
            if markers.len() > best.as_ref().map_or(0, |(_, found)| found.len()) {
                best = Some((strategy, markers));
            }
        }

        let Some((strategy, markers)) = best else {
            log::debug!("No slide markers recognized in {} bytes of text", text.len());
            return ParseReport {
                strategy: None,
                markers_found: 0,
                slides: Vec::new(),
            };
        };

        let report = ParseReport {
            strategy: Some(strategy),
            markers_found: markers.len(),
            slides: self.build_records(&text, &markers),
        };

        log::debug!(
            "{:?} strategy matched {} markers, {} slides ({} dropped)",
            strategy,
            report.markers_found,
            report.slides.len(),
            report.dropped()
        );
        report
    }

    /// Turn each marker and the text up to the next marker into a record.
    fn build_records(&self, text: &str, markers: &[Marker]) -> Vec<SlideRecord> {
        let mut slides = Vec::with_capacity(markers.len());

        for (idx, marker) in markers.iter().enumerate() {
            let title = self.normalizer.clean_title(&marker.raw_title);
            if title.is_empty() {
                log::debug!("Dropping marker at byte {} with empty title", marker.start);
                continue;
            }

            let body_end = markers.get(idx + 1).map_or(text.len(), |next| next.start);
            let body = self.normalizer.clean_body(&text[marker.end..body_end]);

            let order = slides.len();
            slides.push(SlideRecord::new(title, body, order));
        }

        slides
    }
}

/// Parse raw generated text with the default parser.
pub fn parse_slides(raw_text: &str) -> Vec<SlideRecord> {
    SlideParser::new().parse(raw_text)
}
