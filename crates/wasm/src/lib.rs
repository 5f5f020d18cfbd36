//! WASM-compatible wrapper for slide parsing and deck export.
//!
//! This crate exposes the deck functionality to JavaScript for use in the
//! browser front end.

use deck_core::{
    export, BoundaryStrategy, Deck, DeckBuilder, FormatHint, RequestFence, RequestTicket,
    SlideNavigator, SlideParser, SlideRecord,
};
use deck_pptx::PptxWriter;
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn init() {
    // Set up better panic messages in the console
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Result of parsing generated text.
#[derive(Debug, Serialize)]
pub struct ParseResult {
    /// Strategy that recognized the markers, if any did.
    pub strategy: Option<BoundaryStrategy>,
    /// Number of marker lines found.
    pub markers_found: usize,
    /// Markers dropped for lack of a title.
    pub dropped: usize,
    /// Recovered slides. Empty means nothing was recognized yet.
    pub slides: Vec<SlideRecord>,
}

fn parser_for(slide_by_slide: bool) -> SlideParser {
    SlideParser::new().with_hint(FormatHint::from_slide_by_slide(slide_by_slide))
}

/// Parse generated text into slides.
///
/// # Arguments
/// * `raw_text` - The generator output
/// * `slide_by_slide` - Whether plain `Slide N: Title` markers were requested
#[wasm_bindgen]
pub fn parse_slides(raw_text: &str, slide_by_slide: bool) -> Result<JsValue, JsValue> {
    let result = parse_slides_impl(raw_text, slide_by_slide);

    serde_wasm_bindgen::to_value(&result)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

fn parse_slides_impl(raw_text: &str, slide_by_slide: bool) -> ParseResult {
    let report = parser_for(slide_by_slide).parse_detailed(raw_text);

    ParseResult {
        strategy: report.strategy,
        markers_found: report.markers_found,
        dropped: report.dropped(),
        slides: report.slides,
    }
}

/// Build a deck with a fresh id and timestamp.
#[wasm_bindgen]
pub fn build_deck(title: &str, raw_text: &str, slide_by_slide: bool) -> Result<JsValue, JsValue> {
    let deck = build_deck_impl(title, raw_text, slide_by_slide).map_err(|e| JsValue::from_str(&e))?;

    serde_wasm_bindgen::to_value(&deck)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

fn build_deck_impl(title: &str, raw_text: &str, slide_by_slide: bool) -> Result<Deck, String> {
    DeckBuilder::new()
        .with_parser(parser_for(slide_by_slide))
        .build(title, raw_text)
        .map_err(|e| format!("Deck build error: {}", e))
}

fn deck_from_js(deck: JsValue) -> Result<Deck, JsValue> {
    serde_wasm_bindgen::from_value(deck)
        .map_err(|e| JsValue::from_str(&format!("Invalid deck: {}", e)))
}

/// Export a deck as pretty-printed JSON.
#[wasm_bindgen]
pub fn export_json(deck: JsValue) -> Result<String, JsValue> {
    let deck = deck_from_js(deck)?;
    export::to_json(&deck).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Export a deck as a .pptx file.
#[wasm_bindgen]
pub fn export_pptx(deck: JsValue) -> Result<js_sys::Uint8Array, JsValue> {
    let deck = deck_from_js(deck)?;
    let bytes = export_pptx_impl(&deck).map_err(|e| JsValue::from_str(&e))?;
    Ok(js_sys::Uint8Array::from(bytes.as_slice()))
}

fn export_pptx_impl(deck: &Deck) -> Result<Vec<u8>, String> {
    PptxWriter::new()
        .to_bytes(deck)
        .map_err(|e| format!("PPTX export error: {}", e))
}

/// Download file name for a deck title.
#[wasm_bindgen]
pub fn export_file_name(title: &str, extension: &str) -> String {
    export::export_file_name(title, extension)
}

/// Current-slide cursor for the slide view.
#[wasm_bindgen]
#[derive(Debug, Default)]
pub struct Navigator {
    inner: SlideNavigator,
}

#[wasm_bindgen]
impl Navigator {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current index for a deck of `len` slides, or `undefined` when empty.
    pub fn index(&self, len: usize) -> Option<usize> {
        self.inner.index(len)
    }

    pub fn next(&mut self, len: usize) {
        self.inner.next(len);
    }

    pub fn previous(&mut self, len: usize) {
        self.inner.previous(len);
    }

    #[wasm_bindgen(js_name = goTo)]
    pub fn go_to(&mut self, index: usize, len: usize) {
        self.inner.go_to(index, len);
    }

    #[wasm_bindgen(js_name = isFirst)]
    pub fn is_first(&self, len: usize) -> bool {
        self.inner.is_first(len)
    }

    #[wasm_bindgen(js_name = isLast)]
    pub fn is_last(&self, len: usize) -> bool {
        self.inner.is_last(len)
    }
}

/// Tracks generation requests so only the newest result is applied.
#[wasm_bindgen]
#[derive(Debug, Default)]
pub struct GenerationFence {
    inner: RequestFence,
}

#[wasm_bindgen]
impl GenerationFence {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a request. Returns its ticket.
    pub fn begin(&mut self) -> f64 {
        self.inner.begin().value() as f64
    }

    /// Whether the result for `ticket` is still current.
    pub fn accept(&self, ticket: f64) -> bool {
        self.inner.accept(RequestTicket::from(ticket as u64))
    }
}
