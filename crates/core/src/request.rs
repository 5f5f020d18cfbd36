//! Wire types for the generation proxy.

use serde::{Deserialize, Serialize};

use crate::parser::FormatHint;

/// Source tag the proxy reports for its default generator.
pub const DEFAULT_SOURCE: &str = "gemini-api";

/// Body of `POST /api/presentation`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub slide_by_slide: bool,
    pub api_key: String,
}

impl GenerationRequest {
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            slide_by_slide: false,
            api_key: api_key.into(),
        }
    }

    /// Ask for plain `Slide N: Title` output.
    pub fn with_slide_by_slide(mut self, slide_by_slide: bool) -> Self {
        self.slide_by_slide = slide_by_slide;
        self
    }

    /// The marker convention this request asks the generator for.
    pub fn format_hint(&self) -> FormatHint {
        FormatHint::from_slide_by_slide(self.slide_by_slide)
    }
}

/// Successful proxy response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResponse {
    /// Unstructured generated text.
    pub result: String,
    /// Generator tag.
    #[serde(default)]
    pub source: String,
    /// Title echoed back by the proxy.
    #[serde(default)]
    pub title: String,
}

impl GenerationResponse {
    /// Title for the resulting deck.
    ///
    /// A non-default `source` names the deck; otherwise the requested title
    /// is used.
    pub fn deck_title(&self, requested: &str) -> String {
        let source = self.source.trim();
        if !source.is_empty() && source != DEFAULT_SOURCE {
            source.to_string()
        } else {
            requested.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_wire_shape() {
        let request = GenerationRequest::new("Rust", "ownership", "key-123").with_slide_by_slide(true);
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["slideBySlide"], true);
        assert_eq!(value["apiKey"], "key-123");
        assert_eq!(request.format_hint(), FormatHint::SlideBySlide);
    }

    #[test]
    fn test_response_defaults() {
        let response: GenerationResponse =
            serde_json::from_str(r#"{"result": "Slide 1: A"}"#).unwrap();
        assert_eq!(response.source, "");
        assert_eq!(response.deck_title("Asked"), "Asked");
    }

    #[test]
    fn test_deck_title_prefers_custom_source() {
        let response = GenerationResponse {
            result: String::new(),
            source: "Quarterly Review".to_string(),
            title: "q".to_string(),
        };
        assert_eq!(response.deck_title("q"), "Quarterly Review");

        let default = GenerationResponse {
            source: DEFAULT_SOURCE.to_string(),
            ..response
        };
        assert_eq!(default.deck_title("q"), "q");
    }
}
