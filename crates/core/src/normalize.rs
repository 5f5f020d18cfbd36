//! Cleanup of generator output.
//!
//! Handles line ending and Unicode normalization of the source text, removal
//! of emphasis markup from slide titles, and stripping of label tokens and
//! stray formatting from slide bodies.

use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

/// Regex to collapse multiple whitespace characters into one.
static WHITESPACE_COLLAPSE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]+").unwrap());

/// Regex to match a "Content:" label at the start of a line, bold or not.
static CONTENT_LABEL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^[ \t]*(?:\*\*|__)?[ \t]*content[ \t]*(?:\*\*|__)?[ \t]*:[ \t]*(?:\*\*|__)?[ \t]*")
        .unwrap()
});

/// Regex to match markdown horizontal rules used as slide separators.
static RULE_LINE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*(?:-{3,}|\*{3,}|_{3,})[ \t]*$").unwrap());

/// Regex to match a `**bold**` span delimited at word boundaries.
static BOLD_PAIR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)(^|[^\w*])\*\*([^\s*](?:[^\n]*?[^\s*])?)\*\*($|[^\w*])").unwrap()
});

/// Regex to match a `__bold phrase__` span. The inner text must contain
/// whitespace so dunder identifiers like `__init__` are left alone.
static UNDERSCORE_PAIR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)(^|[^\w])__([^\s_][^\n]*?\s[^\n]*?[^\s_])__($|[^\w])").unwrap()
});

/// Regex to match runs of two or more blank lines.
static BLANK_RUN_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

/// Bold delimiters left at the edges of a marker's title text.
const EDGE_TOKENS: [&str; 2] = ["**", "__"];

/// Text normalizer for generated slide text.
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    /// Whether to remove bold markers from slide bodies.
    strip_emphasis: bool,
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self {
            strip_emphasis: true,
        }
    }
}

impl TextNormalizer {
    /// Create a new text normalizer with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether to remove bold markers from slide bodies.
    pub fn with_strip_emphasis(mut self, strip: bool) -> Self {
        self.strip_emphasis = strip;
        self
    }

    /// Normalize raw generator output before boundary detection.
    ///
    /// Converts line endings to `\n` and composes Unicode to NFC so that
    /// marker matching sees one canonical form.
    pub fn normalize_source(&self, text: &str) -> String {
        text.replace("\r\n", "\n")
            .replace('\r', "\n")
            .nfc()
            .collect()
    }

    /// Clean the text following a `Slide N:` marker into a title.
    ///
    /// - Unwraps paired emphasis spans
    /// - Drops unmatched emphasis delimiters and leading heading `#`s
    /// - Collapses whitespace runs to single spaces
    pub fn clean_title(&self, text: &str) -> String {
        let unwrapped = strip_emphasis_pairs(text);
        let trimmed = strip_edge_markup(&unwrapped);

        WHITESPACE_COLLAPSE_REGEX
            .replace_all(trimmed, " ")
            .into_owned()
    }

    /// Clean the text between two markers into a slide body.
    ///
    /// - Strips echoed `Content:` labels
    /// - Drops horizontal rule lines
    /// - Unwraps paired emphasis spans (if configured)
    /// - Trims trailing whitespace on each line and collapses blank runs
    pub fn clean_body(&self, text: &str) -> String {
        let mut result = CONTENT_LABEL_REGEX.replace_all(text, "").into_owned();
        result = RULE_LINE_REGEX.replace_all(&result, "").into_owned();

        if self.strip_emphasis {
            result = strip_emphasis_pairs(&result);
        }

        result = result
            .lines()
            .map(str::trim_end)
            .collect::<Vec<_>>()
            .join("\n");

        BLANK_RUN_REGEX
            .replace_all(&result, "\n\n")
            .trim()
            .to_string()
    }
}

/// Remove paired emphasis delimiters, keeping the text they wrap.
fn strip_emphasis_pairs(text: &str) -> String {
    let mut current = text.to_string();

    // Boundary characters are consumed by a match, so adjacent spans need
    // another pass. Each pass that changes anything shortens the text.
    loop {
        let bold = BOLD_PAIR_REGEX
            .replace_all(&current, "${1}${2}${3}")
            .into_owned();
        let next = UNDERSCORE_PAIR_REGEX
            .replace_all(&bold, "${1}${2}${3}")
            .into_owned();

        if next == current {
            return current;
        }
        current = next;
    }
}

/// Trim markup left around a title by the marker line itself.
fn strip_edge_markup(title: &str) -> &str {
    let mut t = title.trim();

    loop {
        let before = t.len();
        t = t.trim_start_matches('#').trim_start();

        for token in EDGE_TOKENS {
            let count = t.matches(token).count();
            let wrapped = count == 2
                && t.len() > 2 * token.len()
                && t.starts_with(token)
                && t.ends_with(token);

            if wrapped {
                let inner = &t[token.len()..t.len() - token.len()];
                if inner.contains(char::is_whitespace) {
                    t = inner.trim();
                }
            } else if count % 2 == 1 {
                if let Some(rest) = t.strip_prefix(token) {
                    t = rest.trim_start();
                } else if let Some(rest) = t.strip_suffix(token) {
                    t = rest.trim_end();
                }
            }
        }

        if t.len() == before {
            break;
        }
    }

    strip_lone_asterisks(t)
}

/// Drop a single-`*` italic wrapper or one unmatched `*` at an edge.
fn strip_lone_asterisks(title: &str) -> &str {
    match title.matches('*').count() {
        1 => title
            .strip_prefix('*')
            .or_else(|| title.strip_suffix('*'))
            .map_or(title, str::trim),
        2 if title.len() > 2 && title.starts_with('*') && title.ends_with('*') => {
            title[1..title.len() - 1].trim()
        }
        _ => title,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_line_endings() {
        let normalizer = TextNormalizer::new();

        assert_eq!(
            normalizer.normalize_source("Slide 1: A\r\nBody\rMore"),
            "Slide 1: A\nBody\nMore"
        );
    }

    #[test]
    fn test_normalize_composes_unicode() {
        let normalizer = TextNormalizer::new();

        // "e" followed by a combining acute accent
        assert_eq!(normalizer.normalize_source("Cafe\u{301}"), "Caf\u{e9}");
    }

    #[test]
    fn test_clean_title_strips_bold() {
        let normalizer = TextNormalizer::new();

        assert_eq!(normalizer.clean_title(" Overview**"), "Overview");
        assert_eq!(normalizer.clean_title("** Key  Points **"), "Key Points");
        assert_eq!(normalizer.clean_title("**The __Key Idea__**"), "The Key Idea");
        assert_eq!(normalizer.clean_title("** Welcome"), "Welcome");
    }

    #[test]
    fn test_clean_title_keeps_trailing_hash() {
        let normalizer = TextNormalizer::new();

        assert_eq!(normalizer.clean_title(" Why C#"), "Why C#");
        assert_eq!(normalizer.clean_title(" F# and .NET #"), "F# and .NET #");
        assert_eq!(normalizer.clean_title(" **Why C#**"), "Why C#");
    }

    #[test]
    fn test_clean_title_keeps_identifiers() {
        let normalizer = TextNormalizer::new();

        assert_eq!(normalizer.clean_title(" Using __init__"), "Using __init__");
        assert_eq!(normalizer.clean_title("__init__ Explained**"), "__init__ Explained");
        assert_eq!(normalizer.clean_title(" Powers: 2**10"), "Powers: 2**10");
    }

    #[test]
    fn test_clean_title_edge_markup() {
        let normalizer = TextNormalizer::new();

        assert_eq!(normalizer.clean_title("*Intro*"), "Intro");
        assert_eq!(normalizer.clean_title("## Agenda"), "Agenda");
        assert_eq!(normalizer.clean_title("  **  "), "");
    }

    #[test]
    fn test_clean_body_strips_content_label() {
        let normalizer = TextNormalizer::new();

        assert_eq!(
            normalizer.clean_body("\n\n**Content:**\nThis is the overview.\n\n"),
            "This is the overview."
        );
        assert_eq!(
            normalizer.clean_body("Content: Inline text"),
            "Inline text"
        );
        assert_eq!(
            normalizer.clean_body("**Content**: Bold label"),
            "Bold label"
        );
    }

    #[test]
    fn test_clean_body_keeps_words_starting_with_content() {
        let normalizer = TextNormalizer::new();

        assert_eq!(
            normalizer.clean_body("Contents of the box"),
            "Contents of the box"
        );
    }

    #[test]
    fn test_clean_body_drops_rules_and_bold() {
        let normalizer = TextNormalizer::new();

        let body = "* **Speed:** fast\n* Safety\n\n---\n";
        assert_eq!(normalizer.clean_body(body), "* Speed: fast\n* Safety");
    }

    #[test]
    fn test_clean_body_keeps_intra_word_markers() {
        let normalizer = TextNormalizer::new();

        let body = "Define __init__ to set up state.\nUse snake__case or x**2 freely.\n__Key idea__: keep it **short**.";
        assert_eq!(
            normalizer.clean_body(body),
            "Define __init__ to set up state.\nUse snake__case or x**2 freely.\nKey idea: keep it short."
        );
    }

    #[test]
    fn test_clean_body_adjacent_bold_spans() {
        let normalizer = TextNormalizer::new();

        assert_eq!(normalizer.clean_body("**One** **Two**"), "One Two");
    }

    #[test]
    fn test_clean_body_collapses_blank_runs() {
        let normalizer = TextNormalizer::new();

        assert_eq!(
            normalizer.clean_body("One   \n\n\n\nTwo\t"),
            "One\n\nTwo"
        );
    }

    #[test]
    fn test_clean_body_can_keep_emphasis() {
        let normalizer = TextNormalizer::new().with_strip_emphasis(false);

        assert_eq!(normalizer.clean_body("A **bold** claim"), "A **bold** claim");
    }

    #[test]
    fn test_clean_body_empty() {
        let normalizer = TextNormalizer::new();

        assert_eq!(normalizer.clean_body("\n\n  \n"), "");
    }
}
