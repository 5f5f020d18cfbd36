//! Error types for deck building, editing, and persistence.
//!
//! Slide parsing never produces one of these: malformed generator output
//! degrades to fewer (or zero) slides instead.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building, editing, storing, or exporting a deck.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to read or write the persisted collection.
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to serialize a deck or collection.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The identifier source could not produce a deck id.
    #[error("Failed to generate deck identifier: {0}")]
    IdGeneration(String),

    /// An edit addressed a slide that does not exist.
    #[error("Slide index {index} out of range (deck has {len} slides)")]
    SlideIndexOutOfRange { index: usize, len: usize },

    /// An edit would leave a slide without a title.
    #[error("Slide title must not be empty")]
    EmptyTitle,

    /// ZIP archive error (for PPTX export).
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// XML generation error (for PPTX export).
    #[error("XML error: {0}")]
    XmlError(String),
}
