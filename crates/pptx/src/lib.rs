//! PPTX (Office Open XML) export backend for generated slide decks.
//!
//! Writes .pptx files, which are ZIP archives containing XML documents.

mod template;
pub mod writer;

pub use writer::{PptxWriter, EMU_PER_INCH};
