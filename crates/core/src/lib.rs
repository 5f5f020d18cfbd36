//! Core domain types, slide parsing, and deck persistence for
//! AI-generated slide decks.

pub mod builder;
pub mod error;
pub mod export;
pub mod fence;
pub mod navigator;
pub mod normalize;
pub mod parser;
pub mod repository;
pub mod request;
pub mod types;

pub use builder::{Clock, DeckBuilder, IdSource, SystemClock, UuidSource};
pub use error::{Error, Result};
pub use export::{export_file_name, OutlineFormatter, OutlineStyle};
pub use fence::{RequestFence, RequestTicket};
pub use navigator::SlideNavigator;
pub use normalize::TextNormalizer;
pub use parser::{parse_slides, BoundaryStrategy, FormatHint, ParseReport, SlideParser};
pub use repository::{DeckRepository, DeckStore, JsonFileRepository, MemoryRepository};
pub use request::{GenerationRequest, GenerationResponse};
pub use types::{Deck, SlideEdit, SlideRecord};
