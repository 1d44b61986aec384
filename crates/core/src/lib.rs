//! Core domain types, markdown line classification, width-aware wrapping,
//! page layout, and slide grouping for converting markdown into PDF reports
//! and slide decks.

pub mod classify;
pub mod config;
pub mod error;
pub mod fonts;
pub mod layout;
pub mod measure;
pub mod slides;
pub mod types;
pub mod wrap;

pub use classify::{classify, read_document, split_lines};
pub use config::{LayoutConfig, SlideConfig};
pub use error::{Error, Result};
pub use fonts::{default_candidates, find_candidate, CandidatePair};
pub use layout::{layout, LayoutSession};
pub use measure::{FixedAdvance, TextMeasure};
pub use slides::classify_slides;
pub use types::{ClassifiedLine, DrawCall, FontHandle, LaidOutDocument, Page, SlideSection};
pub use wrap::wrap;
