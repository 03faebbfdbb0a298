// ABOUTME: Library module for the deckgen program.
// ABOUTME: Contains the description-to-slide-deck pipeline and its collaborators.

// Reexport modules
pub mod analyze;
pub mod config;
pub mod deck;
pub mod errors;
pub mod html;
pub mod images;
pub mod layout;
pub mod markdown;
pub mod plan;
pub mod resources;
pub mod theme;
pub mod utils;
pub mod watch;

// Reexport common types and functions
pub use analyze::{analyze, classify, Audience, Classification, ContentBrief, ContentType, Tone};
pub use config::Config;
pub use deck::{generate_deck, Deck, DeckReport, DeckRequest};
pub use errors::{DeckError, Result};
pub use html::{render, write_html_to_file};
pub use images::{GeminiImageClient, ImageBlob, ImageConfig, ImageSource};
pub use layout::{map_slide, map_slides, Layout, MappedSlide};
pub use markdown::{parse, Section};
pub use plan::{plan, SlideSpec};
pub use resources::{expand_inputs, read_references, ReferenceFile};
pub use theme::{select_theme, ThemeConfig, ThemeSelection, ThemeSet, DEFAULT_THEME};
pub use watch::{watch_references, WatchConfig};

#[cfg(test)]
mod tests;
