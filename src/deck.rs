// ABOUTME: Deck generation pipeline for the deckgen application
// ABOUTME: Runs analyze, theme selection, layout mapping, imagery and rendering in sequence

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

use crate::analyze::{self, ContentBrief};
use crate::html;
use crate::images::{self, ImageSource};
use crate::layout::{self, MappedSlide};
use crate::plan::SlideSpec;
use crate::resources::ReferenceText;
use crate::theme::{self, SelectionReason, ThemeSelection, ThemeSet};

/// Everything one generation run starts from.
#[derive(Debug, Clone, Default)]
pub struct DeckRequest {
    pub description: String,
    /// Already-concatenated text of the reference files.
    pub reference_text: String,
    pub file_paths: Vec<PathBuf>,
    pub forced_theme: Option<String>,
}

impl DeckRequest {
    pub fn new(description: &str) -> Self {
        Self {
            description: description.to_string(),
            ..Self::default()
        }
    }

    pub fn with_references(mut self, references: ReferenceText) -> Self {
        self.reference_text = references.text;
        self.file_paths = references.paths;
        self
    }

    pub fn with_theme(mut self, theme: Option<&str>) -> Self {
        self.forced_theme = theme.map(str::to_string);
        self
    }
}

/// Outcome values a caller may log or display.
#[derive(Debug, Clone, Serialize)]
pub struct DeckReport {
    pub theme: String,
    pub theme_reason: String,
    pub content_type: String,
    pub audience: String,
    pub tone: String,
    pub has_code: bool,
    pub technical_depth: f64,
    pub section_count: usize,
    pub planned_slides: usize,
    pub rendered_slides: usize,
    pub omitted: Vec<String>,
    pub images_generated: usize,
}

impl fmt::Display for DeckReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "theme {} ({}), {} slide(s) from {} section(s), {} omitted, {} image(s)",
            self.theme,
            self.theme_reason,
            self.rendered_slides,
            self.section_count,
            self.omitted.len(),
            self.images_generated
        )
    }
}

fn describe_selection(selection: &ThemeSelection) -> String {
    match &selection.reason {
        SelectionReason::Forced => "forced".to_string(),
        SelectionReason::Scored(score) => format!("score {:.1}", score),
        SelectionReason::Default => "default".to_string(),
        SelectionReason::ForcedMissing(requested) => {
            format!("'{}' not found, using default", requested)
        }
    }
}

/// A generated deck: the analysis, the mapped slides and the document.
#[derive(Debug, Clone)]
pub struct Deck {
    pub title: String,
    pub brief: ContentBrief,
    pub slides: Vec<MappedSlide>,
    pub html: String,
    pub report: DeckReport,
}

/// Run the whole pipeline for one request.
///
/// Without an image source every slide renders on the theme background.
pub fn generate_deck(
    request: &DeckRequest,
    themes: &ThemeSet,
    image_source: Option<&dyn ImageSource>,
) -> Deck {
    let brief = analyze::analyze(
        &request.description,
        &request.reference_text,
        &request.file_paths,
    );

    let selection = theme::select_theme(&brief, themes, request.forced_theme.as_deref());
    let theme = themes.get_or_fallback(&selection.name);

    let mapped = layout::map_slides(&brief.slides, &theme);

    let title = brief
        .slides
        .iter()
        .find_map(|slide| match slide {
            SlideSpec::Title { title, .. } => Some(title.clone()),
            _ => None,
        })
        .unwrap_or_else(|| brief.description.clone());

    let (slides, images_generated) = match image_source {
        Some(source) => images::attach_backgrounds(&mapped.slides, source, &theme.imagery, &title),
        None => (mapped.slides, 0),
    };

    let html = html::render(&slides, &theme, &title);

    let classification = &brief.classification;
    let report = DeckReport {
        theme: selection.name.clone(),
        theme_reason: describe_selection(&selection),
        content_type: classification.content_type.to_string(),
        audience: classification.audience.to_string(),
        tone: classification.tone.to_string(),
        has_code: classification.has_code,
        technical_depth: classification.technical_depth,
        section_count: brief.sections.len(),
        planned_slides: brief.slides.len(),
        rendered_slides: slides.len(),
        omitted: mapped.omitted,
        images_generated,
    };

    Deck {
        title,
        brief,
        slides,
        html,
        report,
    }
}
