// ABOUTME: Layout mapper for the deckgen application
// ABOUTME: Binds each slide specification to a concrete layout and its content fields

use serde::Serialize;
use serde_json::{json, Map, Value};
use std::fmt;

use crate::images::ImageBlob;
use crate::plan::SlideSpec;
use crate::theme::ThemeConfig;

/// Language label used when a code slide does not name one.
pub const DEFAULT_CODE_LANGUAGE: &str = "text";

/// The fixed catalogue of slide layouts the renderer knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    TitleCenter,
    Statement,
    BulletPoints,
    NumberedList,
    GridThirds,
    TableSlide,
    CodeExample,
    Architecture,
    StatGrid,
    CtaFinal,
}

impl Layout {
    pub fn as_str(self) -> &'static str {
        match self {
            Layout::TitleCenter => "title_center",
            Layout::Statement => "statement",
            Layout::BulletPoints => "bullet_points",
            Layout::NumberedList => "numbered_list",
            Layout::GridThirds => "grid_thirds",
            Layout::TableSlide => "table_slide",
            Layout::CodeExample => "code_example",
            Layout::Architecture => "architecture",
            Layout::StatGrid => "stat_grid",
            Layout::CtaFinal => "cta_final",
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A slide bound to a layout and theme, ready for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MappedSlide {
    pub layout: Layout,
    pub theme: String,
    pub content: Map<String, Value>,
    #[serde(skip)]
    pub background_image: Option<ImageBlob>,
    /// Whether this slide should get a generated background.
    pub wants_image: bool,
}

impl MappedSlide {
    fn new(layout: Layout, theme: &ThemeConfig, content: Value) -> Self {
        let content = match content {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self {
            layout,
            theme: theme.name.clone(),
            content,
            background_image: None,
            wants_image: matches!(layout, Layout::TitleCenter | Layout::Statement),
        }
    }

    /// A text field of the content, if present.
    pub fn text(&self, field: &str) -> Option<&str> {
        self.content.get(field).and_then(Value::as_str)
    }

    pub fn with_background(mut self, image: ImageBlob) -> Self {
        self.background_image = Some(image);
        self
    }
}

/// Result of mapping a whole slide sequence.
#[derive(Debug, Clone, Default)]
pub struct MappedDeck {
    pub slides: Vec<MappedSlide>,
    /// Kind and title of every slide dropped for lack of content.
    pub omitted: Vec<String>,
}

/// Map one slide. Metrics slides without stats map to nothing.
pub fn map_slide(spec: &SlideSpec, theme: &ThemeConfig) -> Option<MappedSlide> {
    let accent = theme.colors.accent();

    let slide = match spec {
        SlideSpec::Title { title, subtitle } => MappedSlide::new(
            Layout::TitleCenter,
            theme,
            json!({
                "title": title,
                "subtitle": subtitle,
                "accent_color": accent,
            }),
        ),
        SlideSpec::Statement { title, statement } => MappedSlide::new(
            Layout::Statement,
            theme,
            json!({
                "label": title,
                "statement": statement,
            }),
        ),
        SlideSpec::Points { title, points } => MappedSlide::new(
            Layout::BulletPoints,
            theme,
            json!({
                "title": title,
                "points": points,
            }),
        ),
        SlideSpec::Numbered { title, items } => MappedSlide::new(
            Layout::NumberedList,
            theme,
            json!({
                "title": title,
                "items": items,
            }),
        ),
        SlideSpec::Cards { title, cards } => MappedSlide::new(
            Layout::GridThirds,
            theme,
            json!({
                "title": title,
                "items": cards,
            }),
        ),
        SlideSpec::Table { title, table } => MappedSlide::new(
            Layout::TableSlide,
            theme,
            json!({
                "title": title,
                "headers": table.headers,
                "rows": table.rows,
            }),
        ),
        SlideSpec::Code {
            title,
            language,
            code,
        } => {
            let language = if language.trim().is_empty() {
                DEFAULT_CODE_LANGUAGE
            } else {
                language.as_str()
            };
            MappedSlide::new(
                Layout::CodeExample,
                theme,
                json!({
                    "title": title,
                    "language": language,
                    "code": code,
                }),
            )
        }
        SlideSpec::Architecture {
            title,
            description,
            points,
        } => MappedSlide::new(
            Layout::Architecture,
            theme,
            json!({
                "title": title,
                "description": description,
                "components": points,
                "accent_color": accent,
            }),
        ),
        SlideSpec::Metrics { title, stats } => {
            if stats.is_empty() {
                return None;
            }
            MappedSlide::new(
                Layout::StatGrid,
                theme,
                json!({
                    "title": title,
                    "stats": stats,
                    "accent_color": accent,
                }),
            )
        }
        SlideSpec::Cta { title, subtitle } => MappedSlide::new(
            Layout::CtaFinal,
            theme,
            json!({
                "title": title,
                "subtitle": subtitle,
                "accent_color": accent,
            }),
        ),
    };

    Some(slide)
}

/// Map a slide sequence in order, recording what was dropped.
pub fn map_slides(specs: &[SlideSpec], theme: &ThemeConfig) -> MappedDeck {
    let mut deck = MappedDeck::default();
    for spec in specs {
        match map_slide(spec, theme) {
            Some(slide) => deck.slides.push(slide),
            None => deck
                .omitted
                .push(format!("{}: {}", spec.kind(), spec.title())),
        }
    }
    deck
}
