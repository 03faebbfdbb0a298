// ABOUTME: Theme configuration and selection for the deckgen application
// ABOUTME: Loads typed theme records from YAML and scores their triggers against a content brief

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use crate::analyze::{Audience, Classification, ContentBrief, ContentType};
use crate::errors::{DeckError, Result};

/// Theme used when nothing is forced and no theme scores above zero.
pub const DEFAULT_THEME: &str = "keynote_minimalist";

const BUILTIN_THEMES: &[(&str, &str)] = &[
    (
        "keynote_minimalist",
        include_str!("../themes/keynote_minimalist.yaml"),
    ),
    (
        "technical_blueprint",
        include_str!("../themes/technical_blueprint.yaml"),
    ),
];

const CONTENT_TYPE_WEIGHT: f64 = 2.0;
const AUDIENCE_WEIGHT: f64 = 1.0;
const CODE_WEIGHT: f64 = 1.5;
const DEPTH_WEIGHT: f64 = 1.5;

// Fallbacks for every theme field a theme file may leave out
pub const DEFAULT_BACKGROUND: &str = "#000";
pub const DEFAULT_TEXT_PRIMARY: &str = "#fff";
pub const DEFAULT_TEXT_SECONDARY: &str = "rgba(255,255,255,0.7)";
pub const DEFAULT_ACCENT: &str = "#0A84FF";
pub const DEFAULT_ACCENT_SECONDARY: &str = "#5E5CE6";
pub const DEFAULT_CARD_BG: &str = "rgba(255,255,255,0.05)";
pub const DEFAULT_BORDER: &str = "rgba(255,255,255,0.1)";
pub const DEFAULT_PRIMARY_FONT: &str = "-apple-system, BlinkMacSystemFont, sans-serif";
pub const DEFAULT_CODE_FONT: &str = "'SF Mono', 'Consolas', monospace";
pub const DEFAULT_HEADLINE_SIZE: &str = "72px";
pub const DEFAULT_HEADLINE_WEIGHT: &str = "700";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThemeColors {
    pub background: Option<String>,
    pub text_primary: Option<String>,
    pub text_secondary: Option<String>,
    pub accent: Option<String>,
    pub accent_secondary: Option<String>,
    pub card_bg: Option<String>,
    pub border: Option<String>,
}

impl ThemeColors {
    pub fn background(&self) -> &str {
        self.background.as_deref().unwrap_or(DEFAULT_BACKGROUND)
    }

    pub fn text_primary(&self) -> &str {
        self.text_primary.as_deref().unwrap_or(DEFAULT_TEXT_PRIMARY)
    }

    pub fn text_secondary(&self) -> &str {
        self.text_secondary
            .as_deref()
            .unwrap_or(DEFAULT_TEXT_SECONDARY)
    }

    pub fn accent(&self) -> &str {
        self.accent.as_deref().unwrap_or(DEFAULT_ACCENT)
    }

    pub fn accent_secondary(&self) -> &str {
        self.accent_secondary
            .as_deref()
            .unwrap_or(DEFAULT_ACCENT_SECONDARY)
    }

    pub fn card_bg(&self) -> &str {
        self.card_bg.as_deref().unwrap_or(DEFAULT_CARD_BG)
    }

    pub fn border(&self) -> &str {
        self.border.as_deref().unwrap_or(DEFAULT_BORDER)
    }

    /// Declared colors in a stable order, for display.
    pub fn entries(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("background", self.background()),
            ("text_primary", self.text_primary()),
            ("text_secondary", self.text_secondary()),
            ("accent", self.accent()),
            ("accent_secondary", self.accent_secondary()),
            ("card_bg", self.card_bg()),
            ("border", self.border()),
        ]
    }
}

/// A CSS value that theme files may write as a bare number or a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CssValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl CssValue {
    /// Render as a length, adding `px` to bare numbers.
    pub fn as_length(&self) -> String {
        match self {
            CssValue::Integer(n) => format!("{}px", n),
            CssValue::Float(n) => format!("{}px", n),
            CssValue::Text(s) => s.clone(),
        }
    }
}

impl fmt::Display for CssValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CssValue::Integer(n) => write!(f, "{}", n),
            CssValue::Float(n) => write!(f, "{}", n),
            CssValue::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Typography {
    pub primary_font: Option<String>,
    pub code_font: Option<String>,
    pub headline_size: Option<CssValue>,
    pub headline_weight: Option<CssValue>,
}

impl Typography {
    pub fn primary_font(&self) -> &str {
        self.primary_font.as_deref().unwrap_or(DEFAULT_PRIMARY_FONT)
    }

    pub fn code_font(&self) -> &str {
        self.code_font.as_deref().unwrap_or(DEFAULT_CODE_FONT)
    }

    pub fn headline_size(&self) -> String {
        self.headline_size
            .as_ref()
            .map(CssValue::as_length)
            .unwrap_or_else(|| DEFAULT_HEADLINE_SIZE.to_string())
    }

    pub fn headline_weight(&self) -> String {
        self.headline_weight
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_else(|| DEFAULT_HEADLINE_WEIGHT.to_string())
    }

    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            ("primary_font", self.primary_font().to_string()),
            ("code_font", self.code_font().to_string()),
            ("headline_size", self.headline_size()),
            ("headline_weight", self.headline_weight()),
        ]
    }
}

/// Style descriptors fed into image prompts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageryStyle {
    pub style: String,
    pub mood: String,
    pub colors: String,
}

impl Default for ImageryStyle {
    fn default() -> Self {
        Self {
            style: "professional, modern, clean".to_string(),
            mood: "polished, business-appropriate".to_string(),
            colors: "complementary color palette".to_string(),
        }
    }
}

/// Inclusive technical-depth window declared as `"low-high"`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthRange {
    pub low: f64,
    pub high: f64,
}

impl DepthRange {
    /// Parse `"0.0-0.5"`. Anything else yields `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let (low, high) = raw.split_once('-')?;
        let low: f64 = low.trim().parse().ok()?;
        let high: f64 = high.trim().parse().ok()?;
        if !low.is_finite() || !high.is_finite() || low > high {
            return None;
        }
        Some(Self { low, high })
    }

    pub fn contains(&self, depth: f64) -> bool {
        self.low <= depth && depth <= self.high
    }
}

#[derive(Debug, Default, Deserialize)]
struct TriggersFile {
    #[serde(default)]
    content_type: Vec<ContentType>,
    #[serde(default)]
    audience: Vec<Audience>,
    #[serde(default)]
    has_code: bool,
    #[serde(default)]
    technical_depth: Option<serde_yaml::Value>,
}

#[derive(Debug, Deserialize)]
struct ThemeFile {
    #[serde(default)]
    description: String,
    #[serde(default)]
    colors: ThemeColors,
    #[serde(default)]
    typography: Typography,
    #[serde(default)]
    triggers: TriggersFile,
    #[serde(default)]
    imagery: Option<ImageryStyle>,
    #[serde(flatten)]
    unknown: BTreeMap<String, serde_yaml::Value>,
}

/// The declared depth range as text, plus its parsed form when it is a
/// well-formed `"low-high"` string.
fn depth_trigger(name: &str, value: Option<serde_yaml::Value>) -> (Option<String>, Option<DepthRange>) {
    let raw = match value {
        None | Some(serde_yaml::Value::Null) => return (None, None),
        Some(serde_yaml::Value::String(raw)) => raw,
        Some(other) => serde_yaml::to_string(&other)
            .map(|text| text.trim().to_string())
            .unwrap_or_default(),
    };

    let parsed = DepthRange::parse(&raw);
    if parsed.is_none() {
        warn!(
            "Theme '{}' has a malformed technical_depth range '{}'; it will not score",
            name, raw
        );
    }
    (Some(raw), parsed)
}

/// Matching rules a theme declares for automatic selection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Triggers {
    pub content_type: Vec<ContentType>,
    pub audience: Vec<Audience>,
    pub has_code: bool,
    /// The range as written in the theme file.
    pub technical_depth: Option<String>,
    /// The parsed range; `None` when absent or malformed.
    pub depth_range: Option<DepthRange>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ThemeConfig {
    pub name: String,
    pub description: String,
    pub colors: ThemeColors,
    pub typography: Typography,
    pub triggers: Triggers,
    pub imagery: ImageryStyle,
}

impl ThemeConfig {
    /// A theme with no declarations at all; every lookup hits its default.
    pub fn fallback(name: &str) -> Self {
        Self {
            name: name.to_string(),
            description: String::new(),
            colors: ThemeColors::default(),
            typography: Typography::default(),
            triggers: Triggers::default(),
            imagery: ImageryStyle::default(),
        }
    }

    /// Parse and validate one theme definition.
    pub fn from_yaml(name: &str, source: &str) -> Result<Self> {
        let file: ThemeFile =
            serde_yaml::from_str(source).map_err(|e| DeckError::ThemeConfigError {
                name: name.to_string(),
                message: e.to_string(),
            })?;

        for key in file.unknown.keys() {
            warn!("Theme '{}' has unknown key '{}'; ignoring it", name, key);
        }
        let (technical_depth, depth_range) = depth_trigger(name, file.triggers.technical_depth);

        Ok(Self {
            name: name.to_string(),
            description: file.description,
            colors: file.colors,
            typography: file.typography,
            triggers: Triggers {
                content_type: file.triggers.content_type,
                audience: file.triggers.audience,
                has_code: file.triggers.has_code,
                technical_depth,
                depth_range,
            },
            imagery: file.imagery.unwrap_or_default(),
        })
    }

    pub fn display_name(&self) -> String {
        self.name.replace('_', "-")
    }
}

/// One line of the theme catalogue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeSummary {
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub best_for: String,
}

/// Loaded themes, keyed and iterated by identifier in lexicographic order.
#[derive(Debug, Clone, Default)]
pub struct ThemeSet {
    themes: BTreeMap<String, ThemeConfig>,
}

fn normalize_name(name: &str) -> String {
    name.trim().replace('-', "_")
}

impl ThemeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// The themes compiled into the binary.
    pub fn builtin() -> Result<Self> {
        let mut set = Self::new();
        for (name, source) in BUILTIN_THEMES {
            set.insert(ThemeConfig::from_yaml(name, source)?);
        }
        Ok(set)
    }

    /// Add every `*.yaml`/`*.yml` theme in `dir`, replacing same-named ones.
    ///
    /// Files that fail to parse are skipped with a warning. Returns the
    /// number of themes loaded.
    pub fn load_dir(&mut self, dir: &Path) -> Result<usize> {
        if !dir.is_dir() {
            return Err(DeckError::PathNotFoundError(dir.to_path_buf()));
        }

        let mut paths: Vec<_> = fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                matches!(
                    path.extension().and_then(|ext| ext.to_str()),
                    Some("yaml") | Some("yml")
                )
            })
            .collect();
        paths.sort();

        let mut loaded = 0;
        for path in paths {
            let Some(name) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            let source = match fs::read_to_string(&path) {
                Ok(source) => source,
                Err(e) => {
                    warn!("Skipping theme file {:?}: {}", path, e);
                    continue;
                }
            };
            match ThemeConfig::from_yaml(name, &source) {
                Ok(theme) => {
                    debug!("Loaded theme '{}' from {:?}", name, path);
                    self.insert(theme);
                    loaded += 1;
                }
                Err(e) => warn!("Skipping theme file {:?}: {}", path, e),
            }
        }

        Ok(loaded)
    }

    pub fn insert(&mut self, theme: ThemeConfig) {
        self.themes.insert(theme.name.clone(), theme);
    }

    /// Resolve a user-supplied name, exactly or with hyphens as underscores.
    pub fn resolve_name(&self, name: &str) -> Option<&str> {
        if let Some((key, _)) = self.themes.get_key_value(name) {
            return Some(key.as_str());
        }
        self.themes
            .get_key_value(&normalize_name(name))
            .map(|(key, _)| key.as_str())
    }

    pub fn get(&self, name: &str) -> Option<&ThemeConfig> {
        self.resolve_name(name).and_then(|key| self.themes.get(key))
    }

    /// The named theme, or a declaration-free theme under that name.
    pub fn get_or_fallback(&self, name: &str) -> ThemeConfig {
        self.get(name)
            .cloned()
            .unwrap_or_else(|| ThemeConfig::fallback(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = &ThemeConfig> {
        self.themes.values()
    }

    pub fn len(&self) -> usize {
        self.themes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.themes.is_empty()
    }

    pub fn summaries(&self) -> Vec<ThemeSummary> {
        self.iter()
            .map(|theme| ThemeSummary {
                name: theme.name.clone(),
                display_name: theme.display_name(),
                description: if theme.description.is_empty() {
                    "No description".to_string()
                } else {
                    theme.description.clone()
                },
                best_for: theme
                    .triggers
                    .content_type
                    .iter()
                    .map(|ct| ct.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
            .collect()
    }
}

/// Why a theme was chosen.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionReason {
    Forced,
    Scored(f64),
    /// Nothing scored above zero.
    Default,
    /// The forced name matched no loaded theme.
    ForcedMissing(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ThemeSelection {
    pub name: String,
    pub reason: SelectionReason,
}

/// Additive trigger score of one theme for a classification.
pub fn score_theme(theme: &ThemeConfig, classification: &Classification) -> f64 {
    let triggers = &theme.triggers;
    let mut score = 0.0;

    if triggers.content_type.contains(&classification.content_type) {
        score += CONTENT_TYPE_WEIGHT;
    }
    if triggers.audience.contains(&classification.audience) {
        score += AUDIENCE_WEIGHT;
    }
    if triggers.has_code && classification.has_code {
        score += CODE_WEIGHT;
    }
    if let Some(range) = triggers.depth_range {
        if range.contains(classification.technical_depth) {
            score += DEPTH_WEIGHT;
        }
    }

    score
}

/// Pick the theme for a brief.
///
/// A forced name that resolves wins outright; one that does not falls back
/// to [`DEFAULT_THEME`]. Otherwise the strictly highest score wins, ties
/// going to the lexicographically first identifier.
pub fn select_theme(brief: &ContentBrief, themes: &ThemeSet, forced: Option<&str>) -> ThemeSelection {
    if let Some(requested) = forced.filter(|name| !name.trim().is_empty()) {
        return match themes.resolve_name(requested) {
            Some(name) => ThemeSelection {
                name: name.to_string(),
                reason: SelectionReason::Forced,
            },
            None => ThemeSelection {
                name: DEFAULT_THEME.to_string(),
                reason: SelectionReason::ForcedMissing(requested.to_string()),
            },
        };
    }

    let mut best: Option<(&ThemeConfig, f64)> = None;
    for theme in themes.iter() {
        let score = score_theme(theme, &brief.classification);
        if score > best.map(|(_, s)| s).unwrap_or(0.0) {
            best = Some((theme, score));
        }
    }

    match best {
        Some((theme, score)) => ThemeSelection {
            name: theme.name.clone(),
            reason: SelectionReason::Scored(score),
        },
        None => ThemeSelection {
            name: DEFAULT_THEME.to_string(),
            reason: SelectionReason::Default,
        },
    }
}
