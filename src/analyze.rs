// ABOUTME: Content classifier and content brief construction
// ABOUTME: Tags text with content type, audience, tone, code presence and technical depth

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::markdown::{self, Section};
use crate::plan::{self, SlideSpec};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    FeatureLaunch,
    Technical,
    Business,
    Tutorial,
    Vision,
    General,
}

impl ContentType {
    pub fn as_str(self) -> &'static str {
        match self {
            ContentType::FeatureLaunch => "feature_launch",
            ContentType::Technical => "technical",
            ContentType::Business => "business",
            ContentType::Tutorial => "tutorial",
            ContentType::Vision => "vision",
            ContentType::General => "general",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Audience {
    Technical,
    Executive,
    Mixed,
}

impl Audience {
    pub fn as_str(self) -> &'static str {
        match self {
            Audience::Technical => "technical",
            Audience::Executive => "executive",
            Audience::Mixed => "mixed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Energetic,
    Professional,
    Neutral,
}

impl Tone {
    pub fn as_str(self) -> &'static str {
        match self {
            Tone::Energetic => "energetic",
            Tone::Professional => "professional",
            Tone::Neutral => "neutral",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Audience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Keyword rules for the content type, checked in order. First match wins.
pub const CONTENT_TYPE_RULES: &[(&[&str], ContentType)] = &[
    (
        &["feature", "launch", "release", "announce"],
        ContentType::FeatureLaunch,
    ),
    (
        &["architecture", "system", "design", "technical"],
        ContentType::Technical,
    ),
    (
        &["metrics", "roi", "cost", "revenue", "business"],
        ContentType::Business,
    ),
    (
        &["tutorial", "how to", "guide", "learn"],
        ContentType::Tutorial,
    ),
    (
        &["vision", "strategy", "future", "roadmap"],
        ContentType::Vision,
    ),
];

/// Keyword rules for the audience, checked in order. First match wins.
pub const AUDIENCE_RULES: &[(&[&str], Audience)] = &[
    (
        &["developer", "engineer", "technical", "code", "api"],
        Audience::Technical,
    ),
    (
        &["executive", "ceo", "leadership", "business"],
        Audience::Executive,
    ),
];

/// Keyword rules for the tone, checked in order. First match wins.
pub const TONE_RULES: &[(&[&str], Tone)] = &[
    (&["exciting", "innovative", "revolutionary"], Tone::Energetic),
    (&["professional", "enterprise", "formal"], Tone::Professional),
];

pub const CODE_KEYWORDS: &[&str] = &[
    "code",
    "api",
    "function",
    "class",
    "implementation",
    "syntax",
];

pub const CODE_EXTENSIONS: &[&str] = &["py", "js", "ts", "go", "rs", "java", "cpp"];

pub const TECHNICAL_TERMS: &[&str] = &[
    "architecture",
    "implementation",
    "algorithm",
    "infrastructure",
    "api",
    "database",
    "microservice",
    "container",
    "kubernetes",
    "protocol",
    "cache",
    "queue",
    "async",
    "performance",
];

/// Number of technical-term hits at which depth saturates to 1.0.
const DEPTH_SATURATION_HITS: f64 = 5.0;

/// Categorical tags derived from the description and reference text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub content_type: ContentType,
    pub audience: Audience,
    pub tone: Tone,
    pub has_code: bool,
    pub technical_depth: f64,
}

/// Full analysis for one generation run. Built once by [`analyze`].
#[derive(Debug, Clone, Serialize)]
pub struct ContentBrief {
    pub description: String,
    pub classification: Classification,
    pub sections: Vec<Section>,
    pub slides: Vec<SlideSpec>,
}

fn first_match<T: Copy>(text: &str, rules: &[(&[&str], T)], fallback: T) -> T {
    rules
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|keyword| text.contains(keyword)))
        .map(|(_, tag)| *tag)
        .unwrap_or(fallback)
}

pub fn content_type(text: &str) -> ContentType {
    first_match(&text.to_lowercase(), CONTENT_TYPE_RULES, ContentType::General)
}

pub fn audience(text: &str) -> Audience {
    first_match(&text.to_lowercase(), AUDIENCE_RULES, Audience::Mixed)
}

pub fn tone(text: &str) -> Tone {
    first_match(&text.to_lowercase(), TONE_RULES, Tone::Neutral)
}

fn is_code_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| CODE_EXTENSIONS.contains(&ext))
        .unwrap_or(false)
}

/// True for fenced code, code vocabulary, or any source-code input file.
pub fn has_code(text: &str, file_paths: &[PathBuf]) -> bool {
    if text.contains("```") {
        return true;
    }
    let lower = text.to_lowercase();
    CODE_KEYWORDS.iter().any(|keyword| lower.contains(keyword))
        || file_paths.iter().any(|path| is_code_file(path))
}

/// Share of technical vocabulary present, saturating at 1.0 after five terms.
pub fn technical_depth(text: &str) -> f64 {
    let lower = text.to_lowercase();
    let hits = TECHNICAL_TERMS
        .iter()
        .filter(|term| lower.contains(*term))
        .count();
    (hits as f64 / DEPTH_SATURATION_HITS).clamp(0.0, 1.0)
}

pub fn classify(text: &str, file_paths: &[PathBuf]) -> Classification {
    Classification {
        content_type: content_type(text),
        audience: audience(text),
        tone: tone(text),
        has_code: has_code(text, file_paths),
        technical_depth: technical_depth(text),
    }
}

/// Join the description and reference text the way the classifier sees them.
pub fn combine_text(description: &str, reference_text: &str) -> String {
    if reference_text.trim().is_empty() {
        description.to_string()
    } else {
        format!("{}\n\n{}", description, reference_text)
    }
}

/// Classify, parse and plan one generation run.
pub fn analyze(description: &str, reference_text: &str, file_paths: &[PathBuf]) -> ContentBrief {
    let combined = combine_text(description, reference_text);
    let sections = markdown::parse(reference_text);
    let slides = plan::plan(description, &sections, &combined);

    ContentBrief {
        description: description.to_string(),
        classification: classify(&combined, file_paths),
        sections,
        slides,
    }
}
