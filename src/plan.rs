// ABOUTME: Slide content planner
// ABOUTME: Turns parsed sections into an ordered list of kind-tagged slide specifications

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

use crate::markdown::{self, Section, Table, DEFAULT_MAX_POINTS};
use crate::utils::{capitalize_first, truncate_chars};

static SENTENCE_END_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?](?:\s|$)").unwrap());

static GENERATION_PREFIX_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*(?:please\s+)?(?:create|make|build|generate)\s+(?:(?:a|an|the)\s+)?(?:slide\s+)?(?:deck|presentation|slides)\s+(?:about|for|on)\s+",
    )
    .unwrap()
});

static ABOUT_PREFIX_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*about\s+").unwrap());

static MONTH_YEAR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?:January|February|March|April|May|June|July|August|September|October|November|December)\s+\d{4}\b",
    )
    .unwrap()
});

static LEADING_FIGURE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([$€£]?\d[\d.,]*[%xX+kKmMbB]*)\s+(.+)$").unwrap()
});

static TRAILING_FIGURE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.+?):\s*([$€£]?\d[\d.,]*[%xX+kKmMbB]*)$").unwrap()
});

pub const MAX_TITLE_CHARS: usize = 80;

/// Organic slides below this count are topped up with filler slides.
pub const MIN_ORGANIC_SLIDES: usize = 4;

const ARCHITECTURE_MAX_POINTS: usize = 4;
const MAX_TABLE_ROWS: usize = 5;
const CARDS_PER_SLIDE: usize = 3;
const MAX_CARD_POINTS: usize = 9;
const MAX_STATS: usize = 3;

/// Minimum length of a first paragraph for an otherwise unmatched section
/// to become a statement slide.
const MIN_STATEMENT_CHARS: usize = 20;

/// Section titles containing any of these are never turned into slides.
pub const EXCLUDED_SECTION_TERMS: &[&str] = &["configuration", "files created", "environment"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Card {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stat {
    pub number: String,
    pub label: String,
}

/// Abstract content of one slide, before a visual layout is chosen.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SlideSpec {
    Title {
        title: String,
        subtitle: String,
    },
    Statement {
        title: String,
        statement: String,
    },
    Points {
        title: String,
        points: Vec<String>,
    },
    Numbered {
        title: String,
        items: Vec<String>,
    },
    Cards {
        title: String,
        cards: Vec<Card>,
    },
    Table {
        title: String,
        table: Table,
    },
    Code {
        title: String,
        language: String,
        code: String,
    },
    Architecture {
        title: String,
        description: String,
        points: Vec<String>,
    },
    Metrics {
        title: String,
        stats: Vec<Stat>,
    },
    Cta {
        title: String,
        subtitle: String,
    },
}

impl SlideSpec {
    pub fn kind(&self) -> &'static str {
        match self {
            SlideSpec::Title { .. } => "title",
            SlideSpec::Statement { .. } => "statement",
            SlideSpec::Points { .. } => "points",
            SlideSpec::Numbered { .. } => "numbered",
            SlideSpec::Cards { .. } => "cards",
            SlideSpec::Table { .. } => "table",
            SlideSpec::Code { .. } => "code",
            SlideSpec::Architecture { .. } => "architecture",
            SlideSpec::Metrics { .. } => "metrics",
            SlideSpec::Cta { .. } => "cta",
        }
    }

    pub fn title(&self) -> &str {
        match self {
            SlideSpec::Title { title, .. }
            | SlideSpec::Statement { title, .. }
            | SlideSpec::Points { title, .. }
            | SlideSpec::Numbered { title, .. }
            | SlideSpec::Cards { title, .. }
            | SlideSpec::Table { title, .. }
            | SlideSpec::Code { title, .. }
            | SlideSpec::Architecture { title, .. }
            | SlideSpec::Metrics { title, .. }
            | SlideSpec::Cta { title, .. } => title,
        }
    }

    /// Slides that come from content rather than the deck's fixed bookends.
    pub fn is_organic(&self) -> bool {
        !matches!(self, SlideSpec::Title { .. } | SlideSpec::Cta { .. })
    }
}

/// Slide shape chosen for a section from its title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionRule {
    Architecture,
    Results,
    Code,
    Scenarios,
    Highlights,
    NextSteps,
    Stats,
}

/// Title keyword rules, checked in order. First match wins.
///
/// The `Code` rule also matches any section whose body holds a fenced block.
pub const SECTION_RULES: &[(&[&str], SectionRule)] = &[
    (&["architecture", "diagram", "flow"], SectionRule::Architecture),
    (&["result", "metric", "impact", "test"], SectionRule::Results),
    (&["code", "implementation", "example"], SectionRule::Code),
    (&["scenario", "use case", "hero"], SectionRule::Scenarios),
    (
        &["what", "why", "benefit", "feature", "built"],
        SectionRule::Highlights,
    ),
    (&["next", "step", "action", "start"], SectionRule::NextSteps),
    (
        &["stats", "statistics", "numbers", "kpi"],
        SectionRule::Stats,
    ),
];

pub fn section_rule(section: &Section) -> Option<SectionRule> {
    let title = section.title.to_lowercase();
    SECTION_RULES
        .iter()
        .find(|(keywords, rule)| {
            keywords.iter().any(|keyword| title.contains(keyword))
                || (*rule == SectionRule::Code && section.body.contains("```"))
        })
        .map(|(_, rule)| *rule)
}

pub fn is_excluded(section: &Section) -> bool {
    let title = section.title.to_lowercase();
    EXCLUDED_SECTION_TERMS
        .iter()
        .any(|term| title.contains(term))
}

/// Title for the deck: the document's `# Title`, else the cleaned-up first
/// sentence of the description.
pub fn deck_title(description: &str, combined_text: &str) -> String {
    let title = markdown::document_title(combined_text)
        .unwrap_or_else(|| title_from_description(description));
    truncate_chars(&title, MAX_TITLE_CHARS)
}

fn title_from_description(description: &str) -> String {
    let sentence = match SENTENCE_END_REGEX.find(description) {
        Some(end) => &description[..end.start()],
        None => description,
    };
    let stripped = GENERATION_PREFIX_REGEX.replace(sentence, "");
    let stripped = ABOUT_PREFIX_REGEX.replace(&stripped, "");
    let title = capitalize_first(stripped.trim());

    if title.is_empty() {
        "Presentation".to_string()
    } else {
        title
    }
}

/// A `Month YYYY` date from the text, else "Session Summary" when that
/// phrase appears, else nothing.
pub fn deck_subtitle(combined_text: &str) -> String {
    if let Some(date) = MONTH_YEAR_REGEX.find(combined_text) {
        return date.as_str().to_string();
    }
    if combined_text.contains("Session Summary") {
        return "Session Summary".to_string();
    }
    String::new()
}

fn table_or_points(title: &str, body: &str) -> Option<SlideSpec> {
    if let Some(mut table) = markdown::extract_table(body).filter(|t| !t.rows.is_empty()) {
        table.rows.truncate(MAX_TABLE_ROWS);
        return Some(SlideSpec::Table {
            title: title.to_string(),
            table,
        });
    }

    let points = markdown::extract_bullets(body, DEFAULT_MAX_POINTS);
    if points.is_empty() {
        return None;
    }
    Some(SlideSpec::Points {
        title: title.to_string(),
        points,
    })
}

fn card_from_point(point: &str) -> Card {
    for separator in [": ", " - "] {
        if let Some((title, description)) = point.split_once(separator) {
            if !title.trim().is_empty() {
                return Card {
                    title: title.trim().to_string(),
                    description: description.trim().to_string(),
                };
            }
        }
    }
    Card {
        title: point.to_string(),
        description: String::new(),
    }
}

fn stat_from_point(point: &str) -> Option<Stat> {
    if let Some(caps) = LEADING_FIGURE_REGEX.captures(point) {
        return Some(Stat {
            number: caps[1].to_string(),
            label: caps[2].trim().to_string(),
        });
    }
    TRAILING_FIGURE_REGEX.captures(point).map(|caps| Stat {
        number: caps[2].to_string(),
        label: caps[1].trim().to_string(),
    })
}

fn card_slides(title: &str, body: &str) -> Vec<SlideSpec> {
    let points = markdown::extract_bullets(body, MAX_CARD_POINTS);
    points
        .chunks(CARDS_PER_SLIDE)
        .enumerate()
        .map(|(idx, chunk)| SlideSpec::Cards {
            title: if idx == 0 {
                title.to_string()
            } else {
                format!("{} (cont.)", title)
            },
            cards: chunk.iter().map(|point| card_from_point(point)).collect(),
        })
        .collect()
}

/// Points if the section has bullets, else a statement from a long enough
/// first paragraph, else nothing.
fn unmatched_section(title: &str, body: &str) -> Vec<SlideSpec> {
    let points = markdown::extract_bullets(body, DEFAULT_MAX_POINTS);
    if !points.is_empty() {
        return vec![SlideSpec::Points {
            title: title.to_string(),
            points,
        }];
    }

    if body.trim().is_empty() {
        return Vec::new();
    }
    let paragraph = markdown::first_paragraph(body);
    if paragraph.chars().count() > MIN_STATEMENT_CHARS {
        vec![SlideSpec::Statement {
            title: title.to_string(),
            statement: paragraph,
        }]
    } else {
        Vec::new()
    }
}

/// Slides for one section. Most sections give one slide; scenario
/// sections may give several, and sections with nothing usable give none.
pub fn plan_section(section: &Section) -> Vec<SlideSpec> {
    let title = section.title.as_str();
    let body = section.body.as_str();

    match section_rule(section) {
        Some(SectionRule::Architecture) => {
            let description = markdown::first_paragraph(body);
            let points = markdown::extract_bullets(body, ARCHITECTURE_MAX_POINTS);
            if description.is_empty() && points.is_empty() {
                return unmatched_section(title, body);
            }
            vec![SlideSpec::Architecture {
                title: title.to_string(),
                description,
                points,
            }]
        }
        Some(SectionRule::Results) => match table_or_points(title, body) {
            Some(slide) => vec![slide],
            None => unmatched_section(title, body),
        },
        Some(SectionRule::Code) => match markdown::extract_code_blocks(body).into_iter().next() {
            Some(block) => vec![SlideSpec::Code {
                title: title.to_string(),
                language: block.language,
                code: block.code,
            }],
            None => unmatched_section(title, body),
        },
        Some(SectionRule::Scenarios) => {
            let slides = card_slides(title, body);
            if slides.is_empty() {
                unmatched_section(title, body)
            } else {
                slides
            }
        }
        Some(SectionRule::Highlights) => {
            if let Some(slide) = table_or_points(title, body) {
                return vec![slide];
            }
            let statement = markdown::first_paragraph(body);
            if statement.is_empty() {
                return Vec::new();
            }
            vec![SlideSpec::Statement {
                title: title.to_string(),
                statement,
            }]
        }
        Some(SectionRule::NextSteps) => {
            let items = markdown::extract_bullets(body, DEFAULT_MAX_POINTS);
            if items.is_empty() {
                return unmatched_section(title, body);
            }
            vec![SlideSpec::Numbered {
                title: title.to_string(),
                items,
            }]
        }
        Some(SectionRule::Stats) => {
            let stats = markdown::extract_bullets(body, usize::MAX)
                .iter()
                .filter_map(|point| stat_from_point(point))
                .take(MAX_STATS)
                .collect();
            vec![SlideSpec::Metrics {
                title: title.to_string(),
                stats,
            }]
        }
        None => unmatched_section(title, body),
    }
}

/// Generic slides used to pad out decks with little organic content.
pub fn filler_slides(topic: &str) -> Vec<SlideSpec> {
    vec![
        SlideSpec::Statement {
            title: "The Challenge".to_string(),
            statement: format!("Why {} matters now", topic),
        },
        SlideSpec::Points {
            title: "Key Insights".to_string(),
            points: vec![
                format!("What is changing around {}", topic),
                "Where the biggest opportunities are".to_string(),
                "What we learned along the way".to_string(),
            ],
        },
        SlideSpec::Points {
            title: "Our Approach".to_string(),
            points: vec![
                "Start from the problem, not the tool".to_string(),
                "Ship in small, measurable increments".to_string(),
                "Keep feedback loops short".to_string(),
            ],
        },
        SlideSpec::Cards {
            title: "Benefits".to_string(),
            cards: vec![
                Card {
                    title: "Clarity".to_string(),
                    description: "A shared picture of where we are going".to_string(),
                },
                Card {
                    title: "Speed".to_string(),
                    description: "Fewer hand-offs and faster decisions".to_string(),
                },
                Card {
                    title: "Impact".to_string(),
                    description: "Results that can be measured".to_string(),
                },
            ],
        },
        SlideSpec::Numbered {
            title: "Next Steps".to_string(),
            items: vec![
                "Align on goals".to_string(),
                "Agree on owners".to_string(),
                "Schedule a follow-up".to_string(),
            ],
        },
    ]
}

pub fn closing_slide() -> SlideSpec {
    SlideSpec::Cta {
        title: "Thank You".to_string(),
        subtitle: "Questions?".to_string(),
    }
}

/// Plan the full slide sequence: title, content (padded with filler when
/// short), closing call to action.
pub fn plan(description: &str, sections: &[Section], combined_text: &str) -> Vec<SlideSpec> {
    let title = deck_title(description, combined_text);

    let organic: Vec<SlideSpec> = sections
        .iter()
        .filter(|section| !is_excluded(section))
        .flat_map(plan_section)
        .collect();

    let mut slides = Vec::with_capacity(organic.len() + MIN_ORGANIC_SLIDES + 2);
    slides.push(SlideSpec::Title {
        title: title.clone(),
        subtitle: deck_subtitle(combined_text),
    });

    if organic.len() < MIN_ORGANIC_SLIDES {
        let needed = MIN_ORGANIC_SLIDES - organic.len();
        slides.extend(filler_slides(&title).into_iter().take(needed));
    }

    slides.extend(organic);
    slides.push(closing_slide());
    slides
}
