// ABOUTME: Markdown structural parser for reference files
// ABOUTME: Splits text into heading-delimited sections and extracts bullets, tables and code

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

use crate::utils::truncate_chars;

static SECTION_HEADING_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{2,3})\s+(.+)$").unwrap());

static SUBSECTION_HEADING_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^####\s+(.+)$").unwrap());

static DOCUMENT_TITLE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#[ \t]+(.+?)[ \t]*$").unwrap());

static BULLET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:[-*•]|\d+\.)\s+(.+)$").unwrap());

static BOLD_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").unwrap());

static LINK_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]*)\]\([^)]*\)").unwrap());

static CODE_BLOCK_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```([^\n`]*)\n(.*?)```").unwrap());

static PARAGRAPH_BREAK_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n[ \t]*\n").unwrap());

static SEPARATOR_CELL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^:?-+:?$").unwrap());

/// Default number of bullet points pulled out of a section body.
pub const DEFAULT_MAX_POINTS: usize = 5;

/// Code bodies longer than this are cut off.
pub const MAX_CODE_CHARS: usize = 500;

/// First paragraphs longer than this are cut off.
pub const MAX_PARAGRAPH_CHARS: usize = 300;

/// Heading depth of a section. `####` headings become subsections instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HeadingLevel {
    H2,
    H3,
}

impl HeadingLevel {
    pub fn depth(self) -> u8 {
        match self {
            HeadingLevel::H2 => 2,
            HeadingLevel::H3 => 3,
        }
    }
}

/// A `####` heading and the lines that follow it, up to the next heading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Subsection {
    pub title: String,
    pub content: String,
}

/// A `##`/`###` heading-delimited block of the source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub level: HeadingLevel,
    pub title: String,
    /// Every line between this heading and the next section heading,
    /// including `####` lines.
    pub body: String,
    pub subsections: Vec<Subsection>,
}

/// A pipe table: header cells plus rows zipped against them by position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeBlock {
    pub language: String,
    pub code: String,
}

struct OpenSection<'a> {
    level: HeadingLevel,
    title: String,
    lines: Vec<&'a str>,
    subsections: Vec<(String, Vec<&'a str>)>,
}

impl<'a> OpenSection<'a> {
    fn new(level: HeadingLevel, title: &str) -> Self {
        Self {
            level,
            title: title.trim().to_string(),
            lines: Vec::new(),
            subsections: Vec::new(),
        }
    }

    fn push_line(&mut self, line: &'a str) {
        self.lines.push(line);
        if let Some((_, content)) = self.subsections.last_mut() {
            content.push(line);
        }
    }

    fn open_subsection(&mut self, line: &'a str, title: &str) {
        self.lines.push(line);
        self.subsections.push((title.trim().to_string(), Vec::new()));
    }

    fn finish(self) -> Section {
        Section {
            level: self.level,
            title: self.title,
            body: self.lines.join("\n"),
            subsections: self
                .subsections
                .into_iter()
                .map(|(title, content)| Subsection {
                    title,
                    content: content.join("\n").trim().to_string(),
                })
                .collect(),
        }
    }
}

/// Parse raw reference text into sections, in source order.
///
/// `##` and `###` open a new section, `####` adds a subsection to the open
/// one. Text before the first section heading is dropped.
pub fn parse(raw: &str) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut current: Option<OpenSection> = None;

    for line in raw.lines() {
        let line = line.trim_end_matches('\r');

        if let Some(caps) = SECTION_HEADING_REGEX.captures(line) {
            let level = if caps[1].len() == 2 {
                HeadingLevel::H2
            } else {
                HeadingLevel::H3
            };
            if let Some(open) = current.take() {
                sections.push(open.finish());
            }
            current = Some(OpenSection::new(level, &caps[2]));
            continue;
        }

        let Some(open) = current.as_mut() else {
            continue;
        };

        match SUBSECTION_HEADING_REGEX.captures(line) {
            Some(caps) => open.open_subsection(line, &caps[1]),
            None => open.push_line(line),
        }
    }

    if let Some(open) = current {
        sections.push(open.finish());
    }

    sections
}

/// The first `# Title` line of a document outside fenced code, if any.
pub fn document_title(raw: &str) -> Option<String> {
    let mut in_fence = false;
    for line in raw.lines() {
        let line = line.trim_end_matches('\r');
        if line.trim_start().starts_with("```") {
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            continue;
        }
        if let Some(caps) = DOCUMENT_TITLE_REGEX.captures(line) {
            let title = caps[1].trim();
            if !title.is_empty() {
                return Some(title.to_string());
            }
        }
    }
    None
}

/// Remove `**bold**` and `[text](url)` markup, keeping the visible text.
pub fn strip_inline_markup(text: &str) -> String {
    let unbolded = BOLD_REGEX.replace_all(text, "$1");
    LINK_REGEX.replace_all(&unbolded, "$1").trim().to_string()
}

/// Bullet and numbered-list items in order, markup stripped, at most `max`.
pub fn extract_bullets(body: &str, max: usize) -> Vec<String> {
    body.lines()
        .filter_map(|line| BULLET_REGEX.captures(line))
        .map(|caps| strip_inline_markup(&caps[1]))
        .filter(|point| !point.is_empty())
        .take(max)
        .collect()
}

fn split_row(line: &str) -> Vec<String> {
    let inner = line.trim();
    let inner = inner.strip_prefix('|').unwrap_or(inner);
    let inner = inner.strip_suffix('|').unwrap_or(inner);
    inner.split('|').map(|cell| cell.trim().to_string()).collect()
}

fn is_separator_row(cells: &[String]) -> bool {
    !cells.is_empty() && cells.iter().all(|cell| SEPARATOR_CELL_REGEX.is_match(cell))
}

/// The first pipe table in `body`.
///
/// Rows with fewer cells than the header are dropped; extra cells are
/// ignored. The table ends at the first non-blank line not starting with `|`.
pub fn extract_table(body: &str) -> Option<Table> {
    let mut headers: Option<Vec<String>> = None;
    let mut rows = Vec::new();

    for line in body.lines() {
        let trimmed = line.trim();

        if !trimmed.starts_with('|') {
            if headers.is_some() && !trimmed.is_empty() {
                break;
            }
            continue;
        }

        let cells = split_row(trimmed);
        match &headers {
            None => headers = Some(cells),
            Some(header) => {
                if is_separator_row(&cells) || cells.len() < header.len() {
                    continue;
                }
                rows.push(cells.into_iter().take(header.len()).collect());
            }
        }
    }

    headers.map(|headers| Table { headers, rows })
}

/// Every fenced code block in `body`, in order.
pub fn extract_code_blocks(body: &str) -> Vec<CodeBlock> {
    CODE_BLOCK_REGEX
        .captures_iter(body)
        .map(|caps| {
            let language = caps[1].trim();
            let code = caps[2].trim_end_matches('\n');
            CodeBlock {
                language: if language.is_empty() {
                    "text".to_string()
                } else {
                    language.to_string()
                },
                code: truncate_chars(code, MAX_CODE_CHARS),
            }
        })
        .collect()
}

/// The first prose paragraph of `body`, or an empty string.
///
/// Blocks that start with a heading, a list item or a code fence are skipped.
pub fn first_paragraph(body: &str) -> String {
    PARAGRAPH_BREAK_REGEX
        .split(body)
        .map(str::trim)
        .find(|block| {
            !block.is_empty()
                && !block.starts_with('#')
                && !block.starts_with('-')
                && !block.starts_with("```")
                && !block
                    .lines()
                    .next()
                    .is_some_and(|line| BULLET_REGEX.is_match(line))
        })
        .map(|block| {
            let joined = block
                .lines()
                .map(str::trim)
                .collect::<Vec<_>>()
                .join(" ");
            truncate_chars(&strip_inline_markup(&joined), MAX_PARAGRAPH_CHARS)
        })
        .unwrap_or_default()
}
