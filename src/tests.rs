use super::*;
use crate::markdown::HeadingLevel;
use crate::plan::{Card, Stat};
use crate::theme::{DepthRange, SelectionReason};
use std::fs;
use std::path::PathBuf;
use tempfile::{NamedTempFile, TempDir};

fn section(title: &str, body: &str) -> Section {
    markdown::parse(&format!("## {}\n{}", title, body)).remove(0)
}

fn builtin_themes() -> ThemeSet {
    ThemeSet::builtin().expect("Built-in themes should parse")
}

fn bullets(count: usize) -> String {
    (1..=count)
        .map(|i| format!("- item {}", i))
        .collect::<Vec<_>>()
        .join("\n")
}

// --- markdown ---------------------------------------------------------------

#[test]
fn test_parse_without_headings_is_empty() {
    assert!(markdown::parse("").is_empty());
    assert!(markdown::parse("plain text\n- a bullet\n# Only a title\n#### orphan").is_empty());
}

#[test]
fn test_parse_sections_in_source_order() {
    let sections = markdown::parse("## First\none\n### Second\ntwo\n## Third\nthree");

    assert_eq!(sections.len(), 3);
    let titles: Vec<&str> = sections.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, vec!["First", "Second", "Third"]);
    assert_eq!(sections[0].level, HeadingLevel::H2);
    assert_eq!(sections[1].level, HeadingLevel::H3);
    assert_eq!(sections[1].level.depth(), 3);
    assert_eq!(sections[2].body, "three");
}

#[test]
fn test_parse_discards_text_before_first_heading() {
    let sections = markdown::parse("intro text\n\n## Only\nbody line");
    assert_eq!(sections.len(), 1);
    assert_eq!(sections[0].body, "body line");
}

#[test]
fn test_parse_subsections_belong_to_open_section() {
    let sections = markdown::parse("## Parent\nlead\n#### Child A\nalpha\n#### Child B\nbeta\n## Next\n");

    assert_eq!(sections.len(), 2);
    let parent = &sections[0];
    assert_eq!(parent.subsections.len(), 2);
    assert_eq!(parent.subsections[0].title, "Child A");
    assert_eq!(parent.subsections[0].content, "alpha");
    assert_eq!(parent.subsections[1].title, "Child B");
    // The raw #### line stays in the body for block extraction
    assert!(parent.body.contains("#### Child A"));
    assert!(sections[1].subsections.is_empty());
}

#[test]
fn test_parse_whitespace_title_is_captured() {
    let sections = markdown::parse("##    \nbody");
    assert_eq!(sections.len(), 1);
    assert_eq!(sections[0].title, "");
}

#[test]
fn test_document_title() {
    assert_eq!(
        markdown::document_title("intro\n# My Deck\n## Section"),
        Some("My Deck".to_string())
    );
    assert_eq!(markdown::document_title("## Not a title"), None);
}

#[test]
fn test_document_title_skips_fenced_code() {
    let raw = "## Setup\nRun this:\n\n```bash\n# install deps\nnpm install\n```\n";
    assert_eq!(markdown::document_title(raw), None);

    let raw = "```python\n# not this\n```\n# Real Title\n";
    assert_eq!(markdown::document_title(raw), Some("Real Title".to_string()));
}

#[test]
fn test_document_title_stays_on_one_line() {
    assert_eq!(markdown::document_title("#\n## Foo\n"), None);
}

#[test]
fn test_extract_bullets() {
    assert_eq!(
        markdown::extract_bullets("- a\n- b\n* c", 5),
        vec!["a", "b", "c"]
    );
    assert_eq!(
        markdown::extract_bullets("1. first\n• second\ntext", 5),
        vec!["first", "second"]
    );
}

#[test]
fn test_extract_bullets_strips_markup() {
    assert_eq!(
        markdown::extract_bullets("- **Go** fast [link](url)", 5),
        vec!["Go fast link"]
    );
}

#[test]
fn test_extract_bullets_cap() {
    let points = markdown::extract_bullets(&bullets(8), markdown::DEFAULT_MAX_POINTS);
    assert_eq!(points.len(), 5);
    assert_eq!(points[4], "item 5");
}

#[test]
fn test_extract_table() {
    let body = "Intro\n\n| A | B |\n|---|---|\n| 1 | 2 |\n| 3 |\n| 4 | 5 | 6 |\nafter\n| 7 | 8 |";
    let table = markdown::extract_table(body).expect("Table should be found");

    assert_eq!(table.headers, vec!["A", "B"]);
    assert_eq!(
        table.rows,
        vec![vec!["1".to_string(), "2".to_string()], vec!["4".to_string(), "5".to_string()]]
    );
    assert!(markdown::extract_table("no table here").is_none());
}

#[test]
fn test_extract_code_blocks() {
    let blocks = markdown::extract_code_blocks("text\n```python\ndef f(): pass\n```\n\n```\nplain\n```");

    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[0].language, "python");
    assert_eq!(blocks[0].code, "def f(): pass");
    assert_eq!(blocks[1].language, "text");

    let long = format!("```rust\n{}\n```", "a".repeat(600));
    let blocks = markdown::extract_code_blocks(&long);
    assert_eq!(blocks[0].code.chars().count(), markdown::MAX_CODE_CHARS);
}

#[test]
fn test_first_paragraph() {
    let body = "- bullet\n\n```\ncode\n```\n\nThe **real** paragraph\ncontinues [here](x).\n\nSecond one.";
    assert_eq!(
        markdown::first_paragraph(body),
        "The real paragraph continues here."
    );

    let long = "word ".repeat(100);
    assert_eq!(
        markdown::first_paragraph(&long).chars().count(),
        markdown::MAX_PARAGRAPH_CHARS
    );
    assert_eq!(markdown::first_paragraph("- only bullets"), "");
}

#[test]
fn test_first_paragraph_skips_any_list_block() {
    assert_eq!(
        markdown::first_paragraph("* one\n* two\n\nThe pieces talk over a queue."),
        "The pieces talk over a queue."
    );
    assert_eq!(markdown::first_paragraph("1. first\n2. second"), "");

    let slides = plan::plan_section(&section("System Flow", "* Gateway\n* Workers"));
    match &slides[0] {
        SlideSpec::Architecture {
            description,
            points,
            ..
        } => {
            assert_eq!(description, "");
            assert_eq!(points, &vec!["Gateway".to_string(), "Workers".to_string()]);
        }
        other => panic!("Expected architecture slide, got {:?}", other),
    }
}

// --- analyze ----------------------------------------------------------------

#[test]
fn test_content_type_first_match_wins() {
    // "feature" is checked before "architecture"
    assert_eq!(
        analyze::content_type("Feature launch for the new architecture"),
        ContentType::FeatureLaunch
    );
    assert_eq!(
        analyze::content_type("System design review"),
        ContentType::Technical
    );
    assert_eq!(
        analyze::content_type("A guide to onboarding"),
        ContentType::Tutorial
    );
    assert_eq!(
        analyze::content_type("Our roadmap"),
        ContentType::Vision
    );
    assert_eq!(analyze::content_type("hello world"), ContentType::General);
}

#[test]
fn test_rule_order_is_fixed() {
    let order: Vec<ContentType> = analyze::CONTENT_TYPE_RULES.iter().map(|(_, t)| *t).collect();
    assert_eq!(
        order,
        vec![
            ContentType::FeatureLaunch,
            ContentType::Technical,
            ContentType::Business,
            ContentType::Tutorial,
            ContentType::Vision,
        ]
    );
}

#[test]
fn test_audience_and_tone() {
    assert_eq!(analyze::audience("Talk for developers"), Audience::Technical);
    assert_eq!(analyze::audience("Briefing for the CEO"), Audience::Executive);
    assert_eq!(analyze::audience("hello"), Audience::Mixed);

    assert_eq!(analyze::tone("An exciting update"), Tone::Energetic);
    assert_eq!(analyze::tone("Enterprise rollout"), Tone::Professional);
    assert_eq!(analyze::tone("hello"), Tone::Neutral);
}

#[test]
fn test_has_code_from_fence() {
    assert!(analyze::has_code("Walkthrough\n```python\ndef f(): pass\n```", &[]));
}

#[test]
fn test_has_code_from_file_extension() {
    assert!(analyze::has_code("quarterly numbers", &[PathBuf::from("src/main.rs")]));
    assert!(!analyze::has_code("quarterly numbers", &[PathBuf::from("notes.md")]));
}

#[test]
fn test_technical_depth_values() {
    assert_eq!(analyze::technical_depth(""), 0.0);
    assert!((analyze::technical_depth("an API") - 0.2).abs() < 1e-9);
    assert!((analyze::technical_depth("api cache queue async") - 0.8).abs() < 1e-9);
    assert_eq!(
        analyze::technical_depth("architecture api database cache queue kubernetes async"),
        1.0
    );
}

#[test]
fn test_technical_depth_monotonic_and_saturating() {
    let mut text = String::new();
    let mut previous = 0.0;
    for (hits, term) in analyze::TECHNICAL_TERMS.iter().enumerate() {
        text.push_str(term);
        text.push(' ');
        let depth = analyze::technical_depth(&text);
        assert!(depth >= previous, "Depth decreased after adding {}", term);
        assert!((0.0..=1.0).contains(&depth));
        if hits + 1 >= 5 {
            assert_eq!(depth, 1.0);
        }
        previous = depth;
    }
}

#[test]
fn test_classify_business_scenario() {
    let classification = classify("quarterly business update on revenue growth", &[]);
    assert_eq!(classification.content_type, ContentType::Business);
    assert_eq!(classification.audience, Audience::Executive);
    assert!(!classification.has_code);
    assert_eq!(classification.technical_depth, 0.0);
}

// --- plan -------------------------------------------------------------------

#[test]
fn test_plan_bookends_and_filler() {
    let description = "quarterly business update on revenue growth";
    let slides = plan::plan(description, &[], description);

    assert_eq!(slides.len(), 6);
    assert_eq!(
        slides[0],
        SlideSpec::Title {
            title: "Quarterly business update on revenue growth".to_string(),
            subtitle: String::new(),
        }
    );
    let kinds: Vec<&str> = slides.iter().map(SlideSpec::kind).collect();
    assert_eq!(
        kinds,
        vec!["title", "statement", "points", "points", "cards", "cta"]
    );
    assert_eq!(
        slides[5],
        SlideSpec::Cta {
            title: "Thank You".to_string(),
            subtitle: "Questions?".to_string(),
        }
    );
}

#[test]
fn test_plan_filler_goes_before_organic_slides() {
    let sections = vec![
        section("Background", "- one\n- two"),
        section("Next Steps", "- ship it"),
    ];
    let slides = plan::plan("Roadmap", &sections, "Roadmap");

    let kinds: Vec<&str> = slides.iter().map(SlideSpec::kind).collect();
    assert_eq!(
        kinds,
        vec!["title", "statement", "points", "points", "numbered", "cta"]
    );
    assert_eq!(slides[2].title(), "Key Insights");
    assert_eq!(slides[3].title(), "Background");
}

#[test]
fn test_plan_without_filler_when_enough_content() {
    let sections = vec![
        section("Background", "- a"),
        section("Details", "- b"),
        section("More", "- c"),
        section("Extra", "- d"),
    ];
    let slides = plan::plan("Topic", &sections, "Topic");
    assert_eq!(slides.len(), 6);
    assert!(slides[1..5].iter().all(|s| matches!(s, SlideSpec::Points { .. })));
}

#[test]
fn test_deck_title_strips_generation_prefix() {
    assert_eq!(
        plan::deck_title("Create a deck about Rust async runtimes. Keep it short.", ""),
        "Rust async runtimes"
    );
    assert_eq!(
        plan::deck_title("make a presentation on cloud costs", ""),
        "Cloud costs"
    );
    assert_eq!(plan::deck_title("about shadow environments", ""), "Shadow environments");
}

#[test]
fn test_deck_title_prefers_document_heading() {
    let combined = "anything at all\n\n# Launch Review\n## Details\n- a";
    assert_eq!(plan::deck_title("anything at all", combined), "Launch Review");
}

#[test]
fn test_deck_title_ignores_code_comments() {
    let brief = analyze(
        "Quarterly business update",
        "## Setup\nRun this:\n\n```bash\n# install deps\nnpm install\n```\n",
        &[],
    );
    assert_eq!(brief.slides[0].title(), "Quarterly business update");
}

#[test]
fn test_deck_title_truncated() {
    let title = plan::deck_title(&"x".repeat(100), "");
    assert_eq!(title.chars().count(), plan::MAX_TITLE_CHARS);
}

#[test]
fn test_deck_subtitle() {
    assert_eq!(plan::deck_subtitle("Report for March 2025"), "March 2025");
    assert_eq!(plan::deck_subtitle("Notes\nSession Summary"), "Session Summary");
    assert_eq!(plan::deck_subtitle("nothing here"), "");
}

#[test]
fn test_excluded_sections_are_skipped() {
    assert!(plan::is_excluded(&section("Environment Setup", "- a")));
    assert!(plan::is_excluded(&section("Files Created", "- a")));
    assert!(plan::is_excluded(&section("CONFIGURATION", "- a")));

    let sections = vec![section("Environment Variables", "- a\n- b")];
    let slides = plan::plan("Topic", &sections, "Topic");
    assert!(slides.iter().all(|s| s.title() != "Environment Variables"));
}

#[test]
fn test_architecture_section_caps_points() {
    let body = format!("How the pieces fit together.\n\n{}", bullets(5));
    let slides = plan::plan_section(&section("Architecture Overview", &body));

    assert_eq!(slides.len(), 1);
    match &slides[0] {
        SlideSpec::Architecture {
            description,
            points,
            ..
        } => {
            assert_eq!(description, "How the pieces fit together.");
            assert_eq!(points.len(), 4);
        }
        other => panic!("Expected architecture slide, got {:?}", other),
    }
}

#[test]
fn test_results_section_prefers_table() {
    let rows: String = (1..=7).map(|i| format!("| run {} | {} |\n", i, i)).collect();
    let body = format!("| Run | Score |\n|---|---|\n{}", rows);
    let slides = plan::plan_section(&section("Test Results", &body));

    match &slides[0] {
        SlideSpec::Table { table, .. } => {
            assert_eq!(table.headers, vec!["Run", "Score"]);
            assert_eq!(table.rows.len(), 5);
        }
        other => panic!("Expected table slide, got {:?}", other),
    }

    let slides = plan::plan_section(&section("Impact", &bullets(6)));
    match &slides[0] {
        SlideSpec::Points { points, .. } => assert_eq!(points.len(), 5),
        other => panic!("Expected points slide, got {:?}", other),
    }
}

#[test]
fn test_code_section() {
    let body = "Some intro.\n\n```rust\nfn main() {}\n```";
    let slides = plan::plan_section(&section("Implementation", body));
    assert_eq!(
        slides,
        vec![SlideSpec::Code {
            title: "Implementation".to_string(),
            language: "rust".to_string(),
            code: "fn main() {}".to_string(),
        }]
    );

    // Fenced code in the body is enough, whatever the title says
    let slides = plan::plan_section(&section("Notes", body));
    assert_eq!(slides[0].kind(), "code");
}

#[test]
fn test_scenario_section_chunks_cards() {
    let body = "- Alpha: first\n- Beta: second\n- Gamma: third\n- Delta - fourth\n- Epsilon";
    let slides = plan::plan_section(&section("Use Cases", body));

    assert_eq!(slides.len(), 2);
    assert_eq!(slides[0].title(), "Use Cases");
    assert_eq!(slides[1].title(), "Use Cases (cont.)");
    match (&slides[0], &slides[1]) {
        (SlideSpec::Cards { cards: first, .. }, SlideSpec::Cards { cards: second, .. }) => {
            assert_eq!(first.len(), 3);
            assert_eq!(
                first[0],
                Card {
                    title: "Alpha".to_string(),
                    description: "first".to_string(),
                }
            );
            assert_eq!(second.len(), 2);
            assert_eq!(second[0].title, "Delta");
            assert_eq!(second[0].description, "fourth");
            assert_eq!(second[1].title, "Epsilon");
            assert_eq!(second[1].description, "");
        }
        other => panic!("Expected card slides, got {:?}", other),
    }
}

#[test]
fn test_highlights_section_falls_back_to_statement() {
    let slides = plan::plan_section(&section("Why it matters", "Short but real."));
    assert_eq!(
        slides,
        vec![SlideSpec::Statement {
            title: "Why it matters".to_string(),
            statement: "Short but real.".to_string(),
        }]
    );

    let slides = plan::plan_section(&section("What we built", "- a\n- b"));
    assert_eq!(slides[0].kind(), "points");
}

#[test]
fn test_next_steps_section_is_numbered() {
    let slides = plan::plan_section(&section("Next Steps", &bullets(7)));
    match &slides[0] {
        SlideSpec::Numbered { items, .. } => assert_eq!(items.len(), 5),
        other => panic!("Expected numbered slide, got {:?}", other),
    }
}

#[test]
fn test_unmatched_sections() {
    let slides = plan::plan_section(&section("Background", "- one\n- two"));
    assert_eq!(slides[0].kind(), "points");

    let slides = plan::plan_section(&section(
        "Context",
        "This paragraph is comfortably longer than twenty characters.",
    ));
    assert_eq!(slides[0].kind(), "statement");

    assert!(plan::plan_section(&section("Misc", "Too short.")).is_empty());
    assert!(plan::plan_section(&section("Misc", "")).is_empty());
}

#[test]
fn test_stats_section_parses_figures() {
    let body = "- 3x faster builds\n- 50% fewer incidents\n- Uptime: 99.9%\n- plain bullet";
    let slides = plan::plan_section(&section("Key Stats", body));

    assert_eq!(
        slides,
        vec![SlideSpec::Metrics {
            title: "Key Stats".to_string(),
            stats: vec![
                Stat {
                    number: "3x".to_string(),
                    label: "faster builds".to_string(),
                },
                Stat {
                    number: "50%".to_string(),
                    label: "fewer incidents".to_string(),
                },
                Stat {
                    number: "99.9%".to_string(),
                    label: "Uptime".to_string(),
                },
            ],
        }]
    );
}

#[test]
fn test_section_rule_order() {
    // "flow" is checked before "result"
    assert_eq!(
        plan::section_rule(&section("Flow results", "")),
        Some(plan::SectionRule::Architecture)
    );
    assert_eq!(
        plan::section_rule(&section("Example scenario", "")),
        Some(plan::SectionRule::Code)
    );
    assert_eq!(plan::section_rule(&section("Background", "")), None);
}

// --- theme ------------------------------------------------------------------

#[test]
fn test_depth_range_parse() {
    assert_eq!(
        DepthRange::parse("0.0-0.5"),
        Some(DepthRange { low: 0.0, high: 0.5 })
    );
    assert_eq!(DepthRange::parse("low-high"), None);
    assert_eq!(DepthRange::parse("0.8-0.2"), None);
    assert_eq!(DepthRange::parse("0.5"), None);
    assert!(DepthRange::parse("0.5-1.0").unwrap().contains(1.0));
}

#[test]
fn test_builtin_themes_load() {
    let themes = builtin_themes();
    assert_eq!(themes.len(), 2);

    let keynote = themes.get("keynote-minimalist").expect("Hyphenated lookup");
    assert_eq!(keynote.name, "keynote_minimalist");
    assert_eq!(keynote.colors.accent(), "#0A84FF");
    assert_eq!(keynote.typography.headline_weight(), "700");
    assert!(keynote.triggers.depth_range.is_some());
}

#[test]
fn test_malformed_range_scores_zero() {
    let theme = ThemeConfig::from_yaml(
        "odd",
        "triggers:\n  content_type: [business]\n  technical_depth: \"not-a-range\"\n",
    )
    .expect("Theme should still load");

    assert!(theme.triggers.depth_range.is_none());
    let classification = classify("quarterly business update on revenue growth", &[]);
    assert_eq!(theme::score_theme(&theme, &classification), 2.0);
}

#[test]
fn test_non_string_depth_range_still_loads() {
    let theme = ThemeConfig::from_yaml(
        "listed",
        "triggers:\n  content_type: [business]\n  technical_depth: [0.5, 1.0]\n",
    )
    .expect("Theme should still load");

    assert!(theme.triggers.depth_range.is_none());
    assert!(theme.triggers.technical_depth.is_some());
    let classification = classify("quarterly business update on revenue growth", &[]);
    assert_eq!(theme::score_theme(&theme, &classification), 2.0);
}

#[test]
fn test_unknown_theme_keys_are_ignored() {
    let yaml = "name: Corporate\n\
        description: Corporate look\n\
        colors:\n  accent: \"#123456\"\n  highlight: \"#FFFF00\"\n\
        typography:\n  letter_spacing: 1px\n\
        triggers:\n  content_type: [business]\n  technical_depth: [0.5, 1.0]\n";

    let theme = ThemeConfig::from_yaml("corporate", yaml).expect("Theme should load");
    assert_eq!(theme.description, "Corporate look");
    assert_eq!(theme.colors.accent(), "#123456");

    let dir = TempDir::new().expect("Failed to create temp dir");
    fs::write(dir.path().join("corporate.yaml"), yaml).unwrap();
    let mut themes = builtin_themes();
    assert_eq!(themes.load_dir(dir.path()).unwrap(), 1);

    let brief = analyze("quarterly business update", "", &[]);
    let selection = select_theme(&brief, &themes, Some("corporate"));
    assert_eq!(selection.name, "corporate");
    assert_eq!(selection.reason, SelectionReason::Forced);
}

#[test]
fn test_missing_theme_fields_fall_back() {
    let theme = ThemeConfig::from_yaml("bare", "description: Nothing else\n").unwrap();
    assert_eq!(theme.colors.accent(), theme::DEFAULT_ACCENT);
    assert_eq!(theme.typography.headline_size(), "72px");
    assert_eq!(theme.typography.code_font(), theme::DEFAULT_CODE_FONT);
}

#[test]
fn test_numeric_headline_size_gets_units() {
    let theme =
        ThemeConfig::from_yaml("sized", "typography:\n  headline_size: 60\n  headline_weight: 800\n")
            .unwrap();
    assert_eq!(theme.typography.headline_size(), "60px");
    assert_eq!(theme.typography.headline_weight(), "800");
}

#[test]
fn test_select_business_scenario() {
    let brief = analyze("quarterly business update on revenue growth", "", &[]);
    let selection = select_theme(&brief, &builtin_themes(), None);

    assert_eq!(selection.name, "keynote_minimalist");
    assert_eq!(selection.reason, SelectionReason::Scored(4.5));
}

#[test]
fn test_select_technical_content() {
    let brief = analyze(
        "API architecture deep dive for developers: kubernetes, database, cache, async queue",
        "",
        &[],
    );
    let selection = select_theme(&brief, &builtin_themes(), None);

    assert_eq!(selection.name, "technical_blueprint");
    assert_eq!(selection.reason, SelectionReason::Scored(6.0));
}

#[test]
fn test_forced_theme() {
    let brief = analyze("quarterly business update", "", &[]);
    let themes = builtin_themes();

    let selection = select_theme(&brief, &themes, Some("technical-blueprint"));
    assert_eq!(selection.name, "technical_blueprint");
    assert_eq!(selection.reason, SelectionReason::Forced);

    let selection = select_theme(&brief, &themes, Some("no-such-theme"));
    assert_eq!(selection.name, DEFAULT_THEME);
    assert_eq!(
        selection.reason,
        SelectionReason::ForcedMissing("no-such-theme".to_string())
    );
}

#[test]
fn test_tie_goes_to_first_identifier() {
    let yaml = "triggers:\n  content_type: [business]\n";
    let mut themes = ThemeSet::new();
    themes.insert(ThemeConfig::from_yaml("b_theme", yaml).unwrap());
    themes.insert(ThemeConfig::from_yaml("a_theme", yaml).unwrap());

    let brief = analyze("revenue review", "", &[]);
    for _ in 0..3 {
        assert_eq!(select_theme(&brief, &themes, None).name, "a_theme");
    }
}

#[test]
fn test_no_positive_score_uses_default() {
    let mut themes = ThemeSet::new();
    themes.insert(ThemeConfig::from_yaml("plain", "description: no triggers\n").unwrap());

    let brief = analyze("hello", "", &[]);
    let selection = select_theme(&brief, &themes, None);
    assert_eq!(selection.name, DEFAULT_THEME);
    assert_eq!(selection.reason, SelectionReason::Default);
}

#[test]
fn test_load_theme_dir_skips_invalid_files() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    fs::write(
        dir.path().join("custom.yaml"),
        "description: Custom\ncolors:\n  accent: \"#FF0000\"\n",
    )
    .unwrap();
    fs::write(dir.path().join("broken.yaml"), "colors: 42\n").unwrap();
    fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

    let mut themes = builtin_themes();
    let loaded = themes.load_dir(dir.path()).expect("Directory should load");

    assert_eq!(loaded, 1);
    assert_eq!(themes.len(), 3);
    assert_eq!(themes.get("custom").unwrap().colors.accent(), "#FF0000");
    assert!(themes.get("broken").is_none());
}

#[test]
fn test_theme_summaries() {
    let summaries = builtin_themes().summaries();
    assert_eq!(summaries[0].name, "keynote_minimalist");
    assert_eq!(summaries[0].display_name, "keynote-minimalist");
    assert!(summaries[1].best_for.contains("technical"));
}

// --- layout -----------------------------------------------------------------

#[test]
fn test_kind_to_layout_mapping() {
    let theme = ThemeConfig::fallback("t");
    let cases = vec![
        (
            SlideSpec::Title {
                title: "T".into(),
                subtitle: "".into(),
            },
            Layout::TitleCenter,
        ),
        (
            SlideSpec::Statement {
                title: "T".into(),
                statement: "S".into(),
            },
            Layout::Statement,
        ),
        (
            SlideSpec::Points {
                title: "T".into(),
                points: vec!["a".into()],
            },
            Layout::BulletPoints,
        ),
        (
            SlideSpec::Numbered {
                title: "T".into(),
                items: vec!["a".into()],
            },
            Layout::NumberedList,
        ),
        (
            SlideSpec::Cards {
                title: "T".into(),
                cards: vec![],
            },
            Layout::GridThirds,
        ),
        (
            SlideSpec::Table {
                title: "T".into(),
                table: markdown::Table {
                    headers: vec!["h".into()],
                    rows: vec![],
                },
            },
            Layout::TableSlide,
        ),
        (
            SlideSpec::Code {
                title: "T".into(),
                language: "go".into(),
                code: "x".into(),
            },
            Layout::CodeExample,
        ),
        (
            SlideSpec::Architecture {
                title: "T".into(),
                description: "d".into(),
                points: vec![],
            },
            Layout::Architecture,
        ),
        (
            SlideSpec::Metrics {
                title: "T".into(),
                stats: vec![Stat {
                    number: "1".into(),
                    label: "one".into(),
                }],
            },
            Layout::StatGrid,
        ),
        (
            SlideSpec::Cta {
                title: "T".into(),
                subtitle: "Q".into(),
            },
            Layout::CtaFinal,
        ),
    ];

    for (spec, layout) in cases {
        let mapped = map_slide(&spec, &theme).expect("Slide should map");
        assert_eq!(mapped.layout, layout, "Wrong layout for {}", spec.kind());
        assert_eq!(mapped.theme, "t");
    }
}

#[test]
fn test_empty_metrics_are_omitted() {
    let theme = ThemeConfig::fallback("t");
    let empty = SlideSpec::Metrics {
        title: "Numbers".into(),
        stats: vec![],
    };
    assert!(map_slide(&empty, &theme).is_none());

    let deck = map_slides(
        &[
            SlideSpec::Title {
                title: "T".into(),
                subtitle: "".into(),
            },
            empty,
        ],
        &theme,
    );
    assert_eq!(deck.slides.len(), 1);
    assert_eq!(deck.omitted, vec!["metrics: Numbers".to_string()]);
    assert!(deck.slides.iter().all(|s| s.layout != Layout::StatGrid));
}

#[test]
fn test_mapper_defaults_and_accent() {
    let theme = builtin_themes().get_or_fallback("technical_blueprint");

    let code = map_slide(
        &SlideSpec::Code {
            title: "Snippet".into(),
            language: "".into(),
            code: "x = 1".into(),
        },
        &theme,
    )
    .unwrap();
    assert_eq!(code.text("language"), Some(layout::DEFAULT_CODE_LANGUAGE));
    assert!(!code.wants_image);

    let title = map_slide(
        &SlideSpec::Title {
            title: "Deck".into(),
            subtitle: "".into(),
        },
        &theme,
    )
    .unwrap();
    assert_eq!(title.text("accent_color"), Some("#64FFDA"));
    assert!(title.wants_image);
}

// --- html -------------------------------------------------------------------

fn sample_slides(theme: &ThemeConfig) -> Vec<MappedSlide> {
    map_slides(
        &[
            SlideSpec::Title {
                title: "Deck".into(),
                subtitle: "March 2025".into(),
            },
            SlideSpec::Points {
                title: "Points".into(),
                points: vec!["one".into(), "two".into()],
            },
            SlideSpec::Cta {
                title: "Thank You".into(),
                subtitle: "Questions?".into(),
            },
        ],
        theme,
    )
    .slides
}

#[test]
fn test_escape_html() {
    assert_eq!(
        html::escape_html(r#"<a href="x">Tom & Jerry's</a>"#),
        "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#x27;s&lt;/a&gt;"
    );
}

#[test]
fn test_render_escapes_user_content() {
    let theme = ThemeConfig::fallback("t");
    let slides = map_slides(
        &[
            SlideSpec::Title {
                title: "<script>alert(1)</script>".into(),
                subtitle: "".into(),
            },
            SlideSpec::Code {
                title: "Code".into(),
                language: "html".into(),
                code: "<b>bold</b>".into(),
            },
        ],
        &theme,
    )
    .slides;
    let html = render(&slides, &theme, "<script>alert(1)</script>");

    assert!(!html.contains("<script>alert(1)</script>"));
    assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    assert!(html.contains("&lt;b&gt;bold&lt;/b&gt;"));
}

#[test]
fn test_render_structure() {
    let theme = builtin_themes().get_or_fallback("keynote_minimalist");
    let slides = sample_slides(&theme);
    let html = render(&slides, &theme, "Deck");

    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<title>Deck</title>"));
    assert!(html.contains("class=\"slide center active\" data-index=\"0\""));
    assert!(html.contains("class=\"slide\" data-index=\"1\""));
    assert!(!html.contains("active\" data-index=\"1\""));
    assert!(html.contains("const TOTAL_SLIDES = 3;"));
    assert!(html.contains("<li>one</li>"));
    assert!(html.contains("1 / 3"));
    assert_eq!(html.matches("class=\"nav-dot").count(), 3);

    // Self-contained
    assert!(!html.contains("<link"));
    assert!(!html.contains("src="));
}

#[test]
fn test_render_css_fallbacks() {
    let css = html::generate_css(&ThemeConfig::fallback("bare"));
    assert!(css.contains("background: #000;"));
    assert!(css.contains("color: #0A84FF;"));
    assert!(css.contains("font-size: 72px;"));
}

#[test]
fn test_render_title_capped() {
    let html = render(&[], &ThemeConfig::fallback("t"), &"a".repeat(100));
    assert!(html.contains(&format!("<title>{}...</title>", "a".repeat(57))));
    assert!(html.contains("const TOTAL_SLIDES = 0;"));
}

#[test]
fn test_render_background_image() {
    let theme = ThemeConfig::fallback("t");
    let slides: Vec<MappedSlide> = sample_slides(&theme)
        .into_iter()
        .enumerate()
        .map(|(idx, slide)| {
            if idx == 0 {
                slide.with_background(ImageBlob::new("image/png", vec![1, 2, 3]))
            } else {
                slide
            }
        })
        .collect();
    let html = render(&slides, &theme, "Deck");

    assert!(html.contains("url('data:image/png;base64,AQID')"));
    assert!(html.contains("has-background"));
}

#[test]
fn test_render_is_deterministic() {
    let theme = builtin_themes().get_or_fallback("keynote_minimalist");
    let slides = sample_slides(&theme);
    assert_eq!(render(&slides, &theme, "Deck"), render(&slides, &theme, "Deck"));
}

// --- images -----------------------------------------------------------------

#[test]
fn test_image_blob_round_trip() {
    let blob = ImageBlob::from_base64("image/jpeg", "AQID").expect("Valid base64");
    assert_eq!(blob.data, vec![1, 2, 3]);
    assert_eq!(blob.to_data_uri(), "data:image/jpeg;base64,AQID");
    assert!(ImageBlob::from_base64("image/png", "not base64!").is_none());
}

#[test]
fn test_attach_backgrounds_targets_title_and_statements() {
    let theme = ThemeConfig::fallback("t");
    let slides = map_slides(
        &plan::plan("quarterly business update", &[], "quarterly business update"),
        &theme,
    )
    .slides;

    let source = |_prompt: &str| -> Option<ImageBlob> { Some(ImageBlob::new("image/png", vec![7])) };
    let (with_images, generated) =
        images::attach_backgrounds(&slides, &source, &theme.imagery, "topic");

    // Title slide plus the filler challenge statement
    assert_eq!(generated, 2);
    assert!(with_images[0].background_image.is_some());
    assert!(with_images[1].background_image.is_some());
    assert!(with_images[2].background_image.is_none());
    // The input slides are untouched
    assert!(slides.iter().all(|s| s.background_image.is_none()));
}

#[test]
fn test_missing_images_do_not_fail() {
    let theme = ThemeConfig::fallback("t");
    let slides = sample_slides(&theme);
    let source = |_prompt: &str| -> Option<ImageBlob> { None };

    let (with_images, generated) =
        images::attach_backgrounds(&slides, &source, &theme.imagery, "topic");
    assert_eq!(generated, 0);
    assert_eq!(with_images, slides);
}

#[test]
fn test_build_prompt() {
    let theme = builtin_themes().get_or_fallback("technical_blueprint");
    let slides = sample_slides(&theme);
    let prompt = images::build_prompt(&slides[0], &theme.imagery, "fallback topic");

    assert!(prompt.contains("Topic: Deck."));
    assert!(prompt.contains("blueprint aesthetic"));
    assert!(prompt.contains("title slide"));
}

// --- deck -------------------------------------------------------------------

#[test]
fn test_generate_deck_business_scenario() {
    let request = DeckRequest::new("quarterly business update on revenue growth");
    let deck = generate_deck(&request, &builtin_themes(), None);

    assert_eq!(deck.report.theme, "keynote_minimalist");
    assert_eq!(deck.report.content_type, "business");
    assert_eq!(deck.slides.first().map(|s| s.layout), Some(Layout::TitleCenter));
    assert_eq!(deck.slides.last().map(|s| s.layout), Some(Layout::CtaFinal));
    assert!(matches!(deck.brief.slides.first(), Some(SlideSpec::Title { .. })));
    assert!(matches!(deck.brief.slides.last(), Some(SlideSpec::Cta { .. })));
    assert_eq!(deck.report.images_generated, 0);
}

#[test]
fn test_generate_deck_is_deterministic() {
    let reference = "## Architecture Overview\nHow it works.\n\n- a\n- b\n- c\n- d\n- e\n\n## Key Stats\n- no figures here\n";
    let request = DeckRequest {
        description: "System design review".to_string(),
        reference_text: reference.to_string(),
        file_paths: vec![PathBuf::from("design.md")],
        forced_theme: None,
    };
    let themes = builtin_themes();

    let first = generate_deck(&request, &themes, None);
    let second = generate_deck(&request, &themes, None);
    assert_eq!(first.html, second.html);
    assert_eq!(first.report.omitted, vec!["metrics: Key Stats".to_string()]);
    assert_eq!(first.report.planned_slides, first.report.rendered_slides + 1);
}

// --- utils / resources ------------------------------------------------------

#[test]
fn test_slugify() {
    assert_eq!(utils::slugify("Q4 Results: Revenue!"), "q4-results-revenue");
    assert_eq!(utils::slugify("!!!"), "deck");
    assert_eq!(utils::slugify(&"a".repeat(80)).len(), 50);
}

#[test]
fn test_truncate_helpers() {
    assert_eq!(utils::truncate_chars("héllo", 2), "hé");
    assert_eq!(utils::truncate_with_ellipsis("short", 60), "short");
    assert_eq!(utils::capitalize_first("éclair"), "Éclair");
}

#[test]
fn test_read_references_skips_missing_files() {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    std::io::Write::write_all(&mut file, b"## Section\n- point").unwrap();

    let files = vec![
        ReferenceFile::new(file.path().to_str().unwrap()),
        ReferenceFile::new("/definitely/not/here.md"),
    ];
    let references = read_references(&files);

    assert_eq!(references.text, "## Section\n- point");
    assert_eq!(references.paths.len(), 2);
    assert_eq!(references.unreadable, vec!["/definitely/not/here.md".to_string()]);
}

#[test]
fn test_expand_inputs_globs() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    fs::write(dir.path().join("b.md"), "b").unwrap();
    fs::write(dir.path().join("a.md"), "a").unwrap();
    fs::write(dir.path().join("c.txt"), "c").unwrap();

    let pattern = format!("{}/*.md", dir.path().display());
    let files = expand_inputs(&[pattern, "https://example.com/notes.md".to_string()]);

    assert_eq!(files.len(), 3);
    assert!(files[0].path.ends_with("a.md"));
    assert!(files[1].path.ends_with("b.md"));
    assert!(files[2].is_remote);
}
