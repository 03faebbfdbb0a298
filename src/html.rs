// ABOUTME: HTML generation module for the deckgen application
// ABOUTME: Renders mapped slides into one self-contained document with theme CSS and navigation

use crate::errors::{DeckError, Result};
use crate::layout::{Layout, MappedSlide, DEFAULT_CODE_LANGUAGE};
use crate::theme::{ThemeConfig, DEFAULT_ACCENT};
use crate::utils::truncate_with_ellipsis;
use log::info;
use serde_json::Value;
use std::fs;
use std::path::Path;

const NAVIGATION_JS: &str = include_str!("../assets/navigation.js");

/// Longest `<title>` the document will carry.
pub const MAX_DOCUMENT_TITLE_CHARS: usize = 60;

/// Escape `& < > " '` for use in element content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Generate the stylesheet for a theme, falling back per field.
pub fn generate_css(theme: &ThemeConfig) -> String {
    let colors = &theme.colors;
    let typography = &theme.typography;

    format!(
        r#"
* {{
    margin: 0;
    padding: 0;
    box-sizing: border-box;
}}

body {{
    font-family: {primary_font};
    background: {background};
    color: {text_primary};
    overflow: hidden;
}}

.slide {{
    display: none;
    width: 100vw;
    height: 100vh;
    padding: 60px 80px;
    flex-direction: column;
    justify-content: center;
}}

.slide.active {{
    display: flex;
}}

.slide.has-background {{
    background-size: cover;
    background-position: center;
}}

.headline {{
    font-size: {headline_size};
    font-weight: {headline_weight};
    letter-spacing: -2px;
    line-height: 1.1;
    margin-bottom: 24px;
}}

.title {{
    font-size: 48px;
    font-weight: {headline_weight};
    line-height: 1.2;
    margin-bottom: 32px;
}}

.subhead {{
    font-size: 32px;
    font-weight: 400;
    color: {text_secondary};
    line-height: 1.4;
}}

.section-label {{
    font-size: 14px;
    font-weight: 600;
    text-transform: uppercase;
    letter-spacing: 2px;
    color: {accent};
    margin-bottom: 16px;
}}

.accent-bar {{
    width: 80px;
    height: 4px;
    border-radius: 2px;
    margin: 0 auto 32px;
}}

.center {{
    text-align: center;
    align-items: center;
}}

.statement {{
    font-size: 44px;
    font-weight: 500;
    line-height: 1.3;
    max-width: 1100px;
}}

.points, .numbered {{
    list-style: none;
    display: flex;
    flex-direction: column;
    gap: 20px;
}}

.points li {{
    font-size: 28px;
    line-height: 1.4;
    padding-left: 32px;
    position: relative;
}}

.points li::before {{
    content: "";
    position: absolute;
    left: 0;
    top: 14px;
    width: 12px;
    height: 12px;
    border-radius: 50%;
    background: {accent};
}}

.numbered li {{
    font-size: 28px;
    line-height: 1.4;
    display: flex;
    align-items: baseline;
    gap: 20px;
}}

.step-number {{
    font-size: 20px;
    font-weight: 700;
    color: {accent};
    min-width: 40px;
}}

.thirds {{
    display: grid;
    grid-template-columns: repeat(3, 1fr);
    gap: 40px;
    margin-top: 40px;
}}

.card {{
    background: {card_bg};
    border: 1px solid {border};
    border-radius: 16px;
    padding: 32px;
}}

.card-title {{
    font-size: 20px;
    font-weight: 600;
    margin-bottom: 12px;
    color: {accent};
}}

.card-text {{
    font-size: 16px;
    color: {text_secondary};
    line-height: 1.5;
}}

.data-table {{
    width: 100%;
    border-collapse: collapse;
    font-size: 22px;
}}

.data-table th {{
    text-align: left;
    color: {accent};
    font-weight: 600;
    padding: 16px 20px;
    border-bottom: 2px solid {border};
}}

.data-table td {{
    padding: 14px 20px;
    border-bottom: 1px solid {border};
    color: {text_secondary};
}}

.code-block {{
    background: {card_bg};
    border: 1px solid {border};
    border-radius: 12px;
    padding: 24px 32px;
    font-family: {code_font};
    font-size: 18px;
    line-height: 1.6;
    color: #98D4A0;
    margin: 20px 0;
    overflow-x: auto;
    white-space: pre;
}}

.code-language {{
    font-family: {code_font};
    font-size: 14px;
    color: {text_secondary};
}}

.arch-description {{
    font-size: 24px;
    color: {text_secondary};
    line-height: 1.5;
    margin-bottom: 40px;
    max-width: 1100px;
}}

.arch-flow {{
    display: flex;
    align-items: center;
    gap: 16px;
    flex-wrap: wrap;
}}

.arch-node {{
    background: {card_bg};
    border: 1px solid {border};
    border-radius: 12px;
    padding: 20px 28px;
    font-size: 20px;
}}

.arch-arrow {{
    font-size: 28px;
}}

.stat-grid {{
    display: grid;
    grid-template-columns: repeat(3, 1fr);
    gap: 40px;
    margin-top: 40px;
}}

.stat-number {{
    font-size: 64px;
    font-weight: 700;
    color: {accent};
    margin-bottom: 8px;
}}

.stat-label {{
    font-size: 18px;
    color: {text_secondary};
}}

.cta-button {{
    display: inline-block;
    padding: 16px 48px;
    background: {accent};
    color: #fff;
    text-decoration: none;
    border-radius: 8px;
    font-size: 20px;
    font-weight: 600;
    margin-top: 40px;
    transition: transform 0.2s ease;
}}

.cta-button:hover {{
    transform: scale(1.05);
}}

.nav {{
    position: fixed;
    bottom: 30px;
    left: 50%;
    transform: translateX(-50%);
    display: flex;
    gap: 8px;
    z-index: 100;
}}

.nav-dot {{
    width: 8px;
    height: 8px;
    border: none;
    border-radius: 50%;
    background: rgba(255,255,255,0.3);
    cursor: pointer;
    transition: all 0.3s ease;
}}

.nav-dot.active {{
    background: {accent};
    width: 24px;
    border-radius: 4px;
}}

.slide-counter {{
    position: fixed;
    bottom: 30px;
    right: 40px;
    font-size: 14px;
    color: rgba(255,255,255,0.4);
}}
"#,
        primary_font = typography.primary_font(),
        code_font = typography.code_font(),
        headline_size = typography.headline_size(),
        headline_weight = typography.headline_weight(),
        background = colors.background(),
        text_primary = colors.text_primary(),
        text_secondary = colors.text_secondary(),
        accent = colors.accent(),
        card_bg = colors.card_bg(),
        border = colors.border(),
    )
}

fn text<'a>(slide: &'a MappedSlide, field: &str, default: &'a str) -> &'a str {
    slide.text(field).unwrap_or(default)
}

fn string_list<'a>(slide: &'a MappedSlide, field: &str) -> Vec<&'a str> {
    slide
        .content
        .get(field)
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default()
}

fn object_list<'a>(slide: &'a MappedSlide, field: &str) -> Vec<&'a Value> {
    slide
        .content
        .get(field)
        .and_then(Value::as_array)
        .map(|items| items.iter().filter(|item| item.is_object()).collect())
        .unwrap_or_default()
}

fn object_text<'a>(item: &'a Value, field: &str) -> &'a str {
    item.get(field).and_then(Value::as_str).unwrap_or("")
}

fn headline(html: &mut String, class: &str, title: &str) {
    html.push_str(&format!(
        "<h2 class=\"{}\">{}</h2>\n",
        class,
        escape_html(title)
    ));
}

fn render_title_center(slide: &MappedSlide, html: &mut String) {
    let accent = text(slide, "accent_color", DEFAULT_ACCENT);
    html.push_str(&format!(
        "<div class=\"accent-bar\" style=\"background: {}\"></div>\n",
        escape_html(accent)
    ));
    html.push_str(&format!(
        "<h1 class=\"headline\">{}</h1>\n",
        escape_html(text(slide, "title", "Presentation"))
    ));
    let subtitle = text(slide, "subtitle", "");
    if !subtitle.is_empty() {
        html.push_str(&format!(
            "<p class=\"subhead\">{}</p>\n",
            escape_html(subtitle)
        ));
    }
}

fn render_statement(slide: &MappedSlide, html: &mut String) {
    let label = text(slide, "label", "");
    if !label.is_empty() {
        html.push_str(&format!(
            "<div class=\"section-label\">{}</div>\n",
            escape_html(label)
        ));
    }
    html.push_str(&format!(
        "<p class=\"statement\">{}</p>\n",
        escape_html(text(slide, "statement", ""))
    ));
}

fn render_bullet_points(slide: &MappedSlide, html: &mut String) {
    headline(html, "title", text(slide, "title", "Key Points"));
    html.push_str("<ul class=\"points\">\n");
    for point in string_list(slide, "points") {
        html.push_str(&format!("<li>{}</li>\n", escape_html(point)));
    }
    html.push_str("</ul>\n");
}

fn render_numbered_list(slide: &MappedSlide, html: &mut String) {
    headline(html, "title", text(slide, "title", "Next Steps"));
    html.push_str("<ol class=\"numbered\">\n");
    for (idx, item) in string_list(slide, "items").into_iter().enumerate() {
        html.push_str(&format!(
            "<li><span class=\"step-number\">{:02}</span><span>{}</span></li>\n",
            idx + 1,
            escape_html(item)
        ));
    }
    html.push_str("</ol>\n");
}

fn render_grid_thirds(slide: &MappedSlide, html: &mut String) {
    headline(html, "title", text(slide, "title", "Overview"));
    html.push_str("<div class=\"thirds\">\n");
    for card in object_list(slide, "items") {
        html.push_str("<div class=\"card\">\n");
        html.push_str(&format!(
            "<div class=\"card-title\">{}</div>\n",
            escape_html(object_text(card, "title"))
        ));
        let description = object_text(card, "description");
        if !description.is_empty() {
            html.push_str(&format!(
                "<div class=\"card-text\">{}</div>\n",
                escape_html(description)
            ));
        }
        html.push_str("</div>\n");
    }
    html.push_str("</div>\n");
}

fn render_table_slide(slide: &MappedSlide, html: &mut String) {
    headline(html, "title", text(slide, "title", "Data"));
    html.push_str("<table class=\"data-table\">\n<thead><tr>");
    for header in string_list(slide, "headers") {
        html.push_str(&format!("<th>{}</th>", escape_html(header)));
    }
    html.push_str("</tr></thead>\n<tbody>\n");
    let rows = slide
        .content
        .get("rows")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    for row in rows {
        html.push_str("<tr>");
        for cell in row.as_array().into_iter().flatten() {
            html.push_str(&format!(
                "<td>{}</td>",
                escape_html(cell.as_str().unwrap_or(""))
            ));
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</tbody>\n</table>\n");
}

fn render_code_example(slide: &MappedSlide, html: &mut String) {
    headline(html, "title", text(slide, "title", "Example"));
    let language = text(slide, "language", DEFAULT_CODE_LANGUAGE);
    html.push_str(&format!(
        "<div class=\"code-language\">{}</div>\n",
        escape_html(language)
    ));
    html.push_str(&format!(
        "<pre class=\"code-block\" data-language=\"{}\"><code>{}</code></pre>\n",
        escape_html(language),
        escape_html(text(slide, "code", ""))
    ));
}

fn render_architecture(slide: &MappedSlide, html: &mut String) {
    let accent = text(slide, "accent_color", DEFAULT_ACCENT);
    headline(html, "title", text(slide, "title", "Architecture"));
    let description = text(slide, "description", "");
    if !description.is_empty() {
        html.push_str(&format!(
            "<p class=\"arch-description\">{}</p>\n",
            escape_html(description)
        ));
    }
    let components = string_list(slide, "components");
    if components.is_empty() {
        return;
    }
    html.push_str("<div class=\"arch-flow\">\n");
    for (idx, component) in components.into_iter().enumerate() {
        if idx > 0 {
            html.push_str(&format!(
                "<span class=\"arch-arrow\" style=\"color: {}\">&rarr;</span>\n",
                escape_html(accent)
            ));
        }
        html.push_str(&format!(
            "<div class=\"arch-node\">{}</div>\n",
            escape_html(component)
        ));
    }
    html.push_str("</div>\n");
}

fn render_stat_grid(slide: &MappedSlide, html: &mut String) {
    let accent = text(slide, "accent_color", DEFAULT_ACCENT);
    headline(html, "title", text(slide, "title", "By the Numbers"));
    html.push_str("<div class=\"stat-grid\">\n");
    for stat in object_list(slide, "stats") {
        html.push_str(&format!(
            "<div class=\"stat\"><div class=\"stat-number\" style=\"color: {}\">{}</div><div class=\"stat-label\">{}</div></div>\n",
            escape_html(accent),
            escape_html(object_text(stat, "number")),
            escape_html(object_text(stat, "label"))
        ));
    }
    html.push_str("</div>\n");
}

fn render_cta_final(slide: &MappedSlide, html: &mut String) {
    let accent = text(slide, "accent_color", DEFAULT_ACCENT);
    html.push_str(&format!(
        "<h1 class=\"headline\">{}</h1>\n",
        escape_html(text(slide, "title", "Thank You"))
    ));
    html.push_str(&format!(
        "<p class=\"subhead\">{}</p>\n",
        escape_html(text(slide, "subtitle", "Questions?"))
    ));
    html.push_str(&format!(
        "<div class=\"accent-bar\" style=\"background: {}; margin-top: 40px\"></div>\n",
        escape_html(accent)
    ));
}

/// Render one slide wrapper and its layout body.
pub fn render_slide(slide: &MappedSlide, index: usize, is_first: bool) -> String {
    let mut classes = vec!["slide"];
    if matches!(slide.layout, Layout::TitleCenter | Layout::CtaFinal | Layout::Statement) {
        classes.push("center");
    }
    if slide.background_image.is_some() {
        classes.push("has-background");
    }
    if is_first {
        classes.push("active");
    }

    let style = match &slide.background_image {
        Some(image) => format!(
            " style=\"background-image: linear-gradient(rgba(0,0,0,0.45), rgba(0,0,0,0.45)), url('{}')\"",
            escape_html(&image.to_data_uri())
        ),
        None => String::new(),
    };

    let mut html = format!(
        "<div class=\"{}\" data-index=\"{}\" data-layout=\"{}\"{}>\n",
        classes.join(" "),
        index,
        slide.layout,
        style
    );

    match slide.layout {
        Layout::TitleCenter => render_title_center(slide, &mut html),
        Layout::Statement => render_statement(slide, &mut html),
        Layout::BulletPoints => render_bullet_points(slide, &mut html),
        Layout::NumberedList => render_numbered_list(slide, &mut html),
        Layout::GridThirds => render_grid_thirds(slide, &mut html),
        Layout::TableSlide => render_table_slide(slide, &mut html),
        Layout::CodeExample => render_code_example(slide, &mut html),
        Layout::Architecture => render_architecture(slide, &mut html),
        Layout::StatGrid => render_stat_grid(slide, &mut html),
        Layout::CtaFinal => render_cta_final(slide, &mut html),
    }

    html.push_str("</div>\n");
    html
}

fn render_navigation(slide_count: usize) -> String {
    let mut html = String::from("<nav class=\"nav\" id=\"nav\">\n");
    for idx in 0..slide_count {
        html.push_str(&format!(
            "<button class=\"nav-dot{}\" data-slide=\"{}\" aria-label=\"Go to slide {}\"></button>\n",
            if idx == 0 { " active" } else { "" },
            idx,
            idx + 1
        ));
    }
    html.push_str("</nav>\n");
    html.push_str(&format!(
        "<div class=\"slide-counter\" id=\"slide-counter\">{} / {}</div>\n",
        slide_count.min(1),
        slide_count
    ));
    html
}

/// Render the full HTML document for a deck
pub fn render(slides: &[MappedSlide], theme: &ThemeConfig, title: &str) -> String {
    let title = if title.trim().is_empty() {
        "Presentation".to_string()
    } else {
        truncate_with_ellipsis(title.trim(), MAX_DOCUMENT_TITLE_CHARS)
    };

    let mut html_doc = String::from("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html_doc.push_str("<meta charset=\"UTF-8\">\n");
    html_doc.push_str(
        "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
    );
    html_doc.push_str(&format!("<title>{}</title>\n", escape_html(&title)));
    html_doc.push_str(&format!(
        "<meta name=\"deckgen-theme\" content=\"{}\">\n",
        escape_html(&theme.name)
    ));
    html_doc.push_str(&format!("<style>{}</style>\n", generate_css(theme)));
    html_doc.push_str("</head>\n<body>\n");

    for (idx, slide) in slides.iter().enumerate() {
        html_doc.push_str(&render_slide(slide, idx, idx == 0));
    }

    html_doc.push_str(&render_navigation(slides.len()));
    html_doc.push_str(&format!(
        "<script>\nconst TOTAL_SLIDES = {};\n{}</script>\n",
        slides.len(),
        NAVIGATION_JS
    ));
    html_doc.push_str("</body>\n</html>\n");

    html_doc
}

/// Utility function to write HTML content to a file
pub fn write_html_to_file(html_content: &str, output_path: &Path) -> Result<()> {
    info!("Writing HTML to file: {:?}", output_path);

    // Ensure parent directory exists
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(DeckError::FileReadError)?;
        }
    }

    fs::write(output_path, html_content).map_err(DeckError::FileReadError)?;

    Ok(())
}
