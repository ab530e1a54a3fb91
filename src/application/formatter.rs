//! Output formatting for the site document.
//!
//! Supports multiple output formats: Markdown, JSON, and table view.

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Table};

use crate::application::validation::{
    AboutReport, BULLET_COUNT, BULLET_LEN, PARAGRAPH_COUNT, TITLE_LEN,
};
use crate::domain::SiteDocument;

/// Output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable Markdown format.
    #[default]
    Markdown,
    /// JSON format for programmatic use.
    Json,
    /// Compact table listing.
    Table,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "markdown" | "md" => Ok(Self::Markdown),
            "json" => Ok(Self::Json),
            "table" => Ok(Self::Table),
            _ => Err(format!("Unknown format: {s}. Use: markdown, json, table")),
        }
    }
}

/// Formats the document as Markdown, section by section.
pub fn format_document_markdown(doc: &SiteDocument) -> String {
    let mut out = String::new();

    let hero = &doc.hero;
    out.push_str(&format!(
        "# {} {}\n\n",
        hero.title_base,
        hero.flip_words.join(" / ")
    ));
    if let Some(logo) = &doc.logo_url {
        out.push_str(&format!("**Logo:** {}\n\n", image_label(logo)));
    }
    out.push_str(&format!("{}\n\n", hero.subtitle));
    for bullet in &hero.bullets {
        out.push_str(&format!("- {bullet}\n"));
    }
    out.push('\n');

    out.push_str("## Services\n\n");
    for service in &doc.services {
        out.push_str(&format!("### {}\n\n{}\n\n", service.title, service.desc));
    }

    let about = &doc.about;
    out.push_str(&format!("## {}\n\n", about.title));
    for paragraph in about.paragraphs() {
        out.push_str(&format!("{paragraph}\n\n"));
    }
    for bullet in &about.bullets {
        out.push_str(&format!("- {bullet}\n"));
    }
    if let Some(image) = &about.image_url {
        out.push_str(&format!("\n**Image:** {}\n", image_label(image)));
    }
    out.push('\n');

    out.push_str("## Testimonials\n\n");
    for testimonial in &doc.testimonials {
        out.push_str(&format!("> {}\n>\n", testimonial.quote));
        match &testimonial.role {
            Some(role) if !role.is_empty() => {
                out.push_str(&format!("> — {}, {}\n\n", testimonial.name, role));
            }
            _ => out.push_str(&format!("> — {}\n\n", testimonial.name)),
        }
    }

    out
}

/// Formats the document as indented JSON.
///
/// # Errors
/// Returns error if serialization fails.
pub fn format_document_json(doc: &SiteDocument) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(doc)
}

/// Formats a compact table of every list entry with its index, for use
/// with the indexed `edit` commands.
pub fn format_document_table(doc: &SiteDocument) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Section", "#", "Title / Name", "Text"]);

    for (i, bullet) in doc.hero.bullets.iter().enumerate() {
        table.add_row(vec!["hero bullet", &i.to_string(), "-", &truncate(bullet, 45)]);
    }
    for (i, bullet) in doc.about.bullets.iter().enumerate() {
        table.add_row(vec!["about bullet", &i.to_string(), "-", &truncate(bullet, 45)]);
    }
    for (i, service) in doc.services.iter().enumerate() {
        table.add_row(vec![
            "service",
            &i.to_string(),
            &truncate(&service.title, 25),
            &truncate(&service.desc, 45),
        ]);
    }
    for (i, testimonial) in doc.testimonials.iter().enumerate() {
        table.add_row(vec![
            "testimonial",
            &i.to_string(),
            &truncate(&testimonial.name, 25),
            &truncate(&testimonial.quote, 45),
        ]);
    }

    table.to_string()
}

/// Formats the about-section checks as pass/fail lines.
pub fn format_about_report(report: &AboutReport) -> String {
    let bullets = report
        .bullet_lengths
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");

    let lines = [
        (
            report.title_ok,
            format!(
                "Title length {} (expected {}-{})",
                report.title_len,
                TITLE_LEN.start(),
                TITLE_LEN.end()
            ),
        ),
        (
            report.paragraphs_ok,
            format!(
                "Paragraphs {} (expected {}-{})",
                report.paragraph_count,
                PARAGRAPH_COUNT.start(),
                PARAGRAPH_COUNT.end()
            ),
        ),
        (
            report.bullet_count_ok,
            format!(
                "Bullets {} (expected {}-{})",
                report.bullet_lengths.len(),
                BULLET_COUNT.start(),
                BULLET_COUNT.end()
            ),
        ),
        (
            report.bullet_lengths_ok,
            format!(
                "Bullet lengths [{bullets}] (each {}-{})",
                BULLET_LEN.start(),
                BULLET_LEN.end()
            ),
        ),
    ];

    let mut out = format!("{}\n", "📝 About section".bold());
    for (ok, text) in lines {
        let mark = if ok { "✓".green() } else { "✗".red() };
        out.push_str(&format!("  {mark} {text}\n"));
    }
    if report.all_ok() {
        out.push_str(&format!("  {}\n", "All recommendations met".green()));
    } else {
        out.push_str(&format!(
            "  {}\n",
            "Outside the recommended limits (saving is still allowed)".yellow()
        ));
    }
    out
}

/// Shortens embedded images so they don't flood the terminal.
fn image_label(reference: &str) -> String {
    if reference.starts_with("data:") {
        let mime = reference
            .trim_start_matches("data:")
            .split(';')
            .next()
            .unwrap_or("unknown");
        format!("[embedded {mime}, {} bytes]", reference.len())
    } else {
        reference.to_string()
    }
}

/// Truncates a string to max length (in chars) with ellipsis.
fn truncate(s: &str, max_len: usize) -> String {
    let s = s.lines().next().unwrap_or(s);
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}
