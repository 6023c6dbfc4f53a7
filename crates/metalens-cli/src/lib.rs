//! Terminal rendering for metalens reports
//!
//! Kept out of `main.rs` so the formatting can be tested without running the
//! binary.

use std::fmt::Write as FmtWrite;

use metalens_core::preview::{CardPreview, SocialPreviews};
use metalens_core::recommendations::by_category;
use metalens_core::scoring::summarize_group;
use metalens_core::{
    AnalysisResult, Recommendation, RecommendationCategory, StoredAnalysis, Tag, TagStatus,
    score_label,
};

const DIVIDER: &str = "─────────────────────────────────────────────────────────────";
const LABEL_WIDTH: usize = 16;

/// Full text report for one analysis
pub fn render_report(result: &AnalysisResult, include_previews: bool) -> String {
    let mut output = String::new();

    let _ = writeln!(&mut output, "{DIVIDER}");
    let _ = writeln!(&mut output, "# {}", display_or(&result.title, "(untitled page)"));
    let _ = writeln!(&mut output, "{DIVIDER}\n");
    if !result.description.is_empty() {
        let _ = writeln!(&mut output, "> {}\n", result.description);
    }
    push_key_value(&mut output, "URL", &result.url);
    push_key_value(&mut output, "Domain", &result.domain);
    let _ = writeln!(&mut output);

    render_score(&mut output, result);
    render_tag_group(&mut output, "🏷️", "Essential Meta Tags", &result.meta_tags);
    render_tag_group(&mut output, "🌐", "Open Graph Tags", &result.open_graph_tags);
    render_tag_group(&mut output, "🐦", "Twitter Card Tags", &result.twitter_card_tags);
    render_recommendations(&mut output, &result.recommendations);

    if include_previews {
        render_previews(&mut output, &SocialPreviews::from_result(result));
    }

    output
}

/// Listing of stored analyses, newest first
pub fn render_recent(records: &[StoredAnalysis]) -> String {
    let mut output = String::new();
    push_section_header(&mut output, "🕘", "Recent Analyses");

    if records.is_empty() {
        let _ = writeln!(&mut output, "No analyses stored yet.");
        return output;
    }

    for record in records {
        let _ = writeln!(
            &mut output,
            "#{:<4} {:>3}%  {:<24} {}  ({})",
            record.id,
            record.result.score,
            record.result.domain,
            record.result.url,
            record.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
        );
    }
    output
}

fn render_score(buf: &mut String, result: &AnalysisResult) {
    push_section_header(buf, "📊", "SEO Health Score");
    push_key_value(
        buf,
        "Score",
        &format!("{}% ({})", result.score, score_label(result.score)),
    );
    push_key_value(buf, "Good", &result.score_category.good.to_string());
    push_key_value(
        buf,
        "Improvements",
        &result.score_category.improvements.to_string(),
    );
    push_key_value(buf, "Issues", &result.score_category.issues.to_string());
    let _ = writeln!(buf);
}

fn render_tag_group(buf: &mut String, icon: &str, title: &str, tags: &[Tag]) {
    let summary = summarize_group(tags);
    push_section_header(
        buf,
        icon,
        &format!(
            "{title} ({}/{}, {}%)",
            summary.present, summary.total, summary.percentage
        ),
    );

    let name_width = tags
        .iter()
        .map(|tag| tag.name.chars().count())
        .max()
        .unwrap_or(0)
        .max(4);

    for tag in tags {
        let content = if tag.content.is_empty() {
            "–".to_string()
        } else {
            truncate(&tag.content, 60)
        };
        let _ = writeln!(
            buf,
            "{} {:<width$}  {}",
            status_icon(tag.status),
            tag.name,
            content,
            width = name_width
        );
    }
    let _ = writeln!(buf);
}

fn render_recommendations(buf: &mut String, recommendations: &[Recommendation]) {
    let groups = [
        ("🚨", "Critical Issues", RecommendationCategory::Critical),
        ("🛠️", "Improvements", RecommendationCategory::Improvement),
        ("✅", "Good Practices", RecommendationCategory::Good),
    ];

    for (icon, title, category) in groups {
        let items = by_category(recommendations, category);
        if items.is_empty() {
            continue;
        }

        push_section_header(buf, icon, &format!("{title} ({})", items.len()));
        for rec in items {
            let _ = writeln!(buf, "• {} [{} impact]", rec.title, rec.impact.as_str());
            let _ = writeln!(buf, "  {}", rec.description);
            if let Some(solution) = rec.solution.as_deref() {
                let _ = writeln!(buf, "  → {solution}");
            }
            if let Some(code) = rec.code.as_deref() {
                let _ = writeln!(buf, "    {code}");
            }
        }
        let _ = writeln!(buf);
    }
}

fn render_previews(buf: &mut String, previews: &SocialPreviews) {
    push_section_header(buf, "🔎", "Google SERP Preview");
    let _ = writeln!(buf, "{}", previews.google.title);
    let _ = writeln!(buf, "{}", previews.google.url);
    let _ = writeln!(buf, "{}\n", previews.google.description);

    render_card(buf, "🐦", "Twitter Card Preview", &previews.twitter);
    render_card(buf, "📘", "Facebook Preview", &previews.facebook);
}

fn render_card(buf: &mut String, icon: &str, title: &str, card: &CardPreview) {
    push_section_header(buf, icon, title);
    let image = if card.default_image {
        format!("{} (placeholder)", card.image_url)
    } else {
        card.image_url.clone()
    };
    push_key_value(buf, "Image", &image);
    push_key_value(buf, "Domain", &card.domain);
    push_key_value(buf, "Title", &card.title);
    push_key_value(buf, "Description", &card.description);
    let _ = writeln!(buf);
}

fn push_section_header(buf: &mut String, icon: &str, title: &str) {
    let _ = writeln!(buf, "{DIVIDER}");
    let _ = writeln!(buf, "{icon} {title}");
    let _ = writeln!(buf, "{DIVIDER}");
}

fn push_key_value(buf: &mut String, label: &str, value: &str) {
    if value.is_empty() {
        return;
    }
    let _ = writeln!(buf, "• {:<width$} : {}", label, value, width = LABEL_WIDTH);
}

fn status_icon(status: TagStatus) -> &'static str {
    match status {
        TagStatus::Present => "✅",
        TagStatus::Warning => "⚠️",
        TagStatus::Missing => "❌",
    }
}

fn display_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() { fallback } else { value }
}

fn truncate(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        return value.to_string();
    }
    let mut shortened: String = value.chars().take(max_chars - 1).collect();
    shortened.push('…');
    shortened
}
