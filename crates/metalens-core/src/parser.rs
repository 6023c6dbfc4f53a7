//! HTML parsing and meta tag extraction
//!
//! Extraction never fails: anything the document does not declare comes back
//! as a `missing` tag so the scorer and the recommendation rules always see
//! the same shape.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::types::{ExtractedTags, Tag};

/// Open Graph properties every page is expected to declare
pub const REQUIRED_OPEN_GRAPH: [&str; 4] = ["og:title", "og:description", "og:image", "og:url"];

/// Twitter Card names every page is expected to declare
pub const REQUIRED_TWITTER: [&str; 3] = ["twitter:card", "twitter:title", "twitter:description"];

struct Selectors {
    title: Selector,
    description: Selector,
    viewport: Selector,
    charset: Selector,
    canonical: Selector,
    open_graph: Selector,
    twitter: Selector,
}

static SELECTORS: Lazy<Selectors> = Lazy::new(|| {
    let parse = |css: &str| Selector::parse(css).expect("invalid static selector");
    Selectors {
        title: parse("title"),
        description: parse(r#"meta[name="description"]"#),
        viewport: parse(r#"meta[name="viewport"]"#),
        charset: parse("meta[charset]"),
        canonical: parse(r#"link[rel="canonical"]"#),
        open_graph: parse(r#"meta[property^="og:"]"#),
        twitter: parse(r#"meta[name^="twitter:"]"#),
    }
});

static RE_WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("invalid whitespace regex"));

/// Extract the essential, Open Graph and Twitter Card tags from an HTML document
pub fn extract_tags(html: &str) -> ExtractedTags {
    let document = Html::parse_document(html);
    let selectors = &*SELECTORS;

    let title = document
        .select(&selectors.title)
        .next()
        .map(|element| collapse_whitespace(&element.text().collect::<String>()))
        .unwrap_or_default();

    let essential = vec![
        Tag::new("title", title),
        Tag::new("description", first_attr(&document, &selectors.description, "content")),
        Tag::new("viewport", first_attr(&document, &selectors.viewport, "content")),
        Tag::new("charset", first_attr(&document, &selectors.charset, "charset")),
        Tag::new("canonical", first_attr(&document, &selectors.canonical, "href")),
    ];

    let mut open_graph = collect_named(&document, &selectors.open_graph, "property");
    backfill(&mut open_graph, &REQUIRED_OPEN_GRAPH);

    let mut twitter = collect_named(&document, &selectors.twitter, "name");
    backfill(&mut twitter, &REQUIRED_TWITTER);

    ExtractedTags {
        essential,
        open_graph,
        twitter,
    }
}

/// Append a missing placeholder for every required name the list lacks
///
/// Existing tags, including ones outside the required set, keep their place.
pub fn backfill(tags: &mut Vec<Tag>, required: &[&str]) {
    for name in required {
        if !tags.iter().any(|tag| tag.name == *name) {
            tags.push(Tag::missing(*name));
        }
    }
}

/// Trimmed attribute of the first match; whitespace-only values count as missing
fn first_attr(document: &Html, selector: &Selector, attr: &str) -> String {
    document
        .select(selector)
        .next()
        .and_then(|element| element.value().attr(attr))
        .map(|value| value.trim().to_string())
        .unwrap_or_default()
}

fn collect_named(document: &Html, selector: &Selector, name_attr: &str) -> Vec<Tag> {
    document
        .select(selector)
        .map(|element| named_tag(element, name_attr))
        .collect()
}

/// Trimmed like [`first_attr`], so `content="   "` yields a missing tag
fn named_tag(element: ElementRef<'_>, name_attr: &str) -> Tag {
    let value = element.value();
    let name = value.attr(name_attr).unwrap_or_default().trim();
    let content = value.attr("content").unwrap_or_default().trim();
    Tag::new(name, content)
}

fn collapse_whitespace(text: &str) -> String {
    RE_WHITESPACE.replace_all(text.trim(), " ").into_owned()
}
