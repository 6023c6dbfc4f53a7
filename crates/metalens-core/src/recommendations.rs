//! Rule-based SEO recommendations
//!
//! Every rule looks at the extracted tags on its own and contributes at most
//! one recommendation. Output order is rule order; grouping for display is a
//! filter over that order.

use crate::types::{ExtractedTags, Impact, Recommendation, RecommendationCategory};

/// Recommended title length in characters (inclusive)
pub const TITLE_LENGTH: (usize, usize) = (30, 60);

/// Recommended meta description length in characters (inclusive)
pub const DESCRIPTION_LENGTH: (usize, usize) = (150, 160);

/// Inputs the rules read besides the tag lists
struct RuleContext<'a> {
    tags: &'a ExtractedTags,
    page_url: &'a str,
    title: &'a str,
    description: &'a str,
    viewport: &'a str,
    charset: &'a str,
    canonical: &'a str,
}

type Rule = fn(&RuleContext<'_>) -> Option<Recommendation>;

const RULES: &[Rule] = &[
    missing_title,
    missing_twitter_title,
    missing_canonical,
    missing_description,
    missing_og_url,
    missing_og_image,
    title_length,
    description_length_off,
    missing_viewport,
    viewport_present,
    description_length_ideal,
    charset_present,
    missing_charset,
];

/// Run every rule against the extracted tags of the page at `page_url`
pub fn generate_recommendations(tags: &ExtractedTags, page_url: &str) -> Vec<Recommendation> {
    let ctx = RuleContext {
        tags,
        page_url,
        title: tags.essential_value("title"),
        description: tags.essential_value("description"),
        viewport: tags.essential_value("viewport"),
        charset: tags.essential_value("charset"),
        canonical: tags.essential_value("canonical"),
    };

    RULES.iter().filter_map(|rule| rule(&ctx)).collect()
}

/// Recommendations of one category, in emission order
pub fn by_category(
    recommendations: &[Recommendation],
    category: RecommendationCategory,
) -> Vec<&Recommendation> {
    recommendations
        .iter()
        .filter(|rec| rec.category == category)
        .collect()
}

fn missing_title(ctx: &RuleContext<'_>) -> Option<Recommendation> {
    if !ctx.title.is_empty() {
        return None;
    }
    Some(Recommendation {
        title: "Missing Title Tag".to_string(),
        description: "Add a title element. Search engines show it as the headline of your result."
            .to_string(),
        impact: Impact::High,
        category: RecommendationCategory::Critical,
        solution: Some("Add a descriptive title of 50-60 characters".to_string()),
        code: Some("<title>Your page title</title>".to_string()),
    })
}

fn missing_twitter_title(ctx: &RuleContext<'_>) -> Option<Recommendation> {
    if ctx.tags.twitter_present("twitter:title") {
        return None;
    }
    Some(Recommendation {
        title: "Missing Twitter Card Title".to_string(),
        description: "Add twitter:title meta tag to improve sharing appearance on Twitter."
            .to_string(),
        impact: Impact::High,
        category: RecommendationCategory::Critical,
        solution: Some("Add a twitter:title meta tag with your page title".to_string()),
        code: Some(format!(
            r#"<meta name="twitter:title" content="{}">"#,
            escape_html_attr(ctx.title)
        )),
    })
}

fn missing_canonical(ctx: &RuleContext<'_>) -> Option<Recommendation> {
    if !ctx.canonical.is_empty() {
        return None;
    }
    Some(Recommendation {
        title: "Canonical URL Not Defined".to_string(),
        description: "Add a canonical link element to specify the preferred URL to prevent duplicate content issues.".to_string(),
        impact: Impact::High,
        category: RecommendationCategory::Critical,
        solution: Some("Add a canonical link to your page".to_string()),
        code: Some(format!(
            r#"<link rel="canonical" href="{}">"#,
            escape_html_attr(ctx.page_url)
        )),
    })
}

fn missing_description(ctx: &RuleContext<'_>) -> Option<Recommendation> {
    if !ctx.description.is_empty() {
        return None;
    }
    Some(Recommendation {
        title: "Missing Meta Description".to_string(),
        description: "Add a meta description. Search engines use it as the snippet below your title.".to_string(),
        impact: Impact::High,
        category: RecommendationCategory::Critical,
        solution: Some("Write a 150-160 character summary of the page".to_string()),
        code: Some(r#"<meta name="description" content="A short summary of your page">"#.to_string()),
    })
}

fn missing_og_url(ctx: &RuleContext<'_>) -> Option<Recommendation> {
    if ctx.tags.open_graph_present("og:url") {
        return None;
    }
    Some(Recommendation {
        title: "Missing Open Graph URL".to_string(),
        description: "Add the og:url property to ensure correct linking when shared on social media.".to_string(),
        impact: Impact::Medium,
        category: RecommendationCategory::Improvement,
        solution: Some("Add an og:url meta tag with your page URL".to_string()),
        code: Some(format!(
            r#"<meta property="og:url" content="{}">"#,
            escape_html_attr(ctx.page_url)
        )),
    })
}

fn missing_og_image(ctx: &RuleContext<'_>) -> Option<Recommendation> {
    if ctx.tags.open_graph_present("og:image") {
        return None;
    }
    Some(Recommendation {
        title: "Missing Open Graph Image".to_string(),
        description: "Add the og:image property so shared links show a preview image.".to_string(),
        impact: Impact::Medium,
        category: RecommendationCategory::Improvement,
        solution: Some("Add an og:image meta tag pointing to a 1200x630 image".to_string()),
        code: Some(r#"<meta property="og:image" content="https://example.com/preview.png">"#.to_string()),
    })
}

fn title_length(ctx: &RuleContext<'_>) -> Option<Recommendation> {
    let length = char_count(ctx.title);
    let (min, max) = TITLE_LENGTH;
    if length == 0 || (min..=max).contains(&length) {
        return None;
    }
    let verdict = if length < min { "too short" } else { "too long" };
    Some(Recommendation {
        title: "Title Tag Length".to_string(),
        description: format!(
            "Your title tag is {length} characters, which is {verdict}. Aim for 50-60 characters."
        ),
        impact: Impact::Medium,
        category: RecommendationCategory::Improvement,
        solution: None,
        code: None,
    })
}

fn description_length_off(ctx: &RuleContext<'_>) -> Option<Recommendation> {
    let length = char_count(ctx.description);
    let (min, max) = DESCRIPTION_LENGTH;
    if length == 0 || (min..=max).contains(&length) {
        return None;
    }
    let verdict = if length < min { "too short" } else { "too long" };
    Some(Recommendation {
        title: "Meta Description Length".to_string(),
        description: format!(
            "Your meta description is {length} characters, which is {verdict}. Aim for {min}-{max} characters."
        ),
        impact: Impact::Medium,
        category: RecommendationCategory::Improvement,
        solution: None,
        code: None,
    })
}

fn missing_viewport(ctx: &RuleContext<'_>) -> Option<Recommendation> {
    if !ctx.viewport.is_empty() {
        return None;
    }
    Some(Recommendation {
        title: "Mobile Viewport Not Set".to_string(),
        description: "Add a viewport meta tag so the page scales correctly on mobile devices."
            .to_string(),
        impact: Impact::Medium,
        category: RecommendationCategory::Improvement,
        solution: Some("Add a responsive viewport meta tag".to_string()),
        code: Some(
            r#"<meta name="viewport" content="width=device-width, initial-scale=1">"#.to_string(),
        ),
    })
}

fn viewport_present(ctx: &RuleContext<'_>) -> Option<Recommendation> {
    if ctx.viewport.is_empty() {
        return None;
    }
    Some(Recommendation {
        title: "Mobile Viewport Set".to_string(),
        description: "Good job! Your page has the viewport meta tag properly configured for mobile devices.".to_string(),
        impact: Impact::Medium,
        category: RecommendationCategory::Good,
        solution: None,
        code: None,
    })
}

fn description_length_ideal(ctx: &RuleContext<'_>) -> Option<Recommendation> {
    let length = char_count(ctx.description);
    let (min, max) = DESCRIPTION_LENGTH;
    if !(min..=max).contains(&length) {
        return None;
    }
    Some(Recommendation {
        title: "Meta Description Length".to_string(),
        description: format!(
            "Your meta description is {length} characters, which is within the ideal range ({min}-{max} characters)."
        ),
        impact: Impact::High,
        category: RecommendationCategory::Good,
        solution: None,
        code: None,
    })
}

fn charset_present(ctx: &RuleContext<'_>) -> Option<Recommendation> {
    if ctx.charset.is_empty() {
        return None;
    }
    Some(Recommendation {
        title: "Character Encoding Specified".to_string(),
        description: format!(
            "{} character encoding is properly specified.",
            ctx.charset.to_ascii_uppercase()
        ),
        impact: Impact::Low,
        category: RecommendationCategory::Good,
        solution: None,
        code: None,
    })
}

fn missing_charset(ctx: &RuleContext<'_>) -> Option<Recommendation> {
    if !ctx.charset.is_empty() {
        return None;
    }
    Some(Recommendation {
        title: "Character Encoding Not Specified".to_string(),
        description: "Declare the character encoding so browsers render text correctly.".to_string(),
        impact: Impact::Low,
        category: RecommendationCategory::Improvement,
        solution: Some("Add a charset meta tag as the first element in the head".to_string()),
        code: Some(r#"<meta charset="utf-8">"#.to_string()),
    })
}

fn char_count(value: &str) -> usize {
    value.chars().count()
}

fn escape_html_attr(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
