//! Social share preview mockups
//!
//! Builds the data behind the Google, Twitter and Facebook preview cards so
//! any front end (terminal report, web page) renders the same fallbacks.

use serde::Serialize;

use crate::types::AnalysisResult;

pub const NO_TITLE: &str = "No title available";
pub const NO_DESCRIPTION: &str = "No description available";

/// Shown when the page declares neither og:image nor twitter:image
pub const DEFAULT_PREVIEW_IMAGE: &str = "https://images.unsplash.com/photo-1498050108023-c5249f4df085?ixlib=rb-1.2.1&auto=format&fit=crop&w=600&h=315&q=80";

/// A Google search result snippet
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SerpPreview {
    pub title: String,
    pub url: String,
    pub description: String,
}

/// An image-topped share card
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardPreview {
    pub image_url: String,
    /// True when `image_url` is the placeholder
    pub default_image: bool,
    pub domain: String,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SocialPreviews {
    pub google: SerpPreview,
    pub twitter: CardPreview,
    pub facebook: CardPreview,
}

impl SocialPreviews {
    pub fn from_result(result: &AnalysisResult) -> Self {
        let title = or_fallback(&result.title, NO_TITLE);
        let description = or_fallback(&result.description, NO_DESCRIPTION);
        let default_image = result.image_url.is_empty();
        let image_url = or_fallback(&result.image_url, DEFAULT_PREVIEW_IMAGE);

        let twitter = CardPreview {
            image_url,
            default_image,
            domain: result.domain.clone(),
            title: title.clone(),
            description: description.clone(),
        };

        // Facebook shows the domain in capitals above the title
        let facebook = CardPreview {
            domain: result.domain.to_uppercase(),
            ..twitter.clone()
        };

        Self {
            google: SerpPreview {
                title,
                url: result.url.clone(),
                description,
            },
            twitter,
            facebook,
        }
    }
}

fn or_fallback(value: &str, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ScoreCategory;

    fn result(title: &str, description: &str, image_url: &str) -> AnalysisResult {
        AnalysisResult {
            url: "https://www.example.com/".to_string(),
            title: title.to_string(),
            description: description.to_string(),
            domain: "example.com".to_string(),
            score: 0,
            score_category: ScoreCategory::default(),
            meta_tags: Vec::new(),
            open_graph_tags: Vec::new(),
            twitter_card_tags: Vec::new(),
            recommendations: Vec::new(),
            image_url: image_url.to_string(),
        }
    }

    #[test]
    fn test_previews_use_page_values() {
        let previews = SocialPreviews::from_result(&result(
            "Example",
            "An example page",
            "https://example.com/og.png",
        ));

        assert_eq!(previews.google.title, "Example");
        assert_eq!(previews.google.url, "https://www.example.com/");
        assert_eq!(previews.twitter.image_url, "https://example.com/og.png");
        assert!(!previews.twitter.default_image);
        assert_eq!(previews.twitter.domain, "example.com");
        assert_eq!(previews.facebook.domain, "EXAMPLE.COM");
        assert_eq!(previews.facebook.description, "An example page");
    }

    #[test]
    fn test_previews_fall_back() {
        let previews = SocialPreviews::from_result(&result("", "", ""));

        assert_eq!(previews.google.title, NO_TITLE);
        assert_eq!(previews.google.description, NO_DESCRIPTION);
        assert_eq!(previews.twitter.image_url, DEFAULT_PREVIEW_IMAGE);
        assert!(previews.twitter.default_image);
        assert!(previews.facebook.default_image);
    }
}
