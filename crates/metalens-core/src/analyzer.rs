//! Result assembly and the end-to-end analyze pipeline

use url::Url;

use crate::parser::extract_tags;
use crate::recommendations::generate_recommendations;
use crate::scoring::score_tags;
use crate::types::{AnalysisResult, ExtractedTags};
use crate::url_utils::display_domain;

/// Build the analysis of `html` as served from `page_url`. No I/O.
pub fn assemble(html: &str, page_url: &Url) -> AnalysisResult {
    let tags = extract_tags(html);
    assemble_from_tags(tags, page_url)
}

/// Same as [`assemble`] for tags that were already extracted
pub fn assemble_from_tags(tags: ExtractedTags, page_url: &Url) -> AnalysisResult {
    let url = page_url.to_string();
    let card = score_tags(&tags.essential, &tags.open_graph, &tags.twitter);
    let recommendations = generate_recommendations(&tags, &url);

    let image_url = preferred_image(&tags).to_string();
    let title = tags.essential_value("title").to_string();
    let description = tags.essential_value("description").to_string();

    AnalysisResult {
        domain: display_domain(&url),
        url,
        title,
        description,
        score: card.score,
        score_category: card.category,
        meta_tags: tags.essential,
        open_graph_tags: tags.open_graph,
        twitter_card_tags: tags.twitter,
        recommendations,
        image_url,
    }
}

/// og:image, then twitter:image, else empty
fn preferred_image(tags: &ExtractedTags) -> &str {
    let og_image = tags.open_graph_value("og:image");
    if !og_image.is_empty() {
        return og_image;
    }
    tags.twitter_value("twitter:image")
}

#[cfg(feature = "fetch")]
pub use pipeline::Analyzer;

#[cfg(feature = "fetch")]
mod pipeline {
    use std::sync::Arc;

    use tracing::{error, info};

    use super::assemble;
    use crate::error::{AnalyzeError, FetchError};
    use crate::fetch::{FetchOptions, Fetcher};
    use crate::storage::{AnalysisStore, NewAnalysis};
    use crate::types::AnalysisResult;
    use crate::url_utils::normalize_target_url;

    /// Fetch, extract, score, recommend and persist one page at a time
    #[derive(Clone)]
    pub struct Analyzer {
        fetcher: Fetcher,
        store: Arc<dyn AnalysisStore>,
    }

    impl Analyzer {
        pub fn new(store: Arc<dyn AnalysisStore>) -> Result<Self, FetchError> {
            Self::with_options(store, &FetchOptions::default())
        }

        pub fn with_options(
            store: Arc<dyn AnalysisStore>,
            options: &FetchOptions,
        ) -> Result<Self, FetchError> {
            Ok(Self {
                fetcher: Fetcher::new(options)?,
                store,
            })
        }

        pub fn store(&self) -> &Arc<dyn AnalysisStore> {
            &self.store
        }

        /// Analyze the page at `raw_url` and append the result to the store
        ///
        /// Nothing is stored when the fetch fails.
        pub async fn analyze(&self, raw_url: &str) -> Result<AnalysisResult, AnalyzeError> {
            if raw_url.trim().is_empty() {
                return Err(AnalyzeError::InvalidInput("URL is required".to_string()));
            }
            let target = normalize_target_url(raw_url)
                .ok_or_else(|| AnalyzeError::InvalidInput(format!("Invalid URL: {raw_url}")))?;

            let page = self.fetcher.fetch(&target).await?;
            let result = assemble(&page.html, &page.final_url);

            self.store
                .append(NewAnalysis::now(result.clone()))
                .map_err(|err| {
                    error!(url = %result.url, error = %err, "failed to store analysis");
                    err
                })?;

            info!(
                url = %result.url,
                score = result.score,
                recommendations = result.recommendations.len(),
                "analysis complete"
            );
            Ok(result)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TagStatus;

    fn page() -> Url {
        Url::parse("https://www.example.com/page").unwrap()
    }

    #[test]
    fn test_assemble_title_only_page() {
        let result = assemble("<title>Short</title>", &page());

        assert_eq!(result.url, "https://www.example.com/page");
        assert_eq!(result.domain, "example.com");
        assert_eq!(result.title, "Short");
        assert_eq!(result.description, "");
        assert_eq!(result.meta_tags.len(), 5);
        assert_eq!(result.open_graph_tags.len(), 4);
        assert_eq!(result.twitter_card_tags.len(), 3);
        assert_eq!(result.score, 8);
        assert_eq!(result.score_category.total() as usize, result.total_tags());
        assert_eq!(result.image_url, "");
        assert!(
            result
                .open_graph_tags
                .iter()
                .all(|t| t.status == TagStatus::Missing)
        );
    }

    #[test]
    fn test_image_prefers_open_graph() {
        let html = r#"
            <meta property="og:image" content="https://example.com/og.png">
            <meta name="twitter:image" content="https://example.com/tw.png">
        "#;
        assert_eq!(assemble(html, &page()).image_url, "https://example.com/og.png");
    }

    #[test]
    fn test_image_falls_back_to_twitter() {
        let html = r#"
            <meta property="og:image" content="">
            <meta name="twitter:image" content="https://example.com/tw.png">
        "#;
        assert_eq!(assemble(html, &page()).image_url, "https://example.com/tw.png");
    }

    #[test]
    fn test_serializes_with_wire_names() {
        let json = serde_json::to_value(assemble("<title>Short</title>", &page())).unwrap();

        assert_eq!(json["scoreCategory"]["good"], 1);
        assert_eq!(json["metaTags"][0]["name"], "title");
        assert_eq!(json["metaTags"][0]["status"], "present");
        assert_eq!(json["openGraphTags"][0]["status"], "missing");
        assert_eq!(json["twitterCardTags"].as_array().unwrap().len(), 3);
        assert_eq!(json["recommendations"][0]["category"], "critical");
        assert_eq!(json["recommendations"][0]["impact"], "high");
        assert_eq!(json["imageUrl"], "");
    }
}
