//! Common types used across metalens

use serde::{Deserialize, Serialize};

/// Whether a tag was found on the page with a usable value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagStatus {
    Present,
    Missing,
    /// Accepted on the wire and handled by summaries, never produced by extraction
    Warning,
}

impl TagStatus {
    /// Status for an extracted value: present iff the content is non-empty
    pub fn from_content(content: &str) -> Self {
        if content.is_empty() {
            TagStatus::Missing
        } else {
            TagStatus::Present
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TagStatus::Present => "present",
            TagStatus::Missing => "missing",
            TagStatus::Warning => "warning",
        }
    }
}

/// A single meta tag as seen on the page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    pub content: String,
    pub status: TagStatus,
}

impl Tag {
    /// Build a tag whose status follows from its content
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        let content = content.into();
        let status = TagStatus::from_content(&content);
        Self {
            name: name.into(),
            content,
            status,
        }
    }

    /// Placeholder for a tag the page does not declare
    pub fn missing(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: String::new(),
            status: TagStatus::Missing,
        }
    }

    pub fn is_present(&self) -> bool {
        self.status == TagStatus::Present
    }
}

/// Summary buckets for the score widget
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreCategory {
    pub good: u32,
    pub improvements: u32,
    pub issues: u32,
}

impl ScoreCategory {
    pub fn total(&self) -> u32 {
        self.good + self.improvements + self.issues
    }
}

/// How much a recommendation matters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    High,
    Medium,
    Low,
}

impl Impact {
    pub fn as_str(&self) -> &'static str {
        match self {
            Impact::High => "high",
            Impact::Medium => "medium",
            Impact::Low => "low",
        }
    }
}

/// Display group of a recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationCategory {
    Critical,
    Improvement,
    Good,
}

impl RecommendationCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecommendationCategory::Critical => "critical",
            RecommendationCategory::Improvement => "improvement",
            RecommendationCategory::Good => "good",
        }
    }
}

/// A piece of advice produced by the recommendation rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub title: String,
    pub description: String,
    pub impact: Impact,
    pub category: RecommendationCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solution: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// Tags pulled out of a document, already backfilled
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedTags {
    /// title, description, viewport, charset, canonical (in that order)
    pub essential: Vec<Tag>,
    pub open_graph: Vec<Tag>,
    pub twitter: Vec<Tag>,
}

impl ExtractedTags {
    /// Content of the essential tag with the given name, empty if absent
    pub fn essential_value(&self, name: &str) -> &str {
        find_content(&self.essential, name)
    }

    pub fn open_graph_value(&self, name: &str) -> &str {
        find_content(&self.open_graph, name)
    }

    pub fn twitter_value(&self, name: &str) -> &str {
        find_content(&self.twitter, name)
    }

    pub fn twitter_present(&self, name: &str) -> bool {
        is_present(&self.twitter, name)
    }

    pub fn open_graph_present(&self, name: &str) -> bool {
        is_present(&self.open_graph, name)
    }
}

fn find_content<'a>(tags: &'a [Tag], name: &str) -> &'a str {
    tags.iter()
        .find(|tag| tag.name == name)
        .map(|tag| tag.content.as_str())
        .unwrap_or("")
}

fn is_present(tags: &[Tag], name: &str) -> bool {
    tags.iter().any(|tag| tag.name == name && tag.is_present())
}

/// Complete outcome of analyzing one page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub url: String,
    pub title: String,
    pub description: String,
    pub domain: String,
    pub score: u8,
    pub score_category: ScoreCategory,
    pub meta_tags: Vec<Tag>,
    pub open_graph_tags: Vec<Tag>,
    pub twitter_card_tags: Vec<Tag>,
    pub recommendations: Vec<Recommendation>,
    #[serde(default)]
    pub image_url: String,
}

impl AnalysisResult {
    pub fn total_tags(&self) -> usize {
        self.meta_tags.len() + self.open_graph_tags.len() + self.twitter_card_tags.len()
    }
}
