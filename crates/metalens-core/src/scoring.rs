//! SEO health score
//!
//! The score is the share of present tags across all three groups. The
//! good/improvements/issues split is a separate 70/30 heuristic over the
//! missing tags and does not track the recommendation categories.

use serde::{Deserialize, Serialize};

use crate::types::{ScoreCategory, Tag, TagStatus};

/// Share of missing tags counted as "improvements"; the rest are "issues"
const IMPROVEMENT_SHARE: f64 = 0.7;

/// Score plus category breakdown for one analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreCard {
    pub score: u8,
    pub category: ScoreCategory,
}

/// Score the three tag groups
pub fn score_tags(essential: &[Tag], open_graph: &[Tag], twitter: &[Tag]) -> ScoreCard {
    let total = essential.len() + open_graph.len() + twitter.len();
    let present = count_present(essential) + count_present(open_graph) + count_present(twitter);

    let missing = total - present;
    let improvements = (missing as f64 * IMPROVEMENT_SHARE).floor() as usize;
    let issues = missing - improvements;

    ScoreCard {
        score: percentage(present, total),
        category: ScoreCategory {
            good: present as u32,
            improvements: improvements as u32,
            issues: issues as u32,
        },
    }
}

/// Human label shown next to the numeric score
pub fn score_label(score: u8) -> &'static str {
    match score {
        80..=u8::MAX => "Excellent",
        70..=79 => "Good",
        50..=69 => "Average",
        30..=49 => "Poor",
        _ => "Critical",
    }
}

/// Overall state of one tag group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupHealth {
    /// Every tag is present
    Success,
    /// Nothing missing, but some tags need review
    Warning,
    /// At least one tag is missing
    Error,
}

/// Per-group numbers for the tag summary cards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub present: usize,
    pub total: usize,
    pub percentage: u8,
    pub health: GroupHealth,
}

pub fn summarize_group(tags: &[Tag]) -> GroupSummary {
    let present = count_present(tags);
    let total = tags.len();

    let health = if tags.iter().all(Tag::is_present) {
        GroupHealth::Success
    } else if tags.iter().any(|tag| tag.status == TagStatus::Missing) {
        GroupHealth::Error
    } else {
        GroupHealth::Warning
    };

    GroupSummary {
        present,
        total,
        percentage: percentage(present, total),
        health,
    }
}

fn count_present(tags: &[Tag]) -> usize {
    tags.iter().filter(|tag| tag.is_present()).count()
}

/// `round(part / total * 100)` with halves rounded up, 0 for an empty total
fn percentage(part: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let scaled = (part.min(total) * 200 + total) / (2 * total);
    scaled as u8
}
