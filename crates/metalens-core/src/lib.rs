//! # metalens-core
//!
//! Core library for auditing the SEO meta tags of a web page.
//!
//! This library provides:
//! - Extraction of essential, Open Graph and Twitter Card tags
//! - A 0-100 health score with a good/improvements/issues breakdown
//! - Rule-based recommendations with ready-to-paste snippets
//! - Social preview mockups and an append-only analysis store
//!
//! ## Features
//!
//! - `fetch` (default): fetch pages over HTTP and run the full [`Analyzer`] pipeline
//! - `sqlite`: SQLite-backed [`storage::SqliteStore`]
//!
//! ## Example
//!
//! ```
//! use metalens_core::analyzer::assemble;
//! use url::Url;
//!
//! let page = Url::parse("https://example.com/").unwrap();
//! let result = assemble("<title>Example Domain</title>", &page);
//!
//! assert_eq!(result.domain, "example.com");
//! assert!(result.score <= 100);
//! ```

pub mod analyzer;
pub mod error;
pub mod parser;
pub mod preview;
pub mod recommendations;
pub mod scoring;
pub mod storage;
pub mod types;
pub mod url_utils;

#[cfg(feature = "fetch")]
pub mod fetch;

// Re-export commonly used types
pub use types::{
    AnalysisResult, ExtractedTags, Impact, Recommendation, RecommendationCategory, ScoreCategory,
    Tag, TagStatus,
};

pub use analyzer::assemble;
pub use error::StorageError;
pub use parser::extract_tags;
pub use preview::SocialPreviews;
pub use recommendations::generate_recommendations;
pub use scoring::{score_label, score_tags};
pub use storage::{AnalysisStore, MemoryStore, NewAnalysis, StoredAnalysis};

#[cfg(feature = "fetch")]
pub use analyzer::Analyzer;

#[cfg(feature = "fetch")]
pub use error::{AnalyzeError, FetchError};

#[cfg(feature = "fetch")]
pub use fetch::{FetchOptions, Fetcher};

#[cfg(feature = "sqlite")]
pub use storage::SqliteStore;
