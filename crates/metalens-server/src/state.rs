use std::sync::Arc;

use metalens_core::{AnalysisStore, Analyzer};

use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub analyzer: Analyzer,
    pub store: Arc<dyn AnalysisStore>,
    pub config: Config,
}

impl AppState {
    /// Build state around a store; the analyzer appends to the same store
    pub fn new(store: Arc<dyn AnalysisStore>, config: Config) -> anyhow::Result<Self> {
        let analyzer = Analyzer::new(store.clone())?;
        Ok(Self {
            analyzer,
            store,
            config,
        })
    }
}
