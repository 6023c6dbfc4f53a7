use axum::{
    Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
};
use chrono::{DateTime, Utc};
use metalens_core::{AnalysisResult, StoredAnalysis};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::state::AppState;

const DEFAULT_RECENT_LIMIT: usize = 5;

#[derive(Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub url: String,
}

#[derive(Deserialize)]
pub struct RecentQuery {
    /// Raw text; unparseable or zero values fall back to the default
    pub limit: Option<String>,
}

impl RecentQuery {
    fn limit(&self) -> usize {
        self.limit
            .as_deref()
            .and_then(|raw| raw.trim().parse::<usize>().ok())
            .filter(|&limit| limit > 0)
            .unwrap_or(DEFAULT_RECENT_LIMIT)
    }
}

#[derive(Deserialize)]
pub struct LatestQuery {
    pub url: String,
}

/// One row of the recent analyses listing
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSummary {
    pub id: i64,
    pub url: String,
    pub domain: String,
    pub score: u8,
    pub created_at: DateTime<Utc>,
}

impl From<StoredAnalysis> for AnalysisSummary {
    fn from(record: StoredAnalysis) -> Self {
        Self {
            id: record.id,
            url: record.result.url,
            domain: record.result.domain,
            score: record.result.score,
            created_at: record.created_at,
        }
    }
}

/// POST /api/analyze
pub async fn handle_analyze(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalysisResult>, AppError> {
    let Json(req) = payload.map_err(|rejection| AppError::Validation(rejection.body_text()))?;
    let result = state.analyzer.analyze(&req.url).await?;
    Ok(Json(result))
}

/// GET /api/recent-analyses
pub async fn handle_recent(
    State(state): State<AppState>,
    params: Result<Query<RecentQuery>, QueryRejection>,
) -> Result<Json<Vec<AnalysisSummary>>, AppError> {
    let Query(params) = params.map_err(query_error)?;
    let limit = params.limit().min(state.config.recent_limit_max);
    let records = state.store.list_recent(limit)?;
    Ok(Json(records.into_iter().map(AnalysisSummary::from).collect()))
}

/// GET /api/analyses/latest
pub async fn handle_latest(
    State(state): State<AppState>,
    params: Result<Query<LatestQuery>, QueryRejection>,
) -> Result<Json<StoredAnalysis>, AppError> {
    let Query(params) = params.map_err(query_error)?;
    state
        .store
        .find_latest_by_url(&params.url)?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("No analysis stored for {}", params.url)))
}

fn query_error(rejection: QueryRejection) -> AppError {
    AppError::Validation(rejection.body_text())
}
