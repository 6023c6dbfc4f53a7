// HTTP API tests driven through the router with `oneshot`

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use metalens_core::{
    AnalysisStore, MemoryStore, NewAnalysis, SqliteStore, StorageError, StoredAnalysis,
};
use metalens_server::{AppState, Config, build_router};
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PAGE: &str = r#"<html><head>
    <meta charset="utf-8">
    <title>Example storefront for every season</title>
    <meta name="description" content="Seasonal products">
    <meta property="og:title" content="Storefront">
</head><body></body></html>"#;

/// Store where every operation fails
struct BrokenStore;

impl AnalysisStore for BrokenStore {
    fn append(&self, _record: NewAnalysis) -> Result<StoredAnalysis, StorageError> {
        Err(StorageError::Poisoned)
    }

    fn list_recent(&self, _limit: usize) -> Result<Vec<StoredAnalysis>, StorageError> {
        Err(StorageError::Poisoned)
    }

    fn find_latest_by_url(&self, _url: &str) -> Result<Option<StoredAnalysis>, StorageError> {
        Err(StorageError::Poisoned)
    }
}

fn app_with(store: Arc<dyn AnalysisStore>, config: Config) -> Router {
    build_router(AppState::new(store, config).unwrap())
}

fn app() -> (Arc<MemoryStore>, Router) {
    let store = Arc::new(MemoryStore::new());
    (store.clone(), app_with(store, Config::default()))
}

async fn serve(status: u16) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(status).set_body_string(PAGE))
        .mount(&server)
        .await;
    server
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn post_analyze(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/analyze")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health() {
    let (_, app) = app();
    let (status, body) = send(&app, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "metalens-server");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

// ============================================================================
// POST /api/analyze
// ============================================================================

#[tokio::test]
async fn test_analyze_returns_result_and_stores_it() {
    let server = serve(200).await;
    let (store, app) = app();

    let (status, body) = send(&app, post_analyze(json!({ "url": server.uri() }))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Example storefront for every season");
    assert_eq!(body["domain"], "127.0.0.1");
    assert_eq!(body["metaTags"].as_array().unwrap().len(), 5);
    assert_eq!(body["openGraphTags"].as_array().unwrap().len(), 4);
    assert_eq!(body["twitterCardTags"].as_array().unwrap().len(), 3);
    assert!(body["recommendations"].as_array().unwrap().len() > 0);
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn test_analyze_blank_url_is_validation_error() {
    let (store, app) = app();

    let (status, body) = send(&app, post_analyze(json!({ "url": "  " }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(body["error"]["message"], "URL is required");
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_analyze_missing_url_field_is_validation_error() {
    let (_, app) = app();

    let (status, body) = send(&app, post_analyze(json!({}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_analyze_malformed_body_is_validation_error() {
    let (_, app) = app();
    let request = Request::builder()
        .method("POST")
        .uri("/api/analyze")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_analyze_upstream_error_is_fetch_failed() {
    let server = serve(500).await;
    let (store, app) = app();

    let (status, body) = send(&app, post_analyze(json!({ "url": server.uri() }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "FETCH_FAILED");
    assert_eq!(
        body["error"]["message"],
        "Error fetching website: 500 Internal Server Error"
    );
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_analyze_storage_failure_is_generic_error() {
    let server = serve(200).await;
    let app = app_with(Arc::new(BrokenStore), Config::default());

    let (status, body) = send(&app, post_analyze(json!({ "url": server.uri() }))).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({ "error": { "code": "STORAGE_ERROR", "message": "A storage error occurred" } })
    );
}

// ============================================================================
// GET /api/recent-analyses
// ============================================================================

#[tokio::test]
async fn test_recent_storage_failure_is_generic_error() {
    let app = app_with(Arc::new(BrokenStore), Config::default());

    let (status, body) = send(&app, get("/api/recent-analyses")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], "STORAGE_ERROR");
}

#[tokio::test]
async fn test_recent_is_empty_initially() {
    let (_, app) = app();
    let (status, body) = send(&app, get("/api/recent-analyses")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_recent_lists_summaries_newest_first() {
    let server = serve(200).await;
    let (_, app) = app();

    for _ in 0..3 {
        let (status, _) = send(&app, post_analyze(json!({ "url": server.uri() }))).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = send(&app, get("/api/recent-analyses?limit=2")).await;
    assert_eq!(status, StatusCode::OK);

    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["id"], 3);
    assert_eq!(rows[1]["id"], 2);
    assert_eq!(rows[0]["domain"], "127.0.0.1");
    assert!(rows[0]["score"].is_u64());
    assert!(rows[0]["createdAt"].is_string());
    assert!(rows[0].get("metaTags").is_none());
}

#[tokio::test]
async fn test_recent_limit_is_capped() {
    let server = serve(200).await;
    let store = Arc::new(MemoryStore::new());
    let config = Config {
        recent_limit_max: 1,
        ..Config::default()
    };
    let app = app_with(store, config);

    for _ in 0..2 {
        send(&app, post_analyze(json!({ "url": server.uri() }))).await;
    }

    let (_, body) = send(&app, get("/api/recent-analyses?limit=10")).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_recent_bad_limit_falls_back_to_default() {
    let server = serve(200).await;
    let (_, app) = app();

    for _ in 0..6 {
        send(&app, post_analyze(json!({ "url": server.uri() }))).await;
    }

    for query in ["limit=abc", "limit=0", "limit=-1", "limit="] {
        let (status, body) = send(&app, get(&format!("/api/recent-analyses?{query}"))).await;
        assert_eq!(status, StatusCode::OK, "{query}");
        assert_eq!(body.as_array().unwrap().len(), 5, "{query}");
    }

    let (_, body) = send(&app, get("/api/recent-analyses")).await;
    assert_eq!(body.as_array().unwrap().len(), 5);
}

// ============================================================================
// GET /api/analyses/latest
// ============================================================================

#[tokio::test]
async fn test_latest_by_url() {
    let server = serve(200).await;
    let (_, app) = app();

    let (_, analyzed) = send(&app, post_analyze(json!({ "url": server.uri() }))).await;
    let stored_url = analyzed["url"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        get(&format!("/api/analyses/latest?url={stored_url}")),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 1);
    assert_eq!(body["url"], stored_url);
    assert_eq!(body["title"], "Example storefront for every season");
}

#[tokio::test]
async fn test_latest_unknown_url_is_not_found() {
    let (_, app) = app();

    let (status, body) = send(
        &app,
        get("/api/analyses/latest?url=https://nowhere.example/"),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_latest_without_url_is_validation_error() {
    let (_, app) = app();

    let (status, body) = send(&app, get("/api/analyses/latest")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert!(body["error"]["message"].as_str().unwrap().contains("url"));
}

// ============================================================================
// SQLite-backed state
// ============================================================================

#[tokio::test]
async fn test_analyses_persist_in_sqlite() {
    let server = serve(200).await;
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("analyses.db");

    {
        let store = Arc::new(SqliteStore::open(&db_path).unwrap());
        let app = app_with(store, Config::default());
        let (status, _) = send(&app, post_analyze(json!({ "url": server.uri() }))).await;
        assert_eq!(status, StatusCode::OK);
    }

    let store = Arc::new(SqliteStore::open(&db_path).unwrap());
    let app = app_with(store, Config::default());
    let (_, body) = send(&app, get("/api/recent-analyses")).await;

    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["id"], 1);
}
