//! Integration tests for the dashboard HTTP API

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::io::Write;
use tempfile::NamedTempFile;
use tower::ServiceExt; // for oneshot
use vizdash_domain::traits::RecordStore;
use vizdash_domain::{FilterSpec, Record};
use vizdash_server::{
    config::{DashboardConfig, StoreBackend, StoreConfig},
    handlers::{create_router, AppState, ErrorResponse, HealthCheckResponse},
    open_store,
};
use vizdash_store::{MemoryStore, StoreError};

/// Store whose backing medium is gone
struct FailingStore;

impl RecordStore for FailingStore {
    type Error = StoreError;

    fn list_all(&self) -> Result<Vec<Record>, StoreError> {
        Err(StoreError::Unavailable(
            "database file /var/lib/vizdash/secret.db is locked".to_string(),
        ))
    }

    fn list_filtered(&self, _spec: &FilterSpec) -> Result<Vec<Record>, StoreError> {
        self.list_all()
    }
}

fn records(values: Value) -> Vec<Record> {
    serde_json::from_value(values).unwrap()
}

/// Helper to create test application state
fn create_test_state() -> AppState {
    AppState::new(MemoryStore::new(records(json!([
        {"country": "USA", "topic": "oil", "sector": "Energy", "region": "Northern America",
         "intensity": 6, "likelihood": 3, "relevance": 2, "end_year": 2030},
        {"country": "USA", "topic": "gas", "sector": "Energy", "region": "Northern America",
         "intensity": 8, "likelihood": 1, "relevance": 4, "end_year": ""},
        {"country": "USA", "topic": "Oil", "sector": "Retail", "region": "Northern America",
         "intensity": 0, "likelihood": "", "relevance": 3, "end_year": 2025},
        {"country": "India", "topic": "coal", "sector": "Energy", "region": "Southern Asia",
         "intensity": 2, "likelihood": 4, "relevance": 1, "end_year": "2027"},
        {"country": "", "topic": "oil", "sector": "", "region": "Europe",
         "intensity": 10, "likelihood": 2, "relevance": "", "end_year": 2025}
    ]))))
}

async fn get(app: Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, headers, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_data_endpoint_returns_everything_unfiltered() {
    let app = create_router(create_test_state());
    let (status, headers, body) = get(app, "/api/data").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CACHE_CONTROL], "public, max-age=60");
    assert_eq!(body.as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_data_filter_is_case_insensitive() {
    let app = create_router(create_test_state());
    let (status, _, body) = get(app, "/api/data?topic=OIL&country=usa").await;

    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r["country"] == "USA"));
}

#[tokio::test]
async fn test_data_end_year_filter() {
    let app = create_router(create_test_state());
    let (_, _, body) = get(app.clone(), "/api/data?end_year=2025").await;
    assert_eq!(body.as_array().unwrap().len(), 2);

    // Leading integer wins, trailing junk is ignored
    let (_, _, body) = get(app.clone(), "/api/data?end_year=2027abc").await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    // Unparseable year is no constraint at all
    let (_, _, body) = get(app, "/api/data?end_year=soon").await;
    assert_eq!(body.as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_data_ignores_unknown_and_empty_params() {
    let app = create_router(create_test_state());
    let (status, _, body) = get(app, "/api/data?colour=red&sector=&intensity=6").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_data_absent_fields_serialize_as_empty_string() {
    let app = create_router(create_test_state());
    let (_, _, body) = get(app, "/api/data?region=europe").await;

    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["country"], "");
    assert_eq!(rows[0]["relevance"], "");
    assert_eq!(rows[0]["intensity"].as_f64(), Some(10.0));
}

#[tokio::test]
async fn test_store_failure_returns_generic_error() {
    let app = create_router(AppState::new(FailingStore));

    for uri in ["/api/data", "/api/options", "/api/dashboard", "/api/table"] {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR, "{}", uri);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.error, "Internal Server Error");
        assert!(!String::from_utf8_lossy(&body).contains("secret.db"));
    }
}

#[tokio::test]
async fn test_options_ignore_filters() {
    let app = create_router(create_test_state());
    let (status, headers, body) = get(app, "/api/options?country=India").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CACHE_CONTROL], "public, max-age=60");
    assert_eq!(body["country"], json!(["India", "USA"]));
    assert_eq!(body["topic"], json!(["Oil", "coal", "gas", "oil"]));
    assert_eq!(body["end_year"], json!([2025, 2027, 2030]));
    assert!(body.get("intensity").is_none());
}

#[tokio::test]
async fn test_dashboard_end_to_end() {
    let app = create_router(create_test_state());
    let (status, _, body) = get(app, "/api/dashboard?country=USA").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["summary"]["total_records"], 3);
    // The zero intensity is not a measurement
    assert_eq!(body["summary"]["average_intensity"].as_f64(), Some(7.0));
    assert_eq!(body["summary"]["average_likelihood"].as_f64(), Some(2.0));
    assert_eq!(body["summary"]["average_relevance"].as_f64(), Some(3.0));

    let stats = body["intensity_by_country"]["stats"].as_array().unwrap();
    assert_eq!(stats.len(), 1);
    assert_eq!(stats[0]["key"], "USA");
    assert_eq!(stats[0]["value"].as_f64(), Some(7.0));

    let sectors = body["likelihood_by_sector"]["stats"].as_array().unwrap();
    assert_eq!(sectors.len(), 1);
    assert_eq!(sectors[0]["key"], "Energy");
    assert_eq!(sectors[0]["value"].as_f64(), Some(2.0));

    let topics = body["topic_distribution"]["stats"].as_array().unwrap();
    assert_eq!(topics.len(), 3);
    assert_eq!(body["topic_distribution"]["is_empty"], false);
}

#[tokio::test]
async fn test_dashboard_with_no_matches() {
    let app = create_router(create_test_state());
    let (status, _, body) = get(app, "/api/dashboard?country=Atlantis").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["summary"]["total_records"], 0);
    assert_eq!(body["summary"]["average_intensity"].as_f64(), Some(0.0));
    assert_eq!(body["region_distribution"]["is_empty"], true);
}

#[tokio::test]
async fn test_table_paging() {
    let many: Vec<Record> = (0..25)
        .map(|i| {
            serde_json::from_value(json!({"topic": format!("t{:02}", i), "intensity": i}))
                .unwrap()
        })
        .collect();
    let app = create_router(AppState::new(MemoryStore::new(many)));

    let (status, _, body) = get(app.clone(), "/api/table?page=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rows"].as_array().unwrap().len(), 5);
    assert_eq!(body["total_pages"], 3);
    assert_eq!(body["total_records"], 25);
    assert_eq!(body["rows"][0]["topic"], "t20");

    let (_, _, body) = get(app.clone(), "/api/table?page=5").await;
    assert!(body["rows"].as_array().unwrap().is_empty());
    assert_eq!(body["total_pages"], 3);

    let (_, _, body) = get(app, "/api/table?sort=intensity&direction=desc&page_size=4").await;
    assert_eq!(body["page_size"], 4);
    assert_eq!(body["total_pages"], 7);
    assert_eq!(body["rows"][0]["topic"], "t24");
    assert_eq!(body["rows"][3]["topic"], "t21");
}

#[tokio::test]
async fn test_table_applies_filters() {
    let app = create_router(create_test_state());
    let (_, _, body) = get(app, "/api/table?sector=energy&sort=likelihood").await;

    assert_eq!(body["total_records"], 3);
    let likelihoods: Vec<f64> = body["rows"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["likelihood"].as_f64().unwrap())
        .collect();
    assert_eq!(likelihoods, vec![1.0, 3.0, 4.0]);
}

#[tokio::test]
async fn test_health_check_endpoint() {
    let app = create_router(create_test_state());
    let (status, _, body) = get(app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    let health: HealthCheckResponse = serde_json::from_value(body).unwrap();
    assert_eq!(health.status, "healthy");
    assert_eq!(health.record_count, 5);
}

#[tokio::test]
async fn test_health_check_reports_unavailable_store() {
    let app = create_router(AppState::new(FailingStore));
    let (status, _, body) = get(app, "/health").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "unhealthy");
}

#[tokio::test]
async fn test_configured_cache_lifetime() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(br#"[{"topic": "oil", "country": "USA"}]"#)
        .unwrap();

    let toml = format!(
        r#"
        bind_address = "127.0.0.1"
        bind_port = 0
        cache_max_age_secs = 300

        [store]
        backend = "json"
        path = {:?}
        "#,
        file.path().display().to_string()
    );
    let config: DashboardConfig = toml::from_str(&toml).unwrap();
    assert_eq!(config.store.backend, StoreBackend::Json);
    assert_eq!(config.default_page_size, 10);

    let store = open_store(&config.store).unwrap();
    let app = create_router(AppState::from_shared(store).with_config(&config));
    let (status, headers, body) = get(app, "/api/data").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CACHE_CONTROL], "public, max-age=300");
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_sqlite_backend_seeds_once() {
    let dir = tempfile::TempDir::new().unwrap();
    let seed = dir.path().join("jsondata.json");
    std::fs::write(&seed, r#"[{"topic": "oil"}, {"topic": "gas"}]"#).unwrap();

    let config = StoreConfig {
        backend: StoreBackend::Sqlite,
        path: dir.path().join("dashboard.db"),
        seed_file: Some(seed),
    };

    {
        let store = open_store(&config).unwrap();
        assert_eq!(store.lock().unwrap().count().unwrap(), 2);
    }
    let store = open_store(&config).unwrap();
    let app = create_router(AppState::from_shared(store));
    let (_, _, body) = get(app, "/health").await;
    assert_eq!(body["record_count"], 2);
}
