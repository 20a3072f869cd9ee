//! HTTP request handlers for the dashboard service.
//!
//! Every endpoint is a thin wrapper: read the store, run one engine
//! transformation, serialize the result.

use crate::config::DashboardConfig;
use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router as AxumRouter,
};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use tracing::{debug, error, warn};
use vizdash_domain::table::DEFAULT_PAGE_SIZE;
use vizdash_domain::traits::RecordStore;
use vizdash_domain::{
    extract_options, sort_and_page, DashboardView, Field, FilterSpec, SortDirection, SortKey,
};
use vizdash_store::StoreError;

/// Store handle shared by all requests
pub type SharedStore = Arc<Mutex<dyn RecordStore<Error = StoreError> + Send>>;

/// Raw query-string pairs, in request order
type Params = Vec<(String, String)>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Record store, opened at startup
    pub store: SharedStore,
    /// `max-age` for the Cache-Control header
    pub cache_max_age_secs: u64,
    /// Table page size when the request does not specify one
    pub default_page_size: usize,
}

impl AppState {
    /// Wrap a store with default response settings
    pub fn new<S>(store: S) -> Self
    where
        S: RecordStore<Error = StoreError> + Send + 'static,
    {
        Self::from_shared(Arc::new(Mutex::new(store)))
    }

    /// Use an already shared store with default response settings
    pub fn from_shared(store: SharedStore) -> Self {
        Self {
            store,
            cache_max_age_secs: 60,
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Apply response settings from configuration
    pub fn with_config(mut self, config: &DashboardConfig) -> Self {
        self.cache_max_age_secs = config.cache_max_age_secs;
        self.default_page_size = config.default_page_size;
        self
    }

    fn cache_control(&self) -> [(header::HeaderName, String); 1] {
        [(
            header::CACHE_CONTROL,
            format!("public, max-age={}", self.cache_max_age_secs),
        )]
    }
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    /// "healthy" or "unhealthy"
    pub status: String,
    /// Records visible through the store
    pub record_count: usize,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    /// Record store failed
    Store(StoreError),
    /// Internal server error
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Details go to the log; clients only ever see the generic message
        match &self {
            AppError::Store(e) => error!(error = %e, unavailable = e.is_unavailable(), "API error"),
            AppError::Internal(msg) => error!(error = %msg, "API error"),
        }

        let body = Json(ErrorResponse {
            error: "Internal Server Error".to_string(),
        });
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::Store(e)
    }
}

/// Run a store operation on the blocking pool
async fn read_store<T, F>(state: &AppState, op: F) -> Result<T, AppError>
where
    T: Send + 'static,
    F: FnOnce(&(dyn RecordStore<Error = StoreError> + Send)) -> Result<T, StoreError>
        + Send
        + 'static,
{
    let store = Arc::clone(&state.store);
    tokio::task::spawn_blocking(move || {
        let guard = store
            .lock()
            .map_err(|_| AppError::Internal("record store lock poisoned".to_string()))?;
        op(&*guard).map_err(AppError::from)
    })
    .await
    .map_err(|e| AppError::Internal(format!("store task failed: {}", e)))?
}

fn filter_spec(params: &Params) -> FilterSpec {
    FilterSpec::from_params(params.iter().map(|(k, v)| (k.as_str(), v.as_str())))
}

/// Table parameters parsed from the query string
///
/// Unparseable values fall back to defaults instead of failing the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableQuery {
    /// Sort column and direction (`None` keeps dataset order)
    pub sort: Option<SortKey>,
    /// 0-based page
    pub page_index: usize,
    /// Rows per page
    pub page_size: usize,
}

impl TableQuery {
    /// Read `sort`, `direction`, `page` and `page_size`
    pub fn from_params(params: &[(String, String)], default_page_size: usize) -> Self {
        let first = |name: &str| {
            params
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.as_str())
        };

        let direction = first("direction")
            .and_then(SortDirection::parse)
            .unwrap_or_default();
        let sort = first("sort")
            .and_then(Field::parse)
            .map(|field| SortKey { field, direction });
        let page_index = first("page")
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(0);
        let page_size = first("page_size")
            .and_then(|v| v.trim().parse().ok())
            .filter(|size: &usize| *size > 0)
            .unwrap_or(default_page_size);

        Self {
            sort,
            page_index,
            page_size,
        }
    }
}

/// GET /api/data - Filtered records
///
/// Store failures produce a 500 with a generic body and no partial data.
async fn get_data(
    State(state): State<AppState>,
    Query(params): Query<Params>,
) -> Result<Response, AppError> {
    let spec = filter_spec(&params);
    debug!(constraints = spec.len(), "Listing records");

    let records = read_store(&state, move |store| store.list_filtered(&spec)).await?;
    Ok((state.cache_control(), Json(records)).into_response())
}

/// GET /api/options - Filter choices over the whole dataset
async fn get_options(State(state): State<AppState>) -> Result<Response, AppError> {
    let records = read_store(&state, |store| store.list_all()).await?;
    let options = extract_options(&records, &Field::FILTERABLE);
    Ok((state.cache_control(), Json(options)).into_response())
}

/// GET /api/dashboard - Stat cards and chart panels for the filtered records
async fn get_dashboard(
    State(state): State<AppState>,
    Query(params): Query<Params>,
) -> Result<Response, AppError> {
    let spec = filter_spec(&params);
    let records = read_store(&state, move |store| store.list_filtered(&spec)).await?;
    let view = DashboardView::build(&records);
    Ok((state.cache_control(), Json(view)).into_response())
}

/// GET /api/table - One sorted page of the filtered records
async fn get_table(
    State(state): State<AppState>,
    Query(params): Query<Params>,
) -> Result<Response, AppError> {
    let spec = filter_spec(&params);
    let table = TableQuery::from_params(&params, state.default_page_size);

    let records = read_store(&state, move |store| store.list_filtered(&spec)).await?;
    let page = sort_and_page(&records, table.sort, table.page_index, table.page_size);
    Ok((state.cache_control(), Json(page)).into_response())
}

/// GET /health - Store reachability
async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthCheckResponse>) {
    match read_store(&state, |store| store.count()).await {
        Ok(record_count) => (
            StatusCode::OK,
            Json(HealthCheckResponse {
                status: "healthy".to_string(),
                record_count,
            }),
        ),
        Err(e) => {
            warn!(error = ?e, "Health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthCheckResponse {
                    status: "unhealthy".to_string(),
                    record_count: 0,
                }),
            )
        }
    }
}

/// Create the axum router with all routes
pub fn create_router(state: AppState) -> AxumRouter {
    AxumRouter::new()
        .route("/api/data", get(get_data))
        .route("/api/options", get(get_options))
        .route("/api/dashboard", get(get_dashboard))
        .route("/api/table", get(get_table))
        .route("/health", get(health_check))
        .with_state(state)
}
