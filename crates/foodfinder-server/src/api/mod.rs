mod filters;
mod report;
mod restaurants;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use foodfinder_core::{
    CityCoordinates, DataSource, FilterOptions, QueryError, QueryParams, RecordStore,
};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::middleware::{request_id, RequestId, REQUEST_ID_HEADER};

/// Immutable snapshot shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RecordStore>,
    pub coordinates: Arc<CityCoordinates>,
    pub filter_options: Arc<FilterOptions>,
    pub source: DataSource,
}

impl AppState {
    #[must_use]
    pub fn new(store: RecordStore, coordinates: CityCoordinates, source: DataSource) -> Self {
        let filter_options = FilterOptions::from_records(store.records());
        Self {
            store: Arc::new(store),
            coordinates: Arc::new(coordinates),
            filter_options: Arc::new(filter_options),
            source,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
            count: None,
        }
    }

    pub(super) fn with_count(request_id: String, count: usize) -> Self {
        Self {
            count: Some(count),
            ..Self::new(request_id)
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
    pub meta: ResponseMeta,
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: message.into(),
            code: code.into(),
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

pub(super) fn map_query_error(request_id: String, error: &QueryError) -> ApiError {
    tracing::warn!(error = %error, "rejected query parameters");
    ApiError::new(request_id, "bad_request", error.to_string())
}

/// Unwrap the query string, turning a malformed one (for example a repeated
/// key) into the JSON `bad_request` envelope instead of axum's plain text.
pub(super) fn query_params(
    request_id: &RequestId,
    query: Result<Query<QueryParams>, QueryRejection>,
) -> Result<QueryParams, ApiError> {
    match query {
        Ok(Query(params)) => Ok(params),
        Err(rejection) => {
            tracing::warn!(error = %rejection.body_text(), "rejected query string");
            Err(ApiError::new(
                request_id.0.clone(),
                "bad_request",
                rejection.body_text(),
            ))
        }
    }
}

#[derive(Debug, Serialize)]
struct HealthData {
    status: &'static str,
    records: usize,
    source: String,
    meta: ResponseMeta,
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static(REQUEST_ID_HEADER)])
}

pub fn build_app(state: AppState, request_timeout: Duration) -> Router {
    let routes = Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/restaurants", get(restaurants::list_restaurants))
        .route("/api/results", get(restaurants::list_results))
        .route("/api/report", get(report::get_report))
        .route("/api/filters", get(filters::get_filters))
        .with_state(state);
    with_middleware(routes, request_timeout)
}

/// Request id sits outermost so every response, including a timeout or a
/// CORS preflight, carries `x-request-id`.
fn with_middleware(router: Router, request_timeout: Duration) -> Router {
    router.layer(
        ServiceBuilder::new()
            .layer(axum::middleware::from_fn(request_id))
            .layer(TraceLayer::new_for_http())
            .layer(build_cors())
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                request_timeout,
            )),
    )
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    Json(HealthData {
        status: "ok",
        records: state.store.len(),
        source: state.source.to_string(),
        meta: ResponseMeta::new(req_id.0),
    })
}
