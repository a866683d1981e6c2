use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use foodfinder_core::{summary_lines, QueryParams, ReportRow};
use serde::Serialize;

use crate::middleware::RequestId;

use super::{query_params, restaurants::run_query, ApiError, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct ReportData {
    summary: Vec<String>,
    rows: Vec<ReportRow>,
    generated_at: DateTime<Utc>,
    meta: ResponseMeta,
}

pub(super) async fn get_report(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    query: Result<Query<QueryParams>, QueryRejection>,
) -> Result<Json<ReportData>, ApiError> {
    let params = query_params(&req_id, query)?;
    let (spec, results) = run_query(&state, &req_id, &params, false)?;

    Ok(Json(ReportData {
        summary: summary_lines(results.len(), &spec),
        rows: results.iter().map(ReportRow::from_record).collect(),
        generated_at: Utc::now(),
        meta: ResponseMeta::with_count(req_id.0, results.len()),
    }))
}
