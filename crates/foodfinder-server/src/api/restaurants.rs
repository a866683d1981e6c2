use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Extension, Json,
};
use foodfinder_core::{QueryParams, QuerySpec, RestaurantRecord};
use serde::Serialize;

use crate::middleware::RequestId;

use super::{map_query_error, query_params, ApiError, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct RestaurantList {
    restaurants: Vec<RestaurantRecord>,
    meta: ResponseMeta,
}

/// Parse `params` and run the engine over the shared store.
pub(super) fn run_query(
    state: &AppState,
    req_id: &RequestId,
    params: &QueryParams,
    paginate: bool,
) -> Result<(QuerySpec, Vec<RestaurantRecord>), ApiError> {
    let spec =
        QuerySpec::from_params(params).map_err(|e| map_query_error(req_id.0.clone(), &e))?;
    let results = foodfinder_core::execute(state.store.records(), &state.coordinates, &spec, paginate);
    tracing::debug!(?spec, count = results.len(), paginate, "query executed");
    Ok((spec, results))
}

/// Paginated listing backing the map view.
pub(super) async fn list_restaurants(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    query: Result<Query<QueryParams>, QueryRejection>,
) -> Result<Json<RestaurantList>, ApiError> {
    let params = query_params(&req_id, query)?;
    let (_, restaurants) = run_query(&state, &req_id, &params, true)?;
    let meta = ResponseMeta::with_count(req_id.0, restaurants.len());
    Ok(Json(RestaurantList { restaurants, meta }))
}

/// Full ranked listing backing the results page.
pub(super) async fn list_results(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    query: Result<Query<QueryParams>, QueryRejection>,
) -> Result<Json<RestaurantList>, ApiError> {
    let params = query_params(&req_id, query)?;
    let (_, restaurants) = run_query(&state, &req_id, &params, false)?;
    let meta = ResponseMeta::with_count(req_id.0, restaurants.len());
    Ok(Json(RestaurantList { restaurants, meta }))
}
