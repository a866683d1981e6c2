use axum::{extract::State, Extension, Json};
use foodfinder_core::FilterOptions;
use serde::Serialize;

use crate::middleware::RequestId;

use super::{AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct FilterData {
    #[serde(flatten)]
    options: FilterOptions,
    meta: ResponseMeta,
}

pub(super) async fn get_filters(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<FilterData> {
    Json(FilterData {
        options: FilterOptions::clone(&state.filter_options),
        meta: ResponseMeta::new(req_id.0),
    })
}
