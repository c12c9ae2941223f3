use axum::{
    extract::{Query, State},
    response::Json,
};
use clarity_core::search::perform_search;
use clarity_core::stats::{self, Dashboard};
use serde::Deserialize;

use crate::state::AppState;

#[derive(Deserialize)]
pub struct SearchQuery {
    q: Option<String>,
}

pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Json<serde_json::Value> {
    let query = params.q.unwrap_or_default();
    let results = perform_search(&query, state.store().app_data());
    Json(serde_json::json!({ "query": query, "results": results }))
}

pub async fn dashboard(State(state): State<AppState>) -> Json<Dashboard> {
    Json(stats::dashboard(state.store().app_data()))
}
