//! Return-order search routes
//!
//! Proxies the upstream warehouse search and returns flattened,
//! display-keyed label lines ready to feed the label routes back.

use axum::{Json, Router, extract::Query, extract::State, routing::get};
use label_engine::DisplayRecord;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::core::AppState;
use crate::utils::{AppError, AppResponse, ok};

pub fn router() -> Router<AppState> {
    Router::new().route("/search", get(search))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    original_order_no: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SearchResults {
    pub count: usize,
    pub results: Vec<DisplayRecord>,
}

/// GET /api/returns/search?originalOrderNo=NNN
#[instrument(skip(state))]
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<AppResponse<SearchResults>>, AppError> {
    let order_no = query
        .original_order_no
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            AppError::Validation("Query param \"originalOrderNo\" is required".to_string())
        })?;

    let results = state.warehouse.search_return_orders(order_no).await?;
    Ok(ok(SearchResults { count: results.len(), results }))
}
