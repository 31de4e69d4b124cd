use axum::{
    extract::{Query, State},
    Extension, Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct LiveSearchItem {
    id: i64,
    name: String,
    brand: Option<String>,
    image_url: Option<String>,
    sale_price: Decimal,
}

#[derive(Debug, Deserialize)]
pub(super) struct LiveSearchQuery {
    pub q: Option<String>,
}

/// Typeahead search for the storefront header. A blank query is an empty
/// result, not an error.
pub(super) async fn live_search(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<LiveSearchQuery>,
) -> Result<Json<ApiResponse<Vec<LiveSearchItem>>>, ApiError> {
    let term = query.q.as_deref().map(str::trim).unwrap_or_default();
    let rows = if term.is_empty() {
        Vec::new()
    } else {
        aura_db::live_search(&state.pool, term)
            .await
            .map_err(|e| map_db_error(req_id.0.clone(), &e))?
    };

    Ok(Json(ApiResponse {
        data: rows
            .into_iter()
            .map(|row| LiveSearchItem {
                id: row.id,
                name: row.name.clone(),
                brand: row.brand.clone(),
                image_url: row.image_url.clone(),
                sale_price: row.sale_price(),
            })
            .collect(),
        meta: ResponseMeta::new(req_id.0),
    }))
}
