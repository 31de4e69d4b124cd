use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct WishlistItem {
    product_id: i64,
    name: String,
    image_url: Option<String>,
    sale_price: Decimal,
    added_date: DateTime<Utc>,
}

pub(super) async fn list_wishlist(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(user_id): Path<i64>,
) -> Result<Json<ApiResponse<Vec<WishlistItem>>>, ApiError> {
    let rows = aura_db::list_wishlist(&state.pool, user_id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: rows
            .into_iter()
            .map(|row| WishlistItem {
                product_id: row.product_id,
                name: row.name.clone(),
                image_url: row.image_url.clone(),
                sale_price: row.sale_price(),
                added_date: row.added_date,
            })
            .collect(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

#[derive(Debug, Deserialize)]
pub(super) struct AddWishlistItem {
    pub product_id: i64,
}

#[derive(Debug, Serialize)]
pub(super) struct WishlistAck {
    product_id: i64,
}

pub(super) async fn add_to_wishlist(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(user_id): Path<i64>,
    Json(body): Json<AddWishlistItem>,
) -> Result<Json<ApiResponse<WishlistAck>>, ApiError> {
    aura_db::add_to_wishlist(&state.pool, user_id, body.product_id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: WishlistAck {
            product_id: body.product_id,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn remove_from_wishlist(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path((user_id, product_id)): Path<(i64, i64)>,
) -> Result<Json<ApiResponse<WishlistAck>>, ApiError> {
    aura_db::remove_from_wishlist(&state.pool, user_id, product_id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: WishlistAck { product_id },
        meta: ResponseMeta::new(req_id.0),
    }))
}
