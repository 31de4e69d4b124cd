use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use aura_db::{ReviewRow, ReviewSort};

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct ReviewItem {
    id: i64,
    reviewer: String,
    rating: i32,
    comment: Option<String>,
    review_date: DateTime<Utc>,
}

impl From<ReviewRow> for ReviewItem {
    fn from(row: ReviewRow) -> Self {
        Self {
            id: row.id,
            reviewer: row.reviewer,
            rating: row.rating,
            comment: row.comment,
            review_date: row.review_date,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct ReviewListQuery {
    pub sort: Option<String>,
}

pub(super) async fn list_product_reviews(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(product_id): Path<i64>,
    Query(query): Query<ReviewListQuery>,
) -> Result<Json<ApiResponse<Vec<ReviewItem>>>, ApiError> {
    let sort = query
        .sort
        .as_deref()
        .map(ReviewSort::from_param)
        .unwrap_or_default();
    let rows = aura_db::list_reviews(&state.pool, product_id, sort)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: rows.into_iter().map(ReviewItem::from).collect(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

#[derive(Debug, Deserialize)]
pub(super) struct CreateReview {
    pub user_id: i64,
    pub rating: i32,
    pub comment: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct CreatedReview {
    id: i64,
}

pub(super) async fn create_review(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(product_id): Path<i64>,
    Json(body): Json<CreateReview>,
) -> Result<Json<ApiResponse<CreatedReview>>, ApiError> {
    if !(1..=5).contains(&body.rating) {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "rating must be between 1 and 5",
        ));
    }

    let id = aura_db::insert_review(
        &state.pool,
        product_id,
        body.user_id,
        body.rating,
        body.comment.as_deref(),
    )
    .await
    .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: CreatedReview { id },
        meta: ResponseMeta::new(req_id.0),
    }))
}
