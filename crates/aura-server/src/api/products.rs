use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use aura_db::{ProductListFilters, ProductRow, ReviewSort, SortKey};

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct ProductItem {
    id: i64,
    name: String,
    description: Option<String>,
    image_url: Option<String>,
    category: Option<String>,
    brand: Option<String>,
    color: Option<String>,
    original_price: Decimal,
    discount_percent: i32,
    sale_price: Decimal,
    rating: Option<Decimal>,
    num_ratings: i32,
}

impl From<ProductRow> for ProductItem {
    fn from(row: ProductRow) -> Self {
        let sale_price = row.sale_price();
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            image_url: row.image_url,
            category: row.category,
            brand: row.brand,
            color: row.color,
            original_price: row.original_price,
            discount_percent: row.discount_percent,
            sale_price,
            rating: row.rating,
            num_ratings: row.num_ratings,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct ListQuery {
    pub q: Option<String>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub min_rating: Option<Decimal>,
    /// Inclusive sale-price range as `low-high`, e.g. `500-2000`.
    pub price: Option<String>,
    pub sort: Option<String>,
}

/// Parses a `low-high` price range; malformed input is ignored rather than
/// rejected so a broken filter widget never breaks the listing.
fn parse_price_range(raw: &str) -> Option<(i64, i64)> {
    let (low, high) = raw.split_once('-')?;
    let low = low.trim().parse::<i64>().ok()?;
    let high = high.trim().parse::<i64>().ok()?;
    (low <= high).then_some((low, high))
}

pub(super) async fn list_products(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<Vec<ProductItem>>>, ApiError> {
    let rows = aura_db::search_products(
        &state.pool,
        ProductListFilters {
            query: query.q.as_deref(),
            category: query.category.as_deref(),
            brand: query.brand.as_deref(),
            min_rating: query.min_rating,
            price_range: query.price.as_deref().and_then(parse_price_range),
            sort: query.sort.as_deref().map(SortKey::from_param).unwrap_or_default(),
        },
    )
    .await
    .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: rows.into_iter().map(ProductItem::from).collect(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

#[derive(Debug, Serialize)]
pub(super) struct SizeItem {
    size: String,
    stock_quantity: i32,
}

#[derive(Debug, Serialize)]
pub(super) struct ProductDetail {
    product: ProductItem,
    long_description: Option<String>,
    sizes: Vec<SizeItem>,
    related: Vec<ProductItem>,
    reviews: Vec<super::reviews::ReviewItem>,
}

#[derive(Debug, Deserialize)]
pub(super) struct DetailQuery {
    pub review_sort: Option<String>,
}

pub(super) async fn get_product_detail(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<i64>,
    Query(query): Query<DetailQuery>,
) -> Result<Json<ApiResponse<ProductDetail>>, ApiError> {
    let map_err = |e| map_db_error(req_id.0.clone(), &e);

    let row = aura_db::get_product(&state.pool, id)
        .await
        .map_err(map_err)?
        .ok_or_else(|| ApiError::new(req_id.0.clone(), "not_found", "product not found"))?;

    let sizes = aura_db::sizes_for_product(&state.pool, id)
        .await
        .map_err(map_err)?;

    let related = match row.category.as_deref() {
        Some(category) => aura_db::related_products(&state.pool, category, id)
            .await
            .map_err(map_err)?,
        None => Vec::new(),
    };

    let sort = query
        .review_sort
        .as_deref()
        .map(ReviewSort::from_param)
        .unwrap_or_default();
    let reviews = aura_db::list_reviews(&state.pool, id, sort)
        .await
        .map_err(map_err)?;

    let long_description = row.long_description.clone();
    Ok(Json(ApiResponse {
        data: ProductDetail {
            product: ProductItem::from(row),
            long_description,
            sizes: sizes
                .into_iter()
                .map(|s| SizeItem {
                    size: s.size,
                    stock_quantity: s.stock_quantity,
                })
                .collect(),
            related: related.into_iter().map(ProductItem::from).collect(),
            reviews: reviews
                .into_iter()
                .map(super::reviews::ReviewItem::from)
                .collect(),
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_range_parses_low_high() {
        assert_eq!(parse_price_range("500-2000"), Some((500, 2000)));
        assert_eq!(parse_price_range(" 0 - 999 "), Some((0, 999)));
    }

    #[test]
    fn malformed_price_range_is_ignored() {
        assert_eq!(parse_price_range("cheap"), None);
        assert_eq!(parse_price_range("2000-500"), None);
        assert_eq!(parse_price_range("500"), None);
    }
}
