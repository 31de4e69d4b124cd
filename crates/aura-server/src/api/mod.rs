mod chat;
mod products;
mod reviews;
mod search;
mod wishlist;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use crate::middleware::{request_id, RequestId};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub genai: Option<Arc<aura_genai::GenAiClient>>,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    database: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "conflict" => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

pub(super) fn map_db_error(request_id: String, error: &aura_db::DbError) -> ApiError {
    match error {
        aura_db::DbError::NotFound => ApiError::new(request_id, "not_found", "record not found"),
        aura_db::DbError::InsufficientStock { .. } => {
            ApiError::new(request_id, "conflict", error.to_string())
        }
        _ => {
            tracing::error!(error = %error, "database query failed");
            ApiError::new(request_id, "internal_error", "database query failed")
        }
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static("x-request-id"),
        ])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/products", get(products::list_products))
        .route("/api/v1/products/{id}", get(products::get_product_detail))
        .route(
            "/api/v1/products/{id}/reviews",
            get(reviews::list_product_reviews).post(reviews::create_review),
        )
        .route("/api/v1/search/live", get(search::live_search))
        .route(
            "/api/v1/users/{user_id}/wishlist",
            get(wishlist::list_wishlist).post(wishlist::add_to_wishlist),
        )
        .route(
            "/api/v1/users/{user_id}/wishlist/{product_id}",
            axum::routing::delete(wishlist::remove_from_wishlist),
        )
        .route("/api/v1/chat", axum::routing::post(chat::chat_turn))
        .route("/ws/chat", get(chat::chat_socket))
        .layer(
            ServiceBuilder::new()
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let meta = ResponseMeta::new(req_id.0);

    match aura_db::health_check(&state.pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse {
                data: HealthData {
                    status: "ok",
                    database: "ok",
                },
                meta,
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check: database unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse {
                    data: HealthData {
                        status: "degraded",
                        database: "unavailable",
                    },
                    meta,
                }),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    fn test_app(pool: PgPool) -> Router {
        build_app(AppState { pool, genai: None })
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .uri(uri)
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json = serde_json::from_slice(&body).expect("json parse");
        (status, json)
    }

    async fn seed_product(pool: &PgPool, name: &str, brand: &str, category: &str, price: &str) -> i64 {
        sqlx::query_scalar::<_, i64>(
            "INSERT INTO products (name, description, original_price, category, brand) \
             VALUES ($1, $2, $3::numeric(10,2), $4, $5) RETURNING id",
        )
        .bind(name)
        .bind(format!("{name} for everyday wear"))
        .bind(price)
        .bind(category)
        .bind(brand)
        .fetch_one(pool)
        .await
        .expect("seed product")
    }

    #[test]
    fn api_error_not_found_maps_to_404() {
        let response = ApiError::new("req-1", "not_found", "missing").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn api_error_validation_error_maps_to_bad_request() {
        let response = ApiError::new("req-1", "validation_error", "invalid input").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn health_reports_ok_with_a_live_pool(pool: PgPool) {
        let (status, json) = get_json(test_app(pool), "/api/v1/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["status"].as_str(), Some("ok"));
        assert!(json["meta"]["request_id"].is_string());
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn product_listing_filters_by_category(pool: PgPool) {
        seed_product(&pool, "Plain Tee", "Aura Basics", "Tops", "899").await;
        seed_product(&pool, "Slim Jeans", "Aura Denim", "Bottoms", "1999").await;

        let (status, json) =
            get_json(test_app(pool), "/api/v1/products?category=Bottoms").await;

        assert_eq!(status, StatusCode::OK);
        let data = json["data"].as_array().expect("data array");
        assert_eq!(data.len(), 1);
        assert_eq!(data[0]["name"].as_str(), Some("Slim Jeans"));
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn product_listing_searches_and_sorts(pool: PgPool) {
        seed_product(&pool, "Denim Jacket", "Aura Luxe", "Outerwear", "3499").await;
        seed_product(&pool, "Denim Shorts", "Aura Denim", "Bottoms", "1299").await;

        let (status, json) =
            get_json(test_app(pool), "/api/v1/products?q=denim&sort=price_asc").await;

        assert_eq!(status, StatusCode::OK);
        let data = json["data"].as_array().expect("data array");
        assert_eq!(data.len(), 2);
        assert_eq!(data[0]["name"].as_str(), Some("Denim Shorts"));
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn product_detail_includes_sizes_and_related(pool: PgPool) {
        let id = seed_product(&pool, "Plain Tee", "Aura Basics", "Tops", "899").await;
        seed_product(&pool, "Henley", "Aura Basics", "Tops", "1199").await;
        sqlx::query("INSERT INTO inventory (product_id, size, stock_quantity) VALUES ($1, 'M', 5)")
            .bind(id)
            .execute(&pool)
            .await
            .expect("inventory");

        let (status, json) = get_json(test_app(pool), &format!("/api/v1/products/{id}")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["product"]["name"].as_str(), Some("Plain Tee"));
        assert_eq!(json["data"]["sizes"][0]["size"].as_str(), Some("M"));
        assert_eq!(
            json["data"]["related"][0]["name"].as_str(),
            Some("Henley"),
            "same-category product should be related"
        );
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn product_detail_404_for_unknown_id(pool: PgPool) {
        let (status, _) = get_json(test_app(pool), "/api/v1/products/424242").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn live_search_matches_brand(pool: PgPool) {
        seed_product(&pool, "Slim Jeans", "Aura Denim", "Bottoms", "1999").await;

        let (status, json) = get_json(test_app(pool), "/api/v1/search/live?q=denim").await;

        assert_eq!(status, StatusCode::OK);
        let data = json["data"].as_array().expect("data array");
        assert_eq!(data.len(), 1);
        assert_eq!(data[0]["name"].as_str(), Some("Slim Jeans"));
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn live_search_with_blank_query_is_empty(pool: PgPool) {
        seed_product(&pool, "Slim Jeans", "Aura Denim", "Bottoms", "1999").await;
        let (status, json) = get_json(test_app(pool), "/api/v1/search/live?q=%20").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"].as_array().map(Vec::len), Some(0));
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn chat_endpoint_answers_a_greeting(pool: PgPool) {
        let app = test_app(pool);
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/chat")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"message": "hello"}"#))
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json parse");
        assert!(json["data"]["text"]
            .as_str()
            .expect("text")
            .starts_with("Hello! I'm Aura Assistant."));
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn chat_endpoint_returns_product_cards(pool: PgPool) {
        seed_product(&pool, "Slim Jeans", "Aura Denim", "Bottoms", "1999").await;

        let app = test_app(pool);
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/chat")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"message": "show me some jeans"}"#))
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json parse");
        let products = json["data"]["products"].as_array().expect("products");
        assert_eq!(products.len(), 1);
        assert_eq!(products[0]["sale_price"].as_str(), Some("₹1999"));
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn wishlist_round_trip(pool: PgPool) {
        let user = sqlx::query_scalar::<_, i64>(
            "INSERT INTO users (username, email, password_hash, first_name, last_name) \
             VALUES ('wisher', 'wisher@example.com', 'x', 'Wisher', 'Tester') RETURNING id",
        )
        .fetch_one(&pool)
        .await
        .expect("user");
        let product = seed_product(&pool, "Plain Tee", "Aura Basics", "Tops", "899").await;

        let app = test_app(pool);
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(format!("/api/v1/users/{user}/wishlist"))
                    .header("content-type", "application/json")
                    .body(Body::from(format!(r#"{{"product_id": {product}}}"#)))
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        let (status, json) =
            get_json(app.clone(), &format!("/api/v1/users/{user}/wishlist")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"].as_array().map(Vec::len), Some(1));

        let response = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/api/v1/users/{user}/wishlist/{product}"))
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
    }
}
