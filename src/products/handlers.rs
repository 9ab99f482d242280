use axum::{
    extract::State,
    http::{header::LOCATION, HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use tracing::instrument;

use super::{dto::ProductRequest, repo_types::Product};
use crate::{
    error::AppError,
    extract::{JsonBody, PathParam},
    state::AppState,
};

pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/api/products", get(list_products).post(create_product))
        .route(
            "/api/products/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/api/products/category/:category_id", get(list_by_category))
}

#[instrument(skip(state, payload))]
pub async fn create_product(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<ProductRequest>,
) -> Result<(StatusCode, HeaderMap, Json<Product>), AppError> {
    let product = state.products.create(payload.try_into()?).await?;

    let mut headers = HeaderMap::new();
    if let Ok(location) = format!("/api/products/{}", product.id).parse() {
        headers.insert(LOCATION, location);
    }
    Ok((StatusCode::CREATED, headers, Json(product)))
}

#[instrument(skip(state))]
pub async fn list_products(State(state): State<AppState>) -> Result<Json<Vec<Product>>, AppError> {
    Ok(Json(state.products.list().await?))
}

#[instrument(skip(state))]
pub async fn get_product(
    State(state): State<AppState>,
    PathParam(id): PathParam<i64>,
) -> Result<Json<Product>, AppError> {
    Ok(Json(state.products.get(id).await?))
}

#[instrument(skip(state, payload))]
pub async fn update_product(
    State(state): State<AppState>,
    PathParam(id): PathParam<i64>,
    JsonBody(payload): JsonBody<ProductRequest>,
) -> Result<Json<Product>, AppError> {
    Ok(Json(state.products.update(id, payload.try_into()?).await?))
}

#[instrument(skip(state))]
pub async fn delete_product(
    State(state): State<AppState>,
    PathParam(id): PathParam<i64>,
) -> Result<&'static str, AppError> {
    state.products.delete(id).await?;
    Ok("Product deleted successfully")
}

#[instrument(skip(state))]
pub async fn list_by_category(
    State(state): State<AppState>,
    PathParam(category_id): PathParam<i64>,
) -> Result<Json<Vec<Product>>, AppError> {
    Ok(Json(state.products.list_by_category(category_id).await?))
}
