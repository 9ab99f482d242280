use axum::{
    extract::State,
    http::{header::LOCATION, HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use tracing::instrument;

use super::{dto::CategoryRequest, repo_types::Category};
use crate::{
    error::AppError,
    extract::{JsonBody, PathParam},
    state::AppState,
};

pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/api/categories", get(list_categories).post(create_category))
        .route(
            "/api/categories/:id",
            get(get_category).put(update_category).delete(delete_category),
        )
}

#[instrument(skip(state, payload))]
pub async fn create_category(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CategoryRequest>,
) -> Result<(StatusCode, HeaderMap, Json<Category>), AppError> {
    let category = state.categories.create(payload.try_into()?).await?;

    let mut headers = HeaderMap::new();
    if let Ok(location) = format!("/api/categories/{}", category.id).parse() {
        headers.insert(LOCATION, location);
    }
    Ok((StatusCode::CREATED, headers, Json(category)))
}

#[instrument(skip(state))]
pub async fn list_categories(State(state): State<AppState>) -> Result<Json<Vec<Category>>, AppError> {
    Ok(Json(state.categories.list().await?))
}

#[instrument(skip(state))]
pub async fn get_category(
    State(state): State<AppState>,
    PathParam(id): PathParam<i64>,
) -> Result<Json<Category>, AppError> {
    Ok(Json(state.categories.get(id).await?))
}

#[instrument(skip(state, payload))]
pub async fn update_category(
    State(state): State<AppState>,
    PathParam(id): PathParam<i64>,
    JsonBody(payload): JsonBody<CategoryRequest>,
) -> Result<Json<Category>, AppError> {
    Ok(Json(state.categories.update(id, payload.try_into()?).await?))
}

#[instrument(skip(state))]
pub async fn delete_category(
    State(state): State<AppState>,
    PathParam(id): PathParam<i64>,
) -> Result<&'static str, AppError> {
    state.categories.delete(id).await?;
    Ok("Category deleted successfully")
}
