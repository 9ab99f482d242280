use axum::{routing::get, Router};

use crate::state::AppState;

pub mod health;
pub mod hello;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/hello", get(hello::hello))
}
