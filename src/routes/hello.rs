use axum::Json;
use serde::Serialize;
use tracing::{info, instrument};

use crate::auth::extractors::AuthUser;

#[derive(Debug, Serialize)]
pub struct HelloResponse {
    pub message: String,
    pub status: &'static str,
}

#[instrument]
pub async fn hello(AuthUser(username): AuthUser) -> Json<HelloResponse> {
    info!("hello endpoint accessed");
    Json(HelloResponse {
        message: format!("Hello, {username}!"),
        status: "authenticated",
    })
}
