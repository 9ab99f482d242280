use axum::Json;
use serde::Serialize;
use time::OffsetDateTime;
use tracing::debug;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: i64, // unix millis
    pub service: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    debug!("health check");
    let millis = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
    Json(HealthResponse {
        status: "UP",
        timestamp: millis as i64,
        service: env!("CARGO_PKG_NAME"),
    })
}
