use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Request,
    },
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use time::OffsetDateTime;
use tracing::{error, warn};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    DuplicateCredential(&'static str),
    #[error("Invalid username or password")]
    InvalidCredential,
    #[error("{0}")]
    NotFound(String),
    #[error("Unauthorized: Full authentication is required to access this resource")]
    Unauthorized,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::DuplicateCredential(_) => StatusCode::CONFLICT,
            Self::InvalidCredential | Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text safe to show a client; internal causes stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            Self::Internal(_) => "An unexpected error occurred".into(),
            other => other.to_string(),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

/// Body shared by every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub status: u16,
    pub message: String,
    pub path: String,
}

/// Status and message of an error response, left on the response so
/// `render_errors` can rebuild the body with the request path.
#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub status: StatusCode,
    pub message: String,
}

impl ErrorReport {
    fn into_body(self, path: String) -> ErrorBody {
        ErrorBody {
            timestamp: OffsetDateTime::now_utc(),
            status: self.status.as_u16(),
            message: self.message,
            path,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            Self::Internal(e) => error!(error = ?e, "request failed"),
            other => warn!(%status, error = %other, "request rejected"),
        }

        let report = ErrorReport {
            status,
            message: self.public_message(),
        };
        let mut res = (status, Json(report.clone().into_body(String::new()))).into_response();
        res.extensions_mut().insert(report);
        res
    }
}

/// Fills in the request path on error bodies produced by `AppError`.
pub async fn render_errors(request: Request, next: Next) -> Response {
    let path = request.uri().path().to_owned();
    let res = next.run(request).await;

    match res.extensions().get::<ErrorReport>().cloned() {
        Some(report) => (report.status, Json(report.into_body(path))).into_response(),
        None => res,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, routing::get, Router};
    use tower::ServiceExt;

    async fn body_json(res: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .expect("read body");
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[test]
    fn maps_kinds_to_status_codes() {
        assert_eq!(AppError::validation("bad").status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::DuplicateCredential("Username already exists").status(),
            StatusCode::CONFLICT
        );
        assert_eq!(AppError::InvalidCredential.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::NotFound("Category not found with id: 1".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::from(anyhow::anyhow!("pool timed out")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn internal_errors_are_sanitised() {
        let err = AppError::from(anyhow::anyhow!("password authentication failed for user"));
        assert_eq!(err.public_message(), "An unexpected error occurred");
    }

    #[tokio::test]
    async fn error_body_carries_request_path() {
        let app = Router::new()
            .route(
                "/api/things/7",
                get(|| async { AppError::NotFound("Thing not found with id: 7".into()) }),
            )
            .layer(axum::middleware::from_fn(render_errors));

        let res = app
            .oneshot(
                axum::http::Request::builder()
                    .uri("/api/things/7")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let body = body_json(res).await;
        assert_eq!(body["status"], 404);
        assert_eq!(body["message"], "Thing not found with id: 7");
        assert_eq!(body["path"], "/api/things/7");
        assert!(body["timestamp"].is_string());
    }
}
