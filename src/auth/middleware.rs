use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::{debug, warn};

use super::{jwt::TokenCodec, policy::AccessPolicy};
use crate::error::AppError;

const BEARER_PREFIX: &str = "Bearer ";

/// Authenticated caller, bound to the request by `authenticate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub username: String,
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.strip_prefix(BEARER_PREFIX))
        .filter(|t| !t.is_empty())
}

/// Binds an `Identity` when the request carries a valid bearer token.
/// Never rejects; a bad or missing token leaves the request anonymous.
pub async fn authenticate(
    State(tokens): State<TokenCodec>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(token) = bearer_token(request.headers()) {
        match tokens.verify(token) {
            Ok(username) => {
                debug!(%username, "request authenticated");
                request.extensions_mut().insert(Identity { username });
            }
            Err(_) => debug!("bearer token rejected; continuing unauthenticated"),
        }
    }
    next.run(request).await
}

/// Rejects anonymous requests to routes outside the public allowlist.
pub async fn authorize(
    State(policy): State<Arc<AccessPolicy>>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path();
    if policy.is_public(path) || request.extensions().get::<Identity>().is_some() {
        return next.run(request).await;
    }
    warn!(%path, "unauthenticated request to protected route");
    AppError::Unauthorized.into_response()
}
