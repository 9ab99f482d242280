use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use super::middleware::Identity;
use crate::error::AppError;

/// Username of the authenticated caller.
pub struct AuthUser(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .map(|identity| AuthUser(identity.username.clone()))
            .ok_or(AppError::Unauthorized)
    }
}
