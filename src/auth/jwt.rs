use anyhow::Context;
use axum::extract::FromRef;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use time::{Duration, OffsetDateTime};
use tracing::debug;

use super::claims::Claims;
use crate::{
    config::{JwtConfig, MAX_TTL_MINUTES},
    state::AppState,
};

/// Returned for every rejected token, whatever the cause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid token")]
pub struct InvalidToken;

/// Issues and verifies HS256 tokens carrying a subject and issuer.
#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    ttl: Duration,
}

impl FromRef<AppState> for TokenCodec {
    fn from_ref(state: &AppState) -> Self {
        state.tokens.clone()
    }
}

impl TokenCodec {
    pub fn new(cfg: &JwtConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            issuer: cfg.issuer.clone(),
            ttl: Duration::minutes(cfg.ttl_minutes.clamp(0, MAX_TTL_MINUTES)),
        }
    }

    pub fn issue(&self, subject: &str) -> anyhow::Result<String> {
        self.issue_at(subject, OffsetDateTime::now_utc())
    }

    pub fn issue_at(&self, subject: &str, now: OffsetDateTime) -> anyhow::Result<String> {
        let expires = now
            .checked_add(self.ttl)
            .context("token expiry out of range")?;
        let claims = Claims {
            sub: subject.to_owned(),
            iss: self.issuer.clone(),
            iat: now.unix_timestamp(),
            exp: expires.unix_timestamp(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?;
        debug!(username = %subject, "jwt signed");
        Ok(token)
    }

    /// Returns the token's subject if it is authentic, from our issuer and
    /// not yet expired.
    pub fn verify(&self, token: &str) -> Result<String, InvalidToken> {
        self.verify_at(token, OffsetDateTime::now_utc())
    }

    pub fn verify_at(&self, token: &str, now: OffsetDateTime) -> Result<String, InvalidToken> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        // expiry is checked below against `now`, with no leeway
        validation.validate_exp = false;
        validation.leeway = 0;

        let claims = decode::<Claims>(token, &self.decoding, &validation)
            .map_err(|_| InvalidToken)?
            .claims;

        if now.unix_timestamp() >= claims.exp || claims.sub.trim().is_empty() {
            return Err(InvalidToken);
        }
        debug!(username = %claims.sub, "jwt verified");
        Ok(claims.sub)
    }
}
