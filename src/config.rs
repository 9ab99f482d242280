use anyhow::{bail, Context};

/// One year.
pub const MAX_TTL_MINUTES: i64 = 60 * 24 * 365;

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub ttl_minutes: i64,
}

/// Argon2 cost parameters.
#[derive(Debug, Clone)]
pub struct PasswordConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            memory_kib: argon2::Params::DEFAULT_M_COST,
            iterations: argon2::Params::DEFAULT_T_COST,
            parallelism: argon2::Params::DEFAULT_P_COST,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub database_max_connections: u32,
    pub jwt: JwtConfig,
    pub password: PasswordConfig,
    /// Path patterns reachable without a bearer token.
    pub public_paths: Vec<String>,
}

pub const DEFAULT_PUBLIC_PATHS: &[&str] = &["/register", "/login", "/health"];

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let parsed = |key: &str| lookup(key).and_then(|v| v.trim().parse::<u32>().ok());

        let database_url = lookup("DATABASE_URL").context("DATABASE_URL must be set")?;
        let ttl_minutes = lookup("JWT_TTL_MINUTES")
            .and_then(|v| v.trim().parse::<i64>().ok())
            .filter(|m| *m > 0)
            .unwrap_or(60);
        if ttl_minutes > MAX_TTL_MINUTES {
            bail!("JWT_TTL_MINUTES must be at most {MAX_TTL_MINUTES}, got {ttl_minutes}");
        }
        let jwt = JwtConfig {
            secret: lookup("JWT_SECRET").context("JWT_SECRET must be set")?,
            issuer: lookup("JWT_ISSUER").unwrap_or_else(|| "inventory-api".into()),
            ttl_minutes,
        };

        let defaults = PasswordConfig::default();
        let password = PasswordConfig {
            memory_kib: parsed("PASSWORD_MEMORY_KIB").unwrap_or(defaults.memory_kib),
            iterations: parsed("PASSWORD_ITERATIONS").unwrap_or(defaults.iterations),
            parallelism: parsed("PASSWORD_PARALLELISM").unwrap_or(defaults.parallelism),
        };

        let public_paths = match lookup("AUTH_PUBLIC_PATHS") {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(String::from)
                .collect(),
            None => DEFAULT_PUBLIC_PATHS.iter().map(|p| p.to_string()).collect(),
        };

        Ok(Self {
            database_url,
            database_max_connections: parsed("DATABASE_MAX_CONNECTIONS").unwrap_or(10),
            jwt,
            password,
            public_paths,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn applies_defaults_for_optional_values() {
        let cfg = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/inventory"),
            ("JWT_SECRET", "s3cret"),
        ]))
        .expect("config should load");

        assert_eq!(cfg.jwt.issuer, "inventory-api");
        assert_eq!(cfg.jwt.ttl_minutes, 60);
        assert_eq!(cfg.database_max_connections, 10);
        assert_eq!(cfg.public_paths, vec!["/register", "/login", "/health"]);
        assert_eq!(cfg.password.iterations, argon2::Params::DEFAULT_T_COST);
    }

    #[test]
    fn requires_secret_and_database_url() {
        let err = AppConfig::from_lookup(lookup_from(&[("DATABASE_URL", "postgres://x")]))
            .unwrap_err();
        assert!(err.to_string().contains("JWT_SECRET"));

        let err = AppConfig::from_lookup(lookup_from(&[("JWT_SECRET", "x")])).unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));
    }

    #[test]
    fn parses_public_paths_and_ignores_bad_numbers() {
        let cfg = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://x"),
            ("JWT_SECRET", "x"),
            ("JWT_TTL_MINUTES", "soon"),
            ("AUTH_PUBLIC_PATHS", " /login, /register ,,/api/categories/**"),
        ]))
        .expect("config should load");

        assert_eq!(cfg.jwt.ttl_minutes, 60);
        assert_eq!(
            cfg.public_paths,
            vec!["/login", "/register", "/api/categories/**"]
        );
    }

    #[test]
    fn rejects_oversized_token_lifetime() {
        let err = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://x"),
            ("JWT_SECRET", "x"),
            ("JWT_TTL_MINUTES", "9223372036854775807"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("JWT_TTL_MINUTES"));
    }
}
