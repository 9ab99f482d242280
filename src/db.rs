use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::config::AppConfig;

pub async fn connect(config: &AppConfig) -> anyhow::Result<PgPool> {
    let db = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
        .context("connect to database")?;
    Ok(db)
}

pub async fn migrate(db: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations")
        .run(db)
        .await
        .context("run database migrations")?;
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    /// A unique constraint rejected the write; carries the column name.
    #[error("duplicate value for {0}")]
    Conflict(&'static str),
    /// A foreign key pointed at a row that does not exist.
    #[error("referenced row does not exist")]
    MissingReference,
    #[error("invalid stored row: {0}")]
    InvalidRow(anyhow::Error),
    #[error(transparent)]
    Db(sqlx::Error),
}

/// Maps a unique constraint name from the migrations to the column it guards.
fn conflicting_column(constraint: Option<&str>) -> &'static str {
    match constraint {
        Some(c) if c.contains("email") => "email",
        Some(c) if c.contains("username") => "username",
        _ => "value",
    }
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return Self::Conflict(conflicting_column(db_err.constraint()));
            }
            if db_err.is_foreign_key_violation() {
                return Self::MissingReference;
            }
        }
        Self::Db(err)
    }
}

impl From<RepoError> for crate::error::AppError {
    fn from(err: RepoError) -> Self {
        Self::Internal(anyhow::Error::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_constraints_map_to_their_column() {
        let migration = include_str!("../migrations/0001_init.sql");
        for (constraint, column) in [
            ("users_email_key", "email"),
            ("users_username_key", "username"),
        ] {
            assert!(migration.contains(constraint), "{constraint} missing from schema");
            assert_eq!(conflicting_column(Some(constraint)), column);
        }
        assert_eq!(conflicting_column(None), "value");
    }
}
