use async_trait::async_trait;
use sqlx::PgPool;

use crate::{
    auth::repo_types::{NewUser, User, UserRow},
    db::RepoError,
};

#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;
    async fn exists_by_username(&self, username: &str) -> Result<bool, RepoError>;
    async fn exists_by_email(&self, email: &str) -> Result<bool, RepoError>;
    /// Stores a new user; a taken username or email yields `RepoError::Conflict`.
    async fn insert(&self, user: NewUser) -> Result<User, RepoError>;
}

const USER_COLUMNS: &str = "id, username, email, password_hash, first_name, last_name, \
                            role, is_active, created_at, updated_at";

pub struct PgUserRepo {
    db: PgPool,
}

impl PgUserRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

fn into_user(row: UserRow) -> Result<User, RepoError> {
    User::try_from(row).map_err(RepoError::InvalidRow)
}

#[async_trait]
impl UserRepo for PgUserRepo {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(&self.db)
        .await?;
        row.map(into_user).transpose()
    }

    async fn exists_by_username(&self, username: &str) -> Result<bool, RepoError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM users WHERE username = $1)",
        )
        .bind(username)
        .fetch_one(&self.db)
        .await?;
        Ok(exists)
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, RepoError> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM users WHERE email = $1)")
                .bind(email)
                .fetch_one(&self.db)
                .await?;
        Ok(exists)
    }

    async fn insert(&self, user: NewUser) -> Result<User, RepoError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO users (username, email, password_hash, first_name, last_name, role, is_active)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.role.as_str())
        .bind(user.is_active)
        .fetch_one(&self.db)
        .await?;
        into_user(row)
    }
}
