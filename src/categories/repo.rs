use async_trait::async_trait;
use sqlx::PgPool;

use crate::{
    categories::repo_types::{Category, CategoryData},
    db::RepoError,
};

#[async_trait]
pub trait CategoryRepo: Send + Sync {
    async fn list(&self) -> Result<Vec<Category>, RepoError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Category>, RepoError>;
    async fn exists(&self, id: i64) -> Result<bool, RepoError>;
    async fn insert(&self, data: CategoryData) -> Result<Category, RepoError>;
    /// `None` when no category has this id.
    async fn update(&self, id: i64, data: CategoryData) -> Result<Option<Category>, RepoError>;
    /// `false` when no category has this id.
    async fn delete(&self, id: i64) -> Result<bool, RepoError>;
}

pub struct PgCategoryRepo {
    db: PgPool,
}

impl PgCategoryRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CategoryRepo for PgCategoryRepo {
    async fn list(&self) -> Result<Vec<Category>, RepoError> {
        let rows = sqlx::query_as::<_, Category>(
            "SELECT id, name, description, icon FROM categories ORDER BY id",
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Category>, RepoError> {
        let row = sqlx::query_as::<_, Category>(
            "SELECT id, name, description, icon FROM categories WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn exists(&self, id: i64) -> Result<bool, RepoError> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM categories WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.db)
                .await?;
        Ok(exists)
    }

    async fn insert(&self, data: CategoryData) -> Result<Category, RepoError> {
        let row = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (name, description, icon)
            VALUES ($1, $2, $3)
            RETURNING id, name, description, icon
            "#,
        )
        .bind(&data.name)
        .bind(&data.description)
        .bind(&data.icon)
        .fetch_one(&self.db)
        .await?;
        Ok(row)
    }

    async fn update(&self, id: i64, data: CategoryData) -> Result<Option<Category>, RepoError> {
        let row = sqlx::query_as::<_, Category>(
            r#"
            UPDATE categories
               SET name = $2, description = $3, icon = $4
             WHERE id = $1
            RETURNING id, name, description, icon
            "#,
        )
        .bind(id)
        .bind(&data.name)
        .bind(&data.description)
        .bind(&data.icon)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn delete(&self, id: i64) -> Result<bool, RepoError> {
        let res = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}
