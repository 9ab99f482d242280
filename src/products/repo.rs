use async_trait::async_trait;
use sqlx::PgPool;

use crate::{
    db::RepoError,
    products::repo_types::{Product, ProductData},
};

#[async_trait]
pub trait ProductRepo: Send + Sync {
    async fn list(&self) -> Result<Vec<Product>, RepoError>;
    async fn list_by_category(&self, category_id: i64) -> Result<Vec<Product>, RepoError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Product>, RepoError>;
    async fn insert(&self, data: ProductData) -> Result<Product, RepoError>;
    /// `None` when no product has this id.
    async fn update(&self, id: i64, data: ProductData) -> Result<Option<Product>, RepoError>;
    /// `false` when no product has this id.
    async fn delete(&self, id: i64) -> Result<bool, RepoError>;
}

const PRODUCT_COLUMNS: &str =
    "id, name, description, price, stock, image_url, category_id, created_at, updated_at";

pub struct PgProductRepo {
    db: PgPool,
}

impl PgProductRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductRepo for PgProductRepo {
    async fn list(&self) -> Result<Vec<Product>, RepoError> {
        let rows = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id"
        ))
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn list_by_category(&self, category_id: i64) -> Result<Vec<Product>, RepoError> {
        let rows = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE category_id = $1 ORDER BY id"
        ))
        .bind(category_id)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Product>, RepoError> {
        let row = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn insert(&self, data: ProductData) -> Result<Product, RepoError> {
        let row = sqlx::query_as::<_, Product>(&format!(
            r#"
            INSERT INTO products (name, description, price, stock, image_url, category_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(&data.name)
        .bind(&data.description)
        .bind(data.price)
        .bind(data.stock)
        .bind(&data.image_url)
        .bind(data.category_id)
        .fetch_one(&self.db)
        .await?;
        Ok(row)
    }

    async fn update(&self, id: i64, data: ProductData) -> Result<Option<Product>, RepoError> {
        let row = sqlx::query_as::<_, Product>(&format!(
            r#"
            UPDATE products
               SET name = $2,
                   description = $3,
                   price = $4,
                   stock = $5,
                   image_url = $6,
                   category_id = COALESCE($7, category_id),
                   updated_at = now()
             WHERE id = $1
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&data.name)
        .bind(&data.description)
        .bind(data.price)
        .bind(data.stock)
        .bind(&data.image_url)
        .bind(data.category_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn delete(&self, id: i64) -> Result<bool, RepoError> {
        let res = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}
