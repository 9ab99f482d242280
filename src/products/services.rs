use std::sync::Arc;
use tracing::info;

use crate::{
    categories::{repo::CategoryRepo, services::not_found as category_not_found},
    db::RepoError,
    error::AppError,
    products::{
        repo::ProductRepo,
        repo_types::{Product, ProductData},
    },
};

fn not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Product not found with id: {id}"))
}

#[derive(Clone)]
pub struct ProductService {
    products: Arc<dyn ProductRepo>,
    categories: Arc<dyn CategoryRepo>,
}

impl ProductService {
    pub fn new(products: Arc<dyn ProductRepo>, categories: Arc<dyn CategoryRepo>) -> Self {
        Self {
            products,
            categories,
        }
    }

    async fn check_category(&self, category_id: Option<i64>) -> Result<(), AppError> {
        if let Some(id) = category_id {
            if !self.categories.exists(id).await? {
                return Err(category_not_found(id));
            }
        }
        Ok(())
    }

    /// Maps a foreign key failure (category deleted since the check) to
    /// the same error the check gives.
    fn write_error(err: RepoError, category_id: Option<i64>) -> AppError {
        match (err, category_id) {
            (RepoError::MissingReference, Some(id)) => category_not_found(id),
            (other, _) => other.into(),
        }
    }

    pub async fn create(&self, data: ProductData) -> Result<Product, AppError> {
        let category_id = data.category_id;
        self.check_category(category_id).await?;
        let product = self
            .products
            .insert(data)
            .await
            .map_err(|e| Self::write_error(e, category_id))?;
        info!(product_id = product.id, name = %product.name, "product created");
        Ok(product)
    }

    pub async fn list(&self) -> Result<Vec<Product>, AppError> {
        Ok(self.products.list().await?)
    }

    pub async fn list_by_category(&self, category_id: i64) -> Result<Vec<Product>, AppError> {
        Ok(self.products.list_by_category(category_id).await?)
    }

    pub async fn get(&self, id: i64) -> Result<Product, AppError> {
        self.products.find_by_id(id).await?.ok_or_else(|| not_found(id))
    }

    pub async fn update(&self, id: i64, data: ProductData) -> Result<Product, AppError> {
        let category_id = data.category_id;
        if self.products.find_by_id(id).await?.is_none() {
            return Err(not_found(id));
        }
        self.check_category(category_id).await?;
        let product = self
            .products
            .update(id, data)
            .await
            .map_err(|e| Self::write_error(e, category_id))?
            .ok_or_else(|| not_found(id))?;
        info!(product_id = id, "product updated");
        Ok(product)
    }

    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        if !self.products.delete(id).await? {
            return Err(not_found(id));
        }
        info!(product_id = id, "product deleted");
        Ok(())
    }
}
