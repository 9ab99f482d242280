use std::sync::Arc;
use tracing::info;

use crate::{
    categories::{
        repo::CategoryRepo,
        repo_types::{Category, CategoryData},
    },
    error::AppError,
};

pub(crate) fn not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Category not found with id: {id}"))
}

#[derive(Clone)]
pub struct CategoryService {
    repo: Arc<dyn CategoryRepo>,
}

impl CategoryService {
    pub fn new(repo: Arc<dyn CategoryRepo>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, data: CategoryData) -> Result<Category, AppError> {
        let category = self.repo.insert(data).await?;
        info!(category_id = category.id, name = %category.name, "category created");
        Ok(category)
    }

    pub async fn list(&self) -> Result<Vec<Category>, AppError> {
        Ok(self.repo.list().await?)
    }

    pub async fn get(&self, id: i64) -> Result<Category, AppError> {
        self.repo.find_by_id(id).await?.ok_or_else(|| not_found(id))
    }

    pub async fn update(&self, id: i64, data: CategoryData) -> Result<Category, AppError> {
        let category = self.repo.update(id, data).await?.ok_or_else(|| not_found(id))?;
        info!(category_id = id, "category updated");
        Ok(category)
    }

    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        if !self.repo.delete(id).await? {
            return Err(not_found(id));
        }
        info!(category_id = id, "category deleted");
        Ok(())
    }
}
