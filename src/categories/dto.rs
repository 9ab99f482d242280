use serde::Deserialize;

use super::repo_types::CategoryData;
use crate::error::AppError;

/// Body of `POST /api/categories` and `PUT /api/categories/:id`.
#[derive(Debug, Deserialize)]
pub struct CategoryRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
}

impl TryFrom<CategoryRequest> for CategoryData {
    type Error = AppError;

    fn try_from(req: CategoryRequest) -> Result<Self, Self::Error> {
        let name = req.name.trim().to_owned();
        if name.is_empty() {
            return Err(AppError::validation("Category name is required"));
        }
        Ok(Self {
            name,
            description: req.description,
            icon: req.icon,
        })
    }
}
