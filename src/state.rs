use sqlx::PgPool;
use std::sync::Arc;

use crate::{
    auth::{
        jwt::TokenCodec,
        password::PasswordEncoder,
        policy::AccessPolicy,
        repo::{PgUserRepo, UserRepo},
        services::CredentialService,
    },
    categories::{
        repo::{CategoryRepo, PgCategoryRepo},
        services::CategoryService,
    },
    config::AppConfig,
    products::{
        repo::{PgProductRepo, ProductRepo},
        services::ProductService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub tokens: TokenCodec,
    pub policy: Arc<AccessPolicy>,
    pub credentials: CredentialService,
    pub categories: CategoryService,
    pub products: ProductService,
}

impl AppState {
    pub fn from_pool(config: &AppConfig, db: PgPool) -> anyhow::Result<Self> {
        Self::from_repos(
            config,
            Arc::new(PgUserRepo::new(db.clone())),
            Arc::new(PgCategoryRepo::new(db.clone())),
            Arc::new(PgProductRepo::new(db)),
        )
    }

    pub fn from_repos(
        config: &AppConfig,
        users: Arc<dyn UserRepo>,
        categories: Arc<dyn CategoryRepo>,
        products: Arc<dyn ProductRepo>,
    ) -> anyhow::Result<Self> {
        let tokens = TokenCodec::new(&config.jwt);
        let passwords = PasswordEncoder::new(&config.password)?;
        let policy = Arc::new(AccessPolicy::new(&config.public_paths));

        Ok(Self {
            credentials: CredentialService::new(users, passwords, tokens.clone()),
            categories: CategoryService::new(categories.clone()),
            products: ProductService::new(products, categories),
            tokens,
            policy,
        })
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        Self::fake_with(crate::testing::test_config())
    }

    #[cfg(test)]
    pub fn fake_with(config: AppConfig) -> Self {
        let store = Arc::new(crate::testing::MemoryStore::default());
        Self::from_repos(&config, store.clone(), store.clone(), store).expect("fake state")
    }
}
