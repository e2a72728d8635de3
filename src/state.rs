use std::sync::Arc;

use crate::auth::PasswordHasher;
use crate::config::AppConfig;
use crate::database::Store;
use crate::services::{AccountService, AdminService};

/// Shared by every request; cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub hasher: Arc<dyn PasswordHasher>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, hasher: Arc<dyn PasswordHasher>, config: AppConfig) -> Self {
        Self {
            store,
            hasher,
            config: Arc::new(config),
        }
    }

    pub fn admin(&self) -> AdminService {
        AdminService::new(Arc::clone(&self.store), Arc::clone(&self.hasher)).with_demo(self.config.security.demo)
    }

    pub fn accounts(&self) -> AccountService {
        AccountService::new(
            Arc::clone(&self.store),
            Arc::clone(&self.hasher),
            self.config.security.clone(),
        )
    }
}
