// services/account.rs - Registration, login and self-service account access

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::auth::password::{hash_blocking, verify_blocking, HashError, PasswordHasher, SecretString};
use crate::auth::{generate_jwt, ActorContext, Claims, JwtError, Role};
use crate::config::SecurityConfig;
use crate::database::models::{User, UserCreate};
use crate::database::{Store, StoreError};

use super::defaults::seed_group_defaults;

/// Group name given to every self-registered tenant.
pub const HOME_GROUP_NAME: &str = "Home";

const INVALID_CREDENTIALS: &str = "Invalid email or password";

#[derive(Debug, Error)]
pub enum AccountError {
    #[error("Registration is disabled")]
    RegistrationDisabled,

    #[error("{0}")]
    Validation(String),

    #[error("Account deletion is disabled in demo mode")]
    DemoMode,

    #[error("{}", INVALID_CREDENTIALS)]
    InvalidCredentials,

    #[error("password hashing failed: {0}")]
    Hash(#[from] HashError),

    #[error("token error: {0}")]
    Token(#[from] JwtError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: SecretString,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: SecretString,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_in: u64,
    pub user: User,
}

#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn Store>,
    hasher: Arc<dyn PasswordHasher>,
    security: SecurityConfig,
}

impl AccountService {
    pub fn new(store: Arc<dyn Store>, hasher: Arc<dyn PasswordHasher>, security: SecurityConfig) -> Self {
        Self { store, hasher, security }
    }

    /// New tenant: a "Home" group, its owner, and the starter resources.
    pub async fn register(&self, data: RegisterRequest) -> Result<User, AccountError> {
        if !self.security.allow_registration {
            return Err(AccountError::RegistrationDisabled);
        }
        for (field, value) in [("name", data.name.as_str()), ("email", data.email.as_str())] {
            if value.trim().is_empty() {
                return Err(AccountError::Validation(format!("{field} is required")));
            }
        }
        if data.password.expose_secret().is_empty() {
            return Err(AccountError::Validation("password is required".to_string()));
        }

        let password_hash = hash_blocking(&self.hasher, &data.password).await?;

        let group = self.store.create_group(HOME_GROUP_NAME).await?;
        let user = self
            .store
            .create(UserCreate {
                name: data.name.trim().to_string(),
                email: data.email.trim().to_string(),
                password_hash,
                is_superuser: false,
                is_owner: true,
                group_id: group.id,
            })
            .await?;

        let seeding = seed_group_defaults(self.store.as_ref(), group.id).await;
        info!(
            user_id = %user.id,
            group_id = %group.id,
            seeded_complete = seeding.is_complete(),
            "User registered"
        );
        Ok(user)
    }

    pub async fn login(&self, data: LoginRequest) -> Result<LoginResponse, AccountError> {
        let user = match self.store.get_by_email(&data.email).await {
            Ok(user) => user,
            Err(e) if e.is_not_found() => {
                debug!("Login attempt for unknown email");
                return Err(AccountError::InvalidCredentials);
            }
            Err(e) => return Err(e.into()),
        };

        if !verify_blocking(&self.hasher, &data.password, &user.password_hash).await? {
            warn!(user_id = %user.id, "Login failed: wrong password");
            return Err(AccountError::InvalidCredentials);
        }

        let claims = Claims::new(user.id, user.group_id, vec![Role::User], self.security.jwt_expiry_hours)?;
        let token = generate_jwt(&claims, &self.security)?;

        info!(user_id = %user.id, "User logged in");
        Ok(LoginResponse {
            token,
            expires_in: self.security.jwt_expiry_hours.saturating_mul(3600),
            user,
        })
    }

    pub async fn self_get(&self, actor: &ActorContext) -> Result<User, AccountError> {
        Ok(self.store.get_by_id(actor.user_id).await?)
    }

    /// Self-service removal. Not subject to the admin self-protection rules.
    pub async fn self_delete(&self, actor: &ActorContext) -> Result<(), AccountError> {
        if self.security.demo {
            return Err(AccountError::DemoMode);
        }
        self.store.delete(actor.user_id).await?;
        info!(user_id = %actor.user_id, "User deleted own account");
        Ok(())
    }
}
