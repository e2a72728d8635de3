// services/user_admin.rs - Superuser-only user administration
//
// Callers must already have passed the privilege gate; this service only
// enforces the per-operation safety rules (no self-deletion, no self-demotion)
// and the two-step profile/privilege update.

use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::password::{hash_blocking, HashError, PasswordHasher, SecretString};
use crate::auth::ActorContext;
use crate::database::models::{User, UserCreate, UserUpdate};
use crate::database::{Store, StoreError};

#[derive(Debug, Error)]
pub enum AdminError {
    #[error("{0}")]
    Validation(String),

    #[error("Invalid id: {0}")]
    InvalidId(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Forbidden(&'static str),

    #[error("password hashing failed: {0}")]
    Hash(#[from] HashError),

    #[error("store error: {0}")]
    Store(StoreError),

    /// Profile saved, superuser flag not. Retry `set_superuser` only.
    #[error("profile of user {user_id} was updated but the superuser flag was not: {source}")]
    PrivilegeNotApplied {
        user_id: Uuid,
        #[source]
        source: StoreError,
    },
}

impl From<StoreError> for AdminError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(what) => AdminError::NotFound(format!("Not found: {what}")),
            other => AdminError::Store(other),
        }
    }
}

/// Ids arrive as path strings; anything unparseable never reaches the store.
pub fn parse_id(raw: &str) -> Result<Uuid, AdminError> {
    Uuid::parse_str(raw.trim()).map_err(|_| AdminError::InvalidId(raw.to_string()))
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdminUserCreate {
    pub name: String,
    pub email: String,
    pub password: SecretString,
    #[serde(default)]
    pub is_superuser: bool,
    #[serde(default)]
    pub group_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdminUserUpdate {
    pub name: String,
    pub email: String,
    pub is_superuser: bool,
}

fn require_non_empty(field: &str, value: &str) -> Result<(), AdminError> {
    if value.trim().is_empty() {
        return Err(AdminError::Validation(format!("{field} is required")));
    }
    Ok(())
}

fn profile(name: &str, email: &str) -> Result<UserUpdate, AdminError> {
    require_non_empty("name", name)?;
    require_non_empty("email", email)?;
    Ok(UserUpdate {
        name: name.trim().to_string(),
        email: email.trim().to_string(),
    })
}

#[derive(Clone)]
pub struct AdminService {
    store: Arc<dyn Store>,
    hasher: Arc<dyn PasswordHasher>,
    demo: bool,
}

impl AdminService {
    pub fn new(store: Arc<dyn Store>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self {
            store,
            hasher,
            demo: false,
        }
    }

    /// Demo deployments keep their accounts: deletion is refused.
    pub fn with_demo(mut self, demo: bool) -> Self {
        self.demo = demo;
        self
    }

    pub async fn list_users(&self) -> Result<Vec<User>, AdminError> {
        Ok(self.store.list_all().await?)
    }

    pub async fn create_user(&self, actor: &ActorContext, data: AdminUserCreate) -> Result<User, AdminError> {
        let UserUpdate { name, email } = profile(&data.name, &data.email)?;
        if data.password.expose_secret().is_empty() {
            return Err(AdminError::Validation("password is required".to_string()));
        }

        let group_id = match data.group_id.as_deref().map(str::trim) {
            None | Some("") => actor.group_id,
            Some(raw) => match parse_id(raw)? {
                id if id.is_nil() => actor.group_id,
                id => {
                    self.store.get_group(id).await?;
                    id
                }
            },
        };

        let password_hash = hash_blocking(&self.hasher, &data.password).await?;

        let user = self
            .store
            .create(UserCreate {
                name,
                email,
                password_hash,
                is_superuser: data.is_superuser,
                is_owner: false,
                group_id,
            })
            .await?;

        info!(
            actor = %actor.user_id,
            user_id = %user.id,
            %group_id,
            is_superuser = user.is_superuser,
            "Admin created user"
        );
        Ok(user)
    }

    /// Step (a) of an update: name and email only.
    pub async fn update_profile(&self, id: Uuid, name: &str, email: &str) -> Result<(), AdminError> {
        let update = profile(name, email)?;
        Ok(self.store.update(id, update).await?)
    }

    /// Step (b) of an update: the superuser flag only.
    pub async fn set_superuser(&self, actor: &ActorContext, id: Uuid, is_superuser: bool) -> Result<(), AdminError> {
        refuse_self_demotion(actor, id, is_superuser)?;
        self.store.set_superuser(id, is_superuser).await?;

        info!(actor = %actor.user_id, user_id = %id, is_superuser, "Superuser flag changed");
        Ok(())
    }

    pub async fn update_user(&self, actor: &ActorContext, id: Uuid, data: AdminUserUpdate) -> Result<User, AdminError> {
        let update = profile(&data.name, &data.email)?;
        refuse_self_demotion(actor, id, data.is_superuser)?;

        self.store.update(id, update).await?;

        if let Err(source) = self.store.set_superuser(id, data.is_superuser).await {
            warn!(
                actor = %actor.user_id,
                user_id = %id,
                error = %source,
                "Profile updated but superuser flag was not applied"
            );
            return Err(AdminError::PrivilegeNotApplied { user_id: id, source });
        }

        info!(actor = %actor.user_id, user_id = %id, is_superuser = data.is_superuser, "Admin updated user");
        Ok(self.store.get_by_id(id).await?)
    }

    pub async fn delete_user(&self, actor: &ActorContext, id: Uuid) -> Result<(), AdminError> {
        if self.demo {
            return Err(AdminError::Forbidden("User deletion is disabled in demo mode"));
        }
        if id == actor.user_id {
            return Err(AdminError::Forbidden("Cannot delete your own account"));
        }

        self.store.delete(id).await?;

        info!(actor = %actor.user_id, user_id = %id, "Admin deleted user");
        Ok(())
    }
}

fn refuse_self_demotion(actor: &ActorContext, id: Uuid, is_superuser: bool) -> Result<(), AdminError> {
    if id == actor.user_id && !is_superuser {
        return Err(AdminError::Forbidden("Cannot remove your own superuser privilege"));
    }
    Ok(())
}
