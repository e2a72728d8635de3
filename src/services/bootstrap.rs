// services/bootstrap.rs - Admin bootstrap reconciliation
//
// Runs once at process start, before the server accepts requests. Converges
// the store towards "the configured email belongs to a superuser" and reports
// what it did. It never returns an error to the caller: failures are reported
// as `BootstrapOutcome::Failed` so startup can log them and carry on.

use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::auth::password::{hash_blocking, HashError, PasswordHasher};
use crate::config::AdminBootstrapConfig;
use crate::database::models::{UserCreate, UserUpdate};
use crate::database::{Store, StoreError};

use super::defaults::{seed_group_defaults, SeedReport};

/// Name of the group created for a freshly bootstrapped admin.
pub const ADMIN_GROUP_NAME: &str = "Admin Group";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    Disabled,
    Misconfigured { missing: Vec<&'static str> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BootstrapStage {
    Lookup,
    UpdateProfile,
    SetSuperuser,
    Hash,
    CreateGroup,
    CreateUser,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("{stage:?} failed: {source}")]
    Store {
        stage: BootstrapStage,
        #[source]
        source: StoreError,
    },

    #[error("password hashing failed: {0}")]
    Hash(#[from] HashError),
}

impl BootstrapError {
    fn store(stage: BootstrapStage) -> impl FnOnce(StoreError) -> Self {
        move |source| BootstrapError::Store { stage, source }
    }

    pub fn stage(&self) -> BootstrapStage {
        match self {
            BootstrapError::Store { stage, .. } => *stage,
            BootstrapError::Hash(_) => BootstrapStage::Hash,
        }
    }
}

#[derive(Debug)]
pub enum BootstrapOutcome {
    Skipped(SkipReason),
    AlreadySatisfied {
        user_id: Uuid,
    },
    Promoted {
        user_id: Uuid,
    },
    Created {
        user_id: Uuid,
        group_id: Uuid,
        seeding: SeedReport,
    },
    Failed(BootstrapError),
}

impl BootstrapOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            BootstrapOutcome::Skipped(_) => "skipped",
            BootstrapOutcome::AlreadySatisfied { .. } => "already_satisfied",
            BootstrapOutcome::Promoted { .. } => "promoted",
            BootstrapOutcome::Created { .. } => "created",
            BootstrapOutcome::Failed(_) => "failed",
        }
    }
}

pub struct BootstrapReconciler {
    store: Arc<dyn Store>,
    hasher: Arc<dyn PasswordHasher>,
}

impl BootstrapReconciler {
    pub fn new(store: Arc<dyn Store>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { store, hasher }
    }

    pub async fn reconcile(&self, request: &AdminBootstrapConfig) -> BootstrapOutcome {
        if !request.enabled {
            debug!("Admin user creation not requested");
            return BootstrapOutcome::Skipped(SkipReason::Disabled);
        }

        let missing = request.missing_fields();
        if !missing.is_empty() {
            warn!(
                missing = ?missing,
                "Admin user creation requested but required environment variables are empty"
            );
            return BootstrapOutcome::Skipped(SkipReason::Misconfigured { missing });
        }

        match self.try_reconcile(request).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(stage = ?e.stage(), error = %e, "Admin bootstrap failed");
                BootstrapOutcome::Failed(e)
            }
        }
    }

    async fn try_reconcile(&self, request: &AdminBootstrapConfig) -> Result<BootstrapOutcome, BootstrapError> {
        let email = request.email.trim();

        match self.store.get_by_email(email).await {
            Ok(existing) if existing.is_superuser => {
                info!(email, user_id = %existing.id, "Admin user already exists and is a superuser");
                Ok(BootstrapOutcome::AlreadySatisfied { user_id: existing.id })
            }
            Ok(existing) => {
                info!(email, user_id = %existing.id, "Promoting existing user to superuser");
                self.promote(existing.id, request).await?;
                info!(email, user_id = %existing.id, "User is now a superuser");
                Ok(BootstrapOutcome::Promoted { user_id: existing.id })
            }
            Err(e) if e.is_not_found() => self.create(request).await,
            Err(e) => Err(BootstrapError::store(BootstrapStage::Lookup)(e)),
        }
    }

    /// Profile first, privilege second; a failed profile update stops here.
    async fn promote(&self, user_id: Uuid, request: &AdminBootstrapConfig) -> Result<(), BootstrapError> {
        let update = UserUpdate {
            name: request.name.trim().to_string(),
            email: request.email.trim().to_string(),
        };
        self.store
            .update(user_id, update)
            .await
            .map_err(BootstrapError::store(BootstrapStage::UpdateProfile))?;

        self.store
            .set_superuser(user_id, true)
            .await
            .map_err(BootstrapError::store(BootstrapStage::SetSuperuser))
    }

    async fn create(&self, request: &AdminBootstrapConfig) -> Result<BootstrapOutcome, BootstrapError> {
        info!(email = %request.email.trim(), "Creating admin user");

        // Hash before touching the store so a hashing failure leaves nothing behind.
        let password_hash = hash_blocking(&self.hasher, &request.password).await?;

        let group = self
            .store
            .create_group(ADMIN_GROUP_NAME)
            .await
            .map_err(BootstrapError::store(BootstrapStage::CreateGroup))?;

        let user = self
            .store
            .create(UserCreate {
                name: request.name.trim().to_string(),
                email: request.email.trim().to_string(),
                password_hash,
                is_superuser: true,
                is_owner: true,
                group_id: group.id,
            })
            .await
            .map_err(BootstrapError::store(BootstrapStage::CreateUser))?;

        info!(email = %user.email, user_id = %user.id, group_id = %group.id, "Admin user created");

        let seeding = seed_group_defaults(self.store.as_ref(), group.id).await;
        if !seeding.is_complete() {
            warn!(
                group_id = %group.id,
                failures = seeding.failures.len(),
                "Some default resources could not be created"
            );
        }

        Ok(BootstrapOutcome::Created {
            user_id: user.id,
            group_id: group.id,
            seeding,
        })
    }
}
