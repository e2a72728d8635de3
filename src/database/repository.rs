// database/repository.rs - Credential store contracts
//
// Services only ever see these traits. Both the Postgres store and the
// in-memory store implement them with identical semantics: emails are
// normalized on every read and write, a missing row is `NotFound`, a duplicate
// email is `Conflict`, and a dangling group reference is `InvalidReference`.
//
// Every method is an async future; dropping it (client disconnect, request
// cancellation) abandons the in-flight call.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use super::models::{Group, Label, LabelCreate, Location, LocationCreate, User, UserCreate, UserUpdate};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    #[error("Query error: {0}")]
    QueryError(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get_by_email(&self, email: &str) -> Result<User, StoreError>;

    async fn get_by_id(&self, id: Uuid) -> Result<User, StoreError>;

    async fn create(&self, data: UserCreate) -> Result<User, StoreError>;

    /// Overwrites name and email. Idempotent.
    async fn update(&self, id: Uuid, data: UserUpdate) -> Result<(), StoreError>;

    /// Sets the superuser flag. Idempotent.
    async fn set_superuser(&self, id: Uuid, is_superuser: bool) -> Result<(), StoreError>;

    async fn delete(&self, id: Uuid) -> Result<(), StoreError>;

    async fn list_all(&self) -> Result<Vec<User>, StoreError>;
}

#[async_trait]
pub trait GroupStore: Send + Sync {
    async fn create_group(&self, name: &str) -> Result<Group, StoreError>;

    async fn get_group(&self, id: Uuid) -> Result<Group, StoreError>;
}

#[async_trait]
pub trait ResourceStore: Send + Sync {
    async fn create_label(&self, group_id: Uuid, data: LabelCreate) -> Result<Label, StoreError>;

    async fn create_location(&self, group_id: Uuid, data: LocationCreate) -> Result<Location, StoreError>;

    async fn list_labels(&self, group_id: Uuid) -> Result<Vec<Label>, StoreError>;

    async fn list_locations(&self, group_id: Uuid) -> Result<Vec<Location>, StoreError>;
}

/// Everything the services need from persistence.
#[async_trait]
pub trait Store: UserStore + GroupStore + ResourceStore {
    async fn health_check(&self) -> Result<(), StoreError>;
}
