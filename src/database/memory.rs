// database/memory.rs - In-process credential store
//
// Used in development when no DATABASE_URL is configured, and by the test
// suites. One RwLock guards all tables so uniqueness and referential checks
// happen under the same write lock as the insert.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::models::{
    normalize_email, Group, Label, LabelCreate, Location, LocationCreate, User, UserCreate, UserUpdate,
};
use super::repository::{GroupStore, ResourceStore, Store, StoreError, UserStore};

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    groups: Vec<Group>,
    labels: Vec<Label>,
    locations: Vec<Location>,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn user_count(&self) -> usize {
        self.tables.read().await.users.len()
    }

    pub async fn group_count(&self) -> usize {
        self.tables.read().await.groups.len()
    }

    pub async fn groups(&self) -> Vec<Group> {
        self.tables.read().await.groups.clone()
    }
}

fn user_not_found(id: Uuid) -> StoreError {
    StoreError::NotFound(format!("user {id}"))
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn get_by_email(&self, email: &str) -> Result<User, StoreError> {
        let email = normalize_email(email);
        let tables = self.tables.read().await;
        tables
            .users
            .iter()
            .find(|u| u.email == email)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("user with email {email}")))
    }

    async fn get_by_id(&self, id: Uuid) -> Result<User, StoreError> {
        let tables = self.tables.read().await;
        tables
            .users
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or_else(|| user_not_found(id))
    }

    async fn create(&self, data: UserCreate) -> Result<User, StoreError> {
        let email = normalize_email(&data.email);
        let mut tables = self.tables.write().await;

        if tables.users.iter().any(|u| u.email == email) {
            return Err(StoreError::Conflict(format!("email {email} already in use")));
        }
        if !tables.groups.iter().any(|g| g.id == data.group_id) {
            return Err(StoreError::InvalidReference(format!("group {}", data.group_id)));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            name: data.name,
            email,
            password_hash: data.password_hash,
            is_superuser: data.is_superuser,
            is_owner: data.is_owner,
            group_id: data.group_id,
            created_at: now,
            updated_at: now,
        };
        tables.users.push(user.clone());

        Ok(user)
    }

    async fn update(&self, id: Uuid, data: UserUpdate) -> Result<(), StoreError> {
        let email = normalize_email(&data.email);
        let mut tables = self.tables.write().await;

        if tables.users.iter().any(|u| u.email == email && u.id != id) {
            return Err(StoreError::Conflict(format!("email {email} already in use")));
        }

        let user = tables
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| user_not_found(id))?;
        user.name = data.name;
        user.email = email;
        user.updated_at = Utc::now();

        Ok(())
    }

    async fn set_superuser(&self, id: Uuid, is_superuser: bool) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        let user = tables
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| user_not_found(id))?;
        user.is_superuser = is_superuser;
        user.updated_at = Utc::now();

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        let before = tables.users.len();
        tables.users.retain(|u| u.id != id);

        if tables.users.len() == before {
            return Err(user_not_found(id));
        }
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<User>, StoreError> {
        let mut users = self.tables.read().await.users.clone();
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(users)
    }
}

#[async_trait]
impl GroupStore for MemoryStore {
    async fn create_group(&self, name: &str) -> Result<Group, StoreError> {
        let now = Utc::now();
        let group = Group {
            id: Uuid::new_v4(),
            name: name.to_string(),
            created_at: now,
            updated_at: now,
        };
        self.tables.write().await.groups.push(group.clone());
        Ok(group)
    }

    async fn get_group(&self, id: Uuid) -> Result<Group, StoreError> {
        let tables = self.tables.read().await;
        tables
            .groups
            .iter()
            .find(|g| g.id == id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("group {id}")))
    }
}

#[async_trait]
impl ResourceStore for MemoryStore {
    async fn create_label(&self, group_id: Uuid, data: LabelCreate) -> Result<Label, StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.groups.iter().any(|g| g.id == group_id) {
            return Err(StoreError::InvalidReference(format!("group {group_id}")));
        }

        let label = Label {
            id: Uuid::new_v4(),
            group_id,
            name: data.name,
            color: data.color,
            created_at: Utc::now(),
        };
        tables.labels.push(label.clone());
        Ok(label)
    }

    async fn create_location(&self, group_id: Uuid, data: LocationCreate) -> Result<Location, StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.groups.iter().any(|g| g.id == group_id) {
            return Err(StoreError::InvalidReference(format!("group {group_id}")));
        }

        let location = Location {
            id: Uuid::new_v4(),
            group_id,
            name: data.name,
            created_at: Utc::now(),
        };
        tables.locations.push(location.clone());
        Ok(location)
    }

    async fn list_labels(&self, group_id: Uuid) -> Result<Vec<Label>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.labels.iter().filter(|l| l.group_id == group_id).cloned().collect())
    }

    async fn list_locations(&self, group_id: Uuid) -> Result<Vec<Location>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.locations.iter().filter(|l| l.group_id == group_id).cloned().collect())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
