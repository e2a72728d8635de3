use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::auth::password::{Argon2Hasher, HashError, PasswordHasher, SecretString};
use crate::config::{
    AdminBootstrapConfig, AppConfig, DatabaseConfig, Environment, PasswordHashConfig, SecurityConfig, ServerConfig,
    StoreBackend,
};
use crate::database::models::{Group, Label, LabelCreate, Location, LocationCreate, User, UserCreate, UserUpdate};
use crate::database::{GroupStore, MemoryStore, ResourceStore, Store, StoreError, UserStore};

/// Argon2 with the smallest legal cost, so tests hash in microseconds
pub fn fast_hasher() -> Arc<dyn PasswordHasher> {
    Arc::new(Argon2Hasher::new(1024, 1, 1))
}

/// Hasher that always fails
pub struct FailingHasher;

impl PasswordHasher for FailingHasher {
    fn hash(&self, _password: &SecretString) -> Result<String, HashError> {
        Err(HashError::HashFailed)
    }

    fn verify(&self, _password: &SecretString, _hash: &str) -> Result<bool, HashError> {
        Err(HashError::HashFailed)
    }
}

#[derive(Debug, Default)]
struct Faults {
    lookup: bool,
    update: bool,
    set_superuser: bool,
    create_group: bool,
    labels: HashSet<String>,
    locations: HashSet<String>,
}

/// Wraps a `MemoryStore` and fails selected operations on demand
pub struct FlakyStore {
    inner: MemoryStore,
    faults: Mutex<Faults>,
}

impl FlakyStore {
    pub fn new(inner: MemoryStore) -> Self {
        Self {
            inner,
            faults: Mutex::new(Faults::default()),
        }
    }

    pub fn inner(&self) -> &MemoryStore {
        &self.inner
    }

    pub fn fail_lookup(&self) {
        self.faults.lock().unwrap().lookup = true;
    }

    pub fn fail_update(&self) {
        self.faults.lock().unwrap().update = true;
    }

    pub fn fail_set_superuser(&self) {
        self.faults.lock().unwrap().set_superuser = true;
    }

    pub fn fail_create_group(&self) {
        self.faults.lock().unwrap().create_group = true;
    }

    pub fn fail_label(&self, name: &str) {
        self.faults.lock().unwrap().labels.insert(name.to_string());
    }

    pub fn fail_location(&self, name: &str) {
        self.faults.lock().unwrap().locations.insert(name.to_string());
    }

    fn check(&self, pick: impl FnOnce(&Faults) -> bool, what: &str) -> Result<(), StoreError> {
        if pick(&self.faults.lock().unwrap()) {
            return Err(StoreError::QueryError(format!("injected failure: {what}")));
        }
        Ok(())
    }
}

#[async_trait]
impl UserStore for FlakyStore {
    async fn get_by_email(&self, email: &str) -> Result<User, StoreError> {
        self.check(|f| f.lookup, "get_by_email")?;
        self.inner.get_by_email(email).await
    }

    async fn get_by_id(&self, id: Uuid) -> Result<User, StoreError> {
        self.check(|f| f.lookup, "get_by_id")?;
        self.inner.get_by_id(id).await
    }

    async fn create(&self, data: UserCreate) -> Result<User, StoreError> {
        self.inner.create(data).await
    }

    async fn update(&self, id: Uuid, data: UserUpdate) -> Result<(), StoreError> {
        self.check(|f| f.update, "update")?;
        self.inner.update(id, data).await
    }

    async fn set_superuser(&self, id: Uuid, is_superuser: bool) -> Result<(), StoreError> {
        self.check(|f| f.set_superuser, "set_superuser")?;
        self.inner.set_superuser(id, is_superuser).await
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        self.inner.delete(id).await
    }

    async fn list_all(&self) -> Result<Vec<User>, StoreError> {
        self.check(|f| f.lookup, "list_all")?;
        self.inner.list_all().await
    }
}

#[async_trait]
impl GroupStore for FlakyStore {
    async fn create_group(&self, name: &str) -> Result<Group, StoreError> {
        self.check(|f| f.create_group, "create_group")?;
        self.inner.create_group(name).await
    }

    async fn get_group(&self, id: Uuid) -> Result<Group, StoreError> {
        self.inner.get_group(id).await
    }
}

#[async_trait]
impl ResourceStore for FlakyStore {
    async fn create_label(&self, group_id: Uuid, data: LabelCreate) -> Result<Label, StoreError> {
        self.check(|f| f.labels.contains(&data.name), "create_label")?;
        self.inner.create_label(group_id, data).await
    }

    async fn create_location(&self, group_id: Uuid, data: LocationCreate) -> Result<Location, StoreError> {
        self.check(|f| f.locations.contains(&data.name), "create_location")?;
        self.inner.create_location(group_id, data).await
    }

    async fn list_labels(&self, group_id: Uuid) -> Result<Vec<Label>, StoreError> {
        self.inner.list_labels(group_id).await
    }

    async fn list_locations(&self, group_id: Uuid) -> Result<Vec<Location>, StoreError> {
        self.inner.list_locations(group_id).await
    }
}

#[async_trait]
impl Store for FlakyStore {
    async fn health_check(&self) -> Result<(), StoreError> {
        self.inner.health_check().await
    }
}

/// Development-profile config with a fixed JWT secret and cheap hashing
pub fn test_config() -> AppConfig {
    AppConfig {
        environment: Environment::Development,
        server: ServerConfig { port: 0 },
        database: DatabaseConfig {
            backend: StoreBackend::Memory,
            url: None,
            max_connections: 1,
            connection_timeout: 1,
        },
        security: SecurityConfig {
            jwt_secret: SecretString::new("unit-test-secret"),
            jwt_expiry_hours: 1,
            allow_registration: true,
            demo: false,
        },
        password_hash: PasswordHashConfig {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        },
        admin: AdminBootstrapConfig::default(),
    }
}
