// database/postgres.rs - Credential store backed by PostgreSQL
//
// Uniqueness of email and group membership are enforced by the schema in
// `manager.rs`; constraint violations are translated into `StoreError`
// variants here so callers never inspect driver errors.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::manager::DatabaseManager;
use super::models::{
    normalize_email, Group, Label, LabelCreate, Location, LocationCreate, User, UserCreate, UserUpdate,
};
use super::repository::{GroupStore, ResourceStore, Store, StoreError, UserStore};

const USER_COLUMNS: &str =
    "id, name, email, password_hash, is_superuser, is_owner, group_id, created_at, updated_at";

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Map constraint violations onto the store taxonomy
fn map_write_error(err: sqlx::Error, what: &str) -> StoreError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            return StoreError::Conflict(format!("{what} already exists"));
        }
        if db.is_foreign_key_violation() {
            return StoreError::InvalidReference(format!("{what} references a missing group"));
        }
    }
    StoreError::Sqlx(err)
}

fn require_row(rows_affected: u64, id: Uuid) -> Result<(), StoreError> {
    if rows_affected == 0 {
        return Err(StoreError::NotFound(format!("user {id}")));
    }
    Ok(())
}

/// Emails are stored normalized, so lookups compare the column as-is.
/// Case folding happens only in `normalize_email`, never in SQL.
fn user_by_email_sql() -> String {
    format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1")
}

#[async_trait]
impl UserStore for PgStore {
    async fn get_by_email(&self, email: &str) -> Result<User, StoreError> {
        let email = normalize_email(email);
        let query = user_by_email_sql();

        sqlx::query_as::<_, User>(&query)
            .bind(&email)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("user with email {email}")))
    }

    async fn get_by_id(&self, id: Uuid) -> Result<User, StoreError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");

        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("user {id}")))
    }

    async fn create(&self, data: UserCreate) -> Result<User, StoreError> {
        let query = format!(
            r#"
            INSERT INTO users (id, name, email, password_hash, is_superuser, is_owner, group_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {USER_COLUMNS}
            "#
        );

        sqlx::query_as::<_, User>(&query)
            .bind(Uuid::new_v4())
            .bind(&data.name)
            .bind(normalize_email(&data.email))
            .bind(&data.password_hash)
            .bind(data.is_superuser)
            .bind(data.is_owner)
            .bind(data.group_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_write_error(e, "user email"))
    }

    async fn update(&self, id: Uuid, data: UserUpdate) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE users SET name = $2, email = $3, updated_at = now() WHERE id = $1",
        )
        .bind(id)
        .bind(&data.name)
        .bind(normalize_email(&data.email))
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "user email"))?;

        require_row(result.rows_affected(), id)
    }

    async fn set_superuser(&self, id: Uuid, is_superuser: bool) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE users SET is_superuser = $2, updated_at = now() WHERE id = $1",
        )
        .bind(id)
        .bind(is_superuser)
        .execute(&self.pool)
        .await?;

        require_row(result.rows_affected(), id)
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        require_row(result.rows_affected(), id)
    }

    async fn list_all(&self) -> Result<Vec<User>, StoreError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users ORDER BY created_at");

        Ok(sqlx::query_as::<_, User>(&query).fetch_all(&self.pool).await?)
    }
}

#[async_trait]
impl GroupStore for PgStore {
    async fn create_group(&self, name: &str) -> Result<Group, StoreError> {
        Ok(sqlx::query_as::<_, Group>(
            "INSERT INTO groups (id, name) VALUES ($1, $2) RETURNING id, name, created_at, updated_at",
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn get_group(&self, id: Uuid) -> Result<Group, StoreError> {
        sqlx::query_as::<_, Group>("SELECT id, name, created_at, updated_at FROM groups WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("group {id}")))
    }
}

#[async_trait]
impl ResourceStore for PgStore {
    async fn create_label(&self, group_id: Uuid, data: LabelCreate) -> Result<Label, StoreError> {
        sqlx::query_as::<_, Label>(
            r#"
            INSERT INTO labels (id, group_id, name, color)
            VALUES ($1, $2, $3, $4)
            RETURNING id, group_id, name, color, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(group_id)
        .bind(&data.name)
        .bind(&data.color)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "label"))
    }

    async fn create_location(&self, group_id: Uuid, data: LocationCreate) -> Result<Location, StoreError> {
        sqlx::query_as::<_, Location>(
            r#"
            INSERT INTO locations (id, group_id, name)
            VALUES ($1, $2, $3)
            RETURNING id, group_id, name, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(group_id)
        .bind(&data.name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "location"))
    }

    async fn list_labels(&self, group_id: Uuid) -> Result<Vec<Label>, StoreError> {
        Ok(sqlx::query_as::<_, Label>(
            "SELECT id, group_id, name, color, created_at FROM labels WHERE group_id = $1 ORDER BY created_at",
        )
        .bind(group_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn list_locations(&self, group_id: Uuid) -> Result<Vec<Location>, StoreError> {
        Ok(sqlx::query_as::<_, Location>(
            "SELECT id, group_id, name, created_at FROM locations WHERE group_id = $1 ORDER BY created_at",
        )
        .bind(group_id)
        .fetch_all(&self.pool)
        .await?)
    }
}

#[async_trait]
impl Store for PgStore {
    async fn health_check(&self) -> Result<(), StoreError> {
        DatabaseManager::health_check(&self.pool)
            .await
            .map_err(|e| StoreError::QueryError(e.to_string()))
    }
}
