//! Credential store
//!
//! Authentication is written once against [`UserStore`]; the SQLite
//! implementation below is the production backend. Password hashing lives here,
//! mirroring a pre-save hook: whenever a plaintext password is set on a local
//! account it is hashed before it reaches the database.

use async_trait::async_trait;
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::auth::models::{Provider, User};
use crate::auth::password::{hash_password_blocking, PasswordError};
use crate::common::{generate_user_id, normalize_email, safe_email_log, timestamp_now, ApiError};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("An account with this email already exists.")]
    DuplicateEmail,

    #[error("This external account is already linked to another user.")]
    DuplicateProviderId,

    #[error("A password is required for local accounts.")]
    MissingPassword,

    #[error("User not found.")]
    NotFound,

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::DuplicateEmail | StoreError::DuplicateProviderId => {
                ApiError::Conflict(e.to_string())
            }
            StoreError::MissingPassword => ApiError::ValidationError(e.to_string()),
            StoreError::NotFound => ApiError::NotFound(e.to_string()),
            StoreError::Password(inner) => ApiError::InternalServer(inner.to_string()),
            StoreError::Database(inner) => ApiError::DatabaseError(inner),
        }
    }
}

/// Fields for a new user; `password` is plaintext and only used for local accounts
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub password: Option<String>,
    pub provider: Provider,
    pub provider_id: Option<String>,
}

/// Partial update; `None` leaves the column untouched
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub password: Option<String>,
    pub provider: Option<Provider>,
    pub provider_id: Option<String>,
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, StoreError>;
    async fn find_by_provider_id(
        &self,
        provider: Provider,
        provider_id: &str,
    ) -> Result<Option<User>, StoreError>;
    async fn create(&self, new_user: NewUser) -> Result<User, StoreError>;
    async fn update(&self, id: &str, changes: UserUpdate) -> Result<User, StoreError>;
    async fn delete(&self, id: &str) -> Result<bool, StoreError>;
}

pub struct SqliteUserStore {
    db: SqlitePool,
}

impl SqliteUserStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

fn map_write_error(e: sqlx::Error) -> StoreError {
    let message = e.to_string();
    if message.contains("UNIQUE constraint failed: users.email") {
        StoreError::DuplicateEmail
    } else if message.contains("UNIQUE constraint failed: users.provider_id") {
        StoreError::DuplicateProviderId
    } else {
        StoreError::Database(e)
    }
}

#[async_trait]
impl UserStore for SqliteUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
            .bind(normalize_email(email))
            .fetch_optional(&self.db)
            .await?;
        Ok(user)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;
        Ok(user)
    }

    async fn find_by_provider_id(
        &self,
        provider: Provider,
        provider_id: &str,
    ) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE provider = ? AND provider_id = ?",
        )
        .bind(provider)
        .bind(provider_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn create(&self, new_user: NewUser) -> Result<User, StoreError> {
        let email = normalize_email(&new_user.email);

        let password_hash = match (new_user.provider, new_user.password) {
            (Provider::Local, Some(password)) => Some(hash_password_blocking(password).await?),
            (Provider::Local, None) => return Err(StoreError::MissingPassword),
            (_, _) => None,
        };

        let id = generate_user_id();
        let now = timestamp_now();
        sqlx::query(
            r#"
            INSERT INTO users (id, email, name, password_hash, provider, provider_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&email)
        .bind(new_user.name.trim())
        .bind(password_hash.as_deref())
        .bind(new_user.provider)
        .bind(new_user.provider_id.as_deref())
        .bind(&now)
        .bind(&now)
        .execute(&self.db)
        .await
        .map_err(|e| {
            let mapped = map_write_error(e);
            if matches!(mapped, StoreError::Database(_)) {
                error!(error = %mapped, email = %safe_email_log(&email), "Database error inserting user");
            }
            mapped
        })?;

        info!(
            user_id = %id,
            email = %safe_email_log(&email),
            provider = %new_user.provider,
            "User created"
        );

        self.find_by_id(&id).await?.ok_or(StoreError::NotFound)
    }

    async fn update(&self, id: &str, changes: UserUpdate) -> Result<User, StoreError> {
        let current = self.find_by_id(id).await?.ok_or(StoreError::NotFound)?;
        let provider = changes.provider.unwrap_or(current.provider);

        // Passwords are only ever stored, hashed, for local accounts
        let password_hash = match (provider, changes.password) {
            (Provider::Local, Some(password)) => Some(hash_password_blocking(password).await?),
            _ => current.password_hash.clone(),
        };
        let name = changes
            .name
            .map(|n| n.trim().to_string())
            .unwrap_or(current.name);
        let provider_id = changes.provider_id.or(current.provider_id);

        sqlx::query(
            r#"
            UPDATE users
            SET name = ?, password_hash = ?, provider = ?, provider_id = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&name)
        .bind(password_hash.as_deref())
        .bind(provider)
        .bind(provider_id.as_deref())
        .bind(timestamp_now())
        .bind(id)
        .execute(&self.db)
        .await
        .map_err(map_write_error)?;

        debug!(user_id = %id, "User updated");

        self.find_by_id(id).await?.ok_or(StoreError::NotFound)
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
