use anyhow::{Context, Result};
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use thiserror::Error;
use tokio::task;

use crate::config::SecurityConfig;
use crate::entities::users;

/// Account data returned from the repository (without the password hash)
#[derive(Debug, Clone)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub badge: i32,
    pub created_at: String,
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            badge: model.badge,
            created_at: model.created_at,
        }
    }
}

/// Registration failures. The uniqueness variants come from the store's own
/// unique constraints, so two concurrent registrations cannot both succeed.
#[derive(Debug, Error)]
pub enum RegisterError {
    #[error("Username already exists")]
    UsernameTaken,

    #[error("Badge number already exists")]
    BadgeTaken,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Creates an account with a freshly hashed password. A unique-constraint
    /// violation is translated into the specific taken-field error, username
    /// reported first when the database cannot tell us which column collided.
    pub async fn create(
        &self,
        username: &str,
        password: &str,
        badge: i32,
        security: &SecurityConfig,
    ) -> Result<User, RegisterError> {
        let password = password.to_string();
        let security = security.clone();

        // Argon2 hashing is CPU-intensive; keep it off the async runtime
        let password_hash = task::spawn_blocking(move || hash_password(&password, &security))
            .await
            .map_err(|e| RegisterError::Internal(format!("Hashing task panicked: {e}")))?
            .map_err(|e| RegisterError::Internal(e.to_string()))?;

        let active = users::ActiveModel {
            username: Set(username.to_string()),
            password_hash: Set(password_hash),
            badge: Set(badge),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        match active.insert(&self.conn).await {
            Ok(model) => Ok(model.into()),
            Err(err) => match err.sql_err() {
                Some(sea_orm::SqlErr::UniqueConstraintViolation(msg)) => {
                    if msg.contains("username") {
                        Err(RegisterError::UsernameTaken)
                    } else if msg.contains("badge") {
                        Err(RegisterError::BadgeTaken)
                    } else {
                        self.classify_conflict(username).await
                    }
                }
                _ => Err(RegisterError::Database(err.to_string())),
            },
        }
    }

    /// Fallback when the constraint message names no column: username is
    /// checked first, matching the registration contract.
    async fn classify_conflict(&self, username: &str) -> Result<User, RegisterError> {
        let existing = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.conn)
            .await
            .map_err(|e| RegisterError::Database(e.to_string()))?;

        if existing.is_some() {
            Err(RegisterError::UsernameTaken)
        } else {
            Err(RegisterError::BadgeTaken)
        }
    }

    pub async fn find_by_credentials(&self, username: &str, badge: i32) -> Result<Option<User>> {
        let user = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .filter(users::Column::Badge.eq(badge))
            .one(&self.conn)
            .await
            .context("Failed to query user by username and badge")?;

        Ok(user.map(User::from))
    }

    /// Verifies the full credential triple. A missing account and a wrong
    /// password are indistinguishable from the caller's side.
    pub async fn verify_password(
        &self,
        username: &str,
        badge: i32,
        password: &str,
    ) -> Result<bool> {
        let user = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .filter(users::Column::Badge.eq(badge))
            .one(&self.conn)
            .await
            .context("Failed to query user for password verification")?;

        let Some(user) = user else {
            return Ok(false);
        };

        let password_hash = user.password_hash;
        let password = password.to_string();

        let is_valid = task::spawn_blocking(move || {
            let parsed_hash = PasswordHash::new(&password_hash)
                .map_err(|e| anyhow::anyhow!("Invalid password hash format: {e}"))?;

            let argon2 = Argon2::default();
            Ok::<bool, anyhow::Error>(
                argon2
                    .verify_password(password.as_bytes(), &parsed_hash)
                    .is_ok(),
            )
        })
        .await
        .context("Password verification task panicked")??;

        Ok(is_valid)
    }
}

/// Hash a password using Argon2id with the configured params.
pub fn hash_password(password: &str, config: &SecurityConfig) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let params = Params::new(
        config.argon2_memory_cost_kib,
        config.argon2_time_cost,
        config.argon2_parallelism,
        None,
    )
    .map_err(|e| anyhow::anyhow!("Invalid Argon2 params: {e}"))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    Ok(hash.to_string())
}
