use anyhow::{Context, Result};
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryOrder, Set};
use tokio::task;

use crate::config::SecurityConfig;
use crate::entities::{prelude::*, users};

/// User data returned from repository (without the password hash)
#[derive(Debug, Clone)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub username: Option<String>,
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            username: model.username,
        }
    }
}

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Get the first user row (lowest id). This is the account every
    /// page header and login attempt resolves against.
    pub async fn first(&self) -> Result<Option<User>> {
        let user = Users::find()
            .order_by_asc(users::Column::Id)
            .one(&self.conn)
            .await
            .context("Failed to query first user")?;

        Ok(user.map(User::from))
    }

    /// Get user by ID
    pub async fn get(&self, id: i32) -> Result<Option<User>> {
        let user = Users::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query user by ID")?;

        Ok(user.map(User::from))
    }

    pub async fn count(&self) -> Result<u64> {
        Users::find()
            .count(&self.conn)
            .await
            .context("Failed to count users")
    }

    /// Insert a user with a display name only (no login credentials).
    /// Used by the fixture seeder.
    pub async fn insert_named(&self, name: &str) -> Result<i32> {
        let active = users::ActiveModel {
            name: Set(name.to_string()),
            ..Default::default()
        };

        let res = Users::insert(active).exec(&self.conn).await?;
        Ok(res.last_insert_id)
    }

    /// Update the display name of an existing user
    pub async fn update_name(&self, id: i32, name: &str) -> Result<()> {
        let user = Users::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query user for name update")?
            .ok_or_else(|| anyhow::anyhow!("User not found: {id}"))?;

        let mut active: users::ActiveModel = user.into();
        active.name = Set(name.to_string());
        active.update(&self.conn).await?;

        Ok(())
    }

    /// Create or update the single admin account. If any user row exists
    /// the first one is given the new credentials (its display name is
    /// kept); otherwise a fresh row named "Admin" is inserted.
    ///
    /// Returns `true` when a new row was created.
    pub async fn upsert_admin(
        &self,
        username: &str,
        password: &str,
        security: &SecurityConfig,
    ) -> Result<bool> {
        let password = password.to_string();
        let security = security.clone();
        let hash = task::spawn_blocking(move || hash_password(&password, &security))
            .await
            .context("Password hashing task panicked")??;

        let existing = Users::find()
            .order_by_asc(users::Column::Id)
            .one(&self.conn)
            .await
            .context("Failed to query admin account")?;

        match existing {
            Some(user) => {
                let mut active: users::ActiveModel = user.into();
                active.username = Set(Some(username.to_string()));
                active.password_hash = Set(Some(hash));
                active.update(&self.conn).await?;
                Ok(false)
            }
            None => {
                let active = users::ActiveModel {
                    name: Set("Admin".to_string()),
                    username: Set(Some(username.to_string())),
                    password_hash: Set(Some(hash)),
                    ..Default::default()
                };
                Users::insert(active).exec(&self.conn).await?;
                Ok(true)
            }
        }
    }

    /// Check credentials against the first user row and return it on
    /// success. The submitted username must equal that row's username;
    /// other rows are never consulted (single-admin deployment).
    ///
    /// Note: Argon2 verification runs in `spawn_blocking` because it is
    /// CPU-intensive and would stall the async runtime if run directly.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<Option<User>> {
        let user = Users::find()
            .order_by_asc(users::Column::Id)
            .one(&self.conn)
            .await
            .context("Failed to query user for login")?;

        let Some(user) = user else {
            return Ok(None);
        };

        if user.username.as_deref() != Some(username) {
            return Ok(None);
        }

        let Some(password_hash) = user.password_hash.clone() else {
            return Ok(None);
        };

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

        Ok(is_valid.then(|| User::from(user)))
    }
}

/// Hash a password using Argon2id with the configured cost parameters.
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
