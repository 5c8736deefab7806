use anyhow::{Context, Result};
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use tokio::task;

use crate::config::SecurityConfig;
use crate::entities::{addresses, users};
use crate::models::AddressKind;

/// User data returned from the repository (without the password hash and
/// login-attempt bookkeeping).
#[derive(Debug, Clone)]
pub struct User {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_owner: bool,
    pub phone: Option<String>,
    pub profile_picture_url: Option<String>,
    pub address_id: Option<i32>,
    pub created_at: String,
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            first_name: model.first_name,
            last_name: model.last_name,
            email: model.email,
            is_owner: model.is_owner,
            phone: model.phone,
            profile_picture_url: model.profile_picture_url,
            address_id: model.address_id,
            created_at: model.created_at,
        }
    }
}

/// Address fields for the become-owner flow.
#[derive(Debug, Clone)]
pub struct NewOwnerProfile {
    pub kind: AddressKind,
    pub street: String,
    pub number: i32,
    pub other: Option<String>,
    pub postal_code: String,
    pub city_id: i32,
    pub phone: String,
}

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Full row, including the password hash and lockout counters. Reserved
    /// for the login path.
    pub async fn get_auth_by_email(&self, email: &str) -> Result<Option<users::Model>> {
        let user = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.conn)
            .await
            .context("Failed to query user by email")?;

        Ok(user)
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Option<User>> {
        let user = users::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query user by ID")?;

        Ok(user.map(User::from))
    }

    pub async fn email_exists(&self, email: &str) -> Result<bool> {
        let user = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.conn)
            .await
            .context("Failed to query user by email")?;

        Ok(user.is_some())
    }

    /// Creates a regular (non-owner) user. The password is hashed off the
    /// async runtime because Argon2 is CPU-intensive.
    pub async fn create(
        &self,
        first_name: &str,
        last_name: &str,
        email: &str,
        password: &str,
        config: &SecurityConfig,
    ) -> Result<User> {
        let password = password.to_string();
        let config = config.clone();
        let password_hash = task::spawn_blocking(move || hash_password(&password, &config))
            .await
            .context("Password hashing task panicked")??;

        let now = chrono::Utc::now().to_rfc3339();

        let active = users::ActiveModel {
            first_name: Set(first_name.to_string()),
            last_name: Set(last_name.to_string()),
            email: Set(email.to_string()),
            password_hash: Set(password_hash),
            is_owner: Set(false),
            failed_login_attempts: Set(0),
            last_login_attempt: Set(None),
            phone: Set(None),
            profile_picture_url: Set(None),
            address_id: Set(None),
            created_at: Set(now),
            ..Default::default()
        };

        let model = active.insert(&self.conn).await?;
        Ok(User::from(model))
    }

    /// Stamps the outcome of a login attempt: the new consecutive-failure
    /// count and `last_login_attempt = now`.
    pub async fn record_login_attempt(&self, user_id: i32, failed_attempts: i32) -> Result<()> {
        let user = users::Entity::find_by_id(user_id)
            .one(&self.conn)
            .await
            .context("Failed to query user for login attempt update")?
            .ok_or_else(|| anyhow::anyhow!("User not found: {user_id}"))?;

        let now = chrono::Utc::now().to_rfc3339();

        let mut active: users::ActiveModel = user.into();
        active.failed_login_attempts = Set(failed_attempts);
        active.last_login_attempt = Set(Some(now));
        active.update(&self.conn).await?;

        Ok(())
    }

    /// Promotes a user to property owner: the address row and the user
    /// update commit together or not at all.
    pub async fn promote_to_owner(&self, user_id: i32, profile: &NewOwnerProfile) -> Result<User> {
        let txn = self.conn.begin().await?;

        let user = users::Entity::find_by_id(user_id)
            .one(&txn)
            .await
            .context("Failed to query user for owner promotion")?
            .ok_or_else(|| anyhow::anyhow!("User not found: {user_id}"))?;

        let address = addresses::ActiveModel {
            kind: Set(profile.kind.code().to_string()),
            street: Set(profile.street.clone()),
            number: Set(profile.number),
            other: Set(profile.other.clone()),
            postal_code: Set(profile.postal_code.to_uppercase()),
            city_id: Set(profile.city_id),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let mut active: users::ActiveModel = user.into();
        active.is_owner = Set(true);
        active.phone = Set(Some(profile.phone.clone()));
        active.profile_picture_url = Set(Some(String::new()));
        active.address_id = Set(Some(address.id));
        let model = active.update(&txn).await?;

        txn.commit().await?;

        Ok(User::from(model))
    }

    /// Verify a password against a stored hash off the async runtime.
    pub async fn verify_password(&self, password_hash: &str, password: &str) -> Result<bool> {
        let password_hash = password_hash.to_string();
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
