//! `SeaORM` implementation of the `AuthService` trait.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use crate::config::Config;
use crate::db::{NewOwnerProfile, Store};
use crate::services::auth_service::{
    AuthError, AuthService, OwnerProfileInput, RegisterInput, UserInfo,
};

pub struct SeaOrmAuthService {
    store: Store,
    config: Arc<RwLock<Config>>,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(store: Store, config: Arc<RwLock<Config>>) -> Self {
        Self { store, config }
    }

    /// The lockout check. A user with `max_attempts` consecutive failures
    /// is blocked until `block_minutes` have passed since the last attempt.
    /// An elapsed window re-admits attempts without resetting the counter;
    /// only a successful login does that.
    fn check_blocked(
        user: &crate::entities::users::Model,
        max_attempts: i32,
        block_minutes: i64,
    ) -> Result<(), AuthError> {
        if user.failed_login_attempts < max_attempts {
            return Ok(());
        }

        let Some(last_attempt) = user
            .last_login_attempt
            .as_deref()
            .and_then(|s| chrono::DateTime::parse_from_rfc3339(s).ok())
        else {
            return Ok(());
        };

        let elapsed_minutes = chrono::Utc::now()
            .signed_duration_since(last_attempt)
            .num_minutes();
        let remaining_minutes = block_minutes - elapsed_minutes;

        if remaining_minutes > 0 {
            return Err(AuthError::Blocked { remaining_minutes });
        }

        Ok(())
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn login(&self, email: &str, password: &str) -> Result<Option<UserInfo>, AuthError> {
        let Some(user) = self.store.get_user_auth_by_email(email).await? else {
            return Ok(None);
        };

        let (max_attempts, block_minutes) = {
            let config = self.config.read().await;
            (
                config.security.max_login_attempts,
                config.security.block_minutes,
            )
        };

        Self::check_blocked(&user, max_attempts, block_minutes)?;

        let is_valid = self
            .store
            .verify_password(&user.password_hash, password)
            .await?;

        if !is_valid {
            self.store
                .record_login_attempt(user.id, user.failed_login_attempts + 1)
                .await?;
            return Ok(None);
        }

        self.store.record_login_attempt(user.id, 0).await?;

        let user = self
            .store
            .get_user(user.id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        Ok(Some(UserInfo::from(user)))
    }

    async fn register(&self, input: &RegisterInput) -> Result<UserInfo, AuthError> {
        if self.store.email_exists(&input.email).await? {
            return Err(AuthError::EmailTaken);
        }

        let security = self.config.read().await.security.clone();

        let user = self
            .store
            .create_user(
                &input.first_name,
                &input.last_name,
                &input.email,
                &input.password,
                &security,
            )
            .await?;

        info!("Registered user {}", user.id);

        Ok(UserInfo::from(user))
    }

    async fn get_user(&self, user_id: i32) -> Result<UserInfo, AuthError> {
        let user = self
            .store
            .get_user(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        Ok(UserInfo::from(user))
    }

    async fn become_owner(
        &self,
        user_id: i32,
        input: &OwnerProfileInput,
    ) -> Result<UserInfo, AuthError> {
        if self.store.get_user(user_id).await?.is_none() {
            return Err(AuthError::UserNotFound);
        }

        let profile = NewOwnerProfile {
            kind: input.kind,
            street: input.street.clone(),
            number: input.number,
            other: input.other.clone(),
            postal_code: input.postal_code.clone(),
            city_id: input.city_id,
            phone: input.phone.clone(),
        };

        let user = self.store.promote_to_owner(user_id, &profile).await?;

        info!("User {} is now a property owner", user.id);

        Ok(UserInfo::from(user))
    }
}
