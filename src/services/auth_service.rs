//! Domain service for authentication and account management.
//!
//! Handles login with failed-attempt lockout, registration, and promotion
//! to property owner.

use serde::Serialize;
use thiserror::Error;

use crate::db::User;
use crate::models::AddressKind;

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Too many consecutive failures; carries the minutes left in the
    /// block window.
    #[error("User blocked for {remaining_minutes} minute(s)")]
    Blocked { remaining_minutes: i64 },

    #[error("Email is already registered")]
    EmailTaken,

    #[error("User not found")]
    UserNotFound,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Public account data for responses.
#[derive(Debug, Clone, Serialize)]
pub struct UserInfo {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_owner: bool,
    pub phone: Option<String>,
    pub profile_picture_url: Option<String>,
}

impl From<User> for UserInfo {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            is_owner: user.is_owner,
            phone: user.phone,
            profile_picture_url: user.profile_picture_url,
        }
    }
}

/// Validated registration fields.
#[derive(Debug, Clone)]
pub struct RegisterInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

/// Validated become-owner fields: contact phone plus the user's address.
#[derive(Debug, Clone)]
pub struct OwnerProfileInput {
    pub kind: AddressKind,
    pub street: String,
    pub number: i32,
    pub other: Option<String>,
    pub postal_code: String,
    pub city_id: i32,
    pub phone: String,
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Verifies credentials.
    ///
    /// Returns `Ok(None)` both for an unknown email and for a wrong
    /// password, so responses do not betray which addresses exist.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Blocked`] while the account is locked out.
    async fn login(&self, email: &str, password: &str) -> Result<Option<UserInfo>, AuthError>;

    /// Creates a regular (non-owner) account.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::EmailTaken`] on a duplicate email.
    async fn register(&self, input: &RegisterInput) -> Result<UserInfo, AuthError>;

    /// Gets account data for a user id.
    async fn get_user(&self, user_id: i32) -> Result<UserInfo, AuthError>;

    /// Promotes the user to property owner, creating their address and
    /// phone contact in the same transaction.
    async fn become_owner(
        &self,
        user_id: i32,
        input: &OwnerProfileInput,
    ) -> Result<UserInfo, AuthError>;
}
