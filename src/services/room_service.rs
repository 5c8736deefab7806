//! Domain service for the room listing lifecycle.
//!
//! Create/update/delete, the availability toggle, favorites, and the
//! public search all funnel through here; mutations run the ownership
//! guard first.

use thiserror::Error;

use crate::db::{RoomDetails, RoomListing};
use crate::entities::rooms;
use crate::models::{RoomInput, RoomSearchParams};
use crate::services::ownership::OwnershipError;

/// Errors specific to room operations.
#[derive(Debug, Error)]
pub enum RoomError {
    #[error("User is not a property owner")]
    NotAnOwner,

    #[error("Room belongs to a different user")]
    WrongOwner,

    #[error("Room not found")]
    NotFound,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for RoomError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for RoomError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<OwnershipError> for RoomError {
    fn from(err: OwnershipError) -> Self {
        match err {
            OwnershipError::NotAnOwner | OwnershipError::UserNotFound => Self::NotAnOwner,
            OwnershipError::WrongOwner => Self::WrongOwner,
            OwnershipError::RoomNotFound | OwnershipError::PictureNotFound => Self::NotFound,
            OwnershipError::Database(msg) => Self::Database(msg),
        }
    }
}

/// Domain service trait for room listings.
#[async_trait::async_trait]
pub trait RoomService: Send + Sync {
    /// Public search; rented rooms never appear.
    async fn search(&self, params: &RoomSearchParams) -> Result<Vec<RoomListing>, RoomError>;

    /// The owner's rooms, newest first.
    async fn list_by_owner(&self, owner_id: i32) -> Result<Vec<RoomListing>, RoomError>;

    /// Full listing detail including owner contact data.
    async fn get_details(&self, room_id: i32) -> Result<RoomDetails, RoomError>;

    /// Creates a room with its address in one transaction.
    ///
    /// # Errors
    ///
    /// Returns [`RoomError::NotAnOwner`] when the actor may not list rooms.
    async fn create_room(&self, owner_id: i32, input: &RoomInput)
    -> Result<rooms::Model, RoomError>;

    /// Updates scalar fields and the address sub-record.
    async fn update_room(
        &self,
        owner_id: i32,
        room_id: i32,
        input: &RoomInput,
    ) -> Result<rooms::Model, RoomError>;

    /// Flips `is_rented`. A missing room is a silent no-op (`Ok(None)`).
    async fn set_availability(
        &self,
        owner_id: i32,
        room_id: i32,
    ) -> Result<Option<rooms::Model>, RoomError>;

    /// Deletes the room and its pictures; picture files are removed
    /// best-effort.
    async fn delete_room(&self, owner_id: i32, room_id: i32) -> Result<bool, RoomError>;

    /// Bookmarks a room. A missing room is a silent no-op; repeats are
    /// idempotent.
    async fn add_favorite(&self, user_id: i32, room_id: i32) -> Result<(), RoomError>;

    /// Removes a bookmark. A missing room is a silent no-op.
    async fn remove_favorite(&self, user_id: i32, room_id: i32) -> Result<(), RoomError>;

    /// Bookmarked listings, most recently favorited first.
    async fn list_favorites(&self, user_id: i32) -> Result<Vec<RoomListing>, RoomError>;

    /// Bookmarked room ids, ascending.
    async fn favorite_room_ids(&self, user_id: i32) -> Result<Vec<i32>, RoomError>;
}
