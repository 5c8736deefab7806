//! Domain service for room picture galleries.
//!
//! Maintains the gallery invariant: per room a dense 1-based order on
//! insert and exactly one cover, always the lowest-order picture.

use thiserror::Error;

use crate::entities::room_pictures;
use crate::services::ownership::OwnershipError;

/// Errors specific to picture operations.
#[derive(Debug, Error)]
pub enum PictureError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("User is not a property owner")]
    NotAnOwner,

    #[error("Room belongs to a different user")]
    WrongOwner,

    #[error("Picture not found")]
    NotFound,

    #[error("Room not found")]
    RoomNotFound,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for PictureError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for PictureError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<OwnershipError> for PictureError {
    fn from(err: OwnershipError) -> Self {
        match err {
            OwnershipError::NotAnOwner | OwnershipError::UserNotFound => Self::NotAnOwner,
            OwnershipError::WrongOwner => Self::WrongOwner,
            OwnershipError::RoomNotFound => Self::RoomNotFound,
            OwnershipError::PictureNotFound => Self::NotFound,
            OwnershipError::Database(msg) => Self::Database(msg),
        }
    }
}

/// Domain service trait for gallery management.
#[async_trait::async_trait]
pub trait PictureService: Send + Sync {
    /// The room's pictures, gallery order ascending.
    async fn list_for_room(&self, room_id: i32)
    -> Result<Vec<room_pictures::Model>, PictureError>;

    /// Appends stored image URLs to the room's gallery; the first picture
    /// of a previously empty gallery becomes the cover.
    async fn add_pictures(
        &self,
        owner_id: i32,
        room_id: i32,
        urls: Vec<String>,
    ) -> Result<Vec<room_pictures::Model>, PictureError>;

    /// Moves one picture onto another's position.
    ///
    /// # Errors
    ///
    /// Returns [`PictureError::InvalidInput`] unless `ids` holds exactly
    /// two pictures of the same room.
    async fn swap_order(
        &self,
        owner_id: i32,
        ids: &[i32],
        ascending: bool,
    ) -> Result<room_pictures::Model, PictureError>;

    /// Deletes a picture; a deleted cover promotes the next lowest-order
    /// picture. The stored file is removed best-effort.
    async fn delete_picture(&self, owner_id: i32, picture_id: i32) -> Result<(), PictureError>;
}
