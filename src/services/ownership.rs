//! Shared mutation preconditions: who may touch a room or picture.
//!
//! Every mutating room/picture operation runs one of these checks before
//! any write, so a failed check leaves no partial state behind.

use thiserror::Error;

use crate::db::{Store, User};
use crate::entities::{room_pictures, rooms};

#[derive(Debug, Error)]
pub enum OwnershipError {
    #[error("User is not a property owner")]
    NotAnOwner,

    #[error("Room not found")]
    RoomNotFound,

    #[error("Picture not found")]
    PictureNotFound,

    #[error("Room belongs to a different user")]
    WrongOwner,

    #[error("User not found")]
    UserNotFound,

    #[error("Database error: {0}")]
    Database(String),
}

impl From<anyhow::Error> for OwnershipError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

#[derive(Clone)]
pub struct OwnershipGuard {
    store: Store,
}

impl OwnershipGuard {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    /// The acting user must exist and hold the property-owner flag.
    pub async fn require_owner(&self, user_id: i32) -> Result<User, OwnershipError> {
        let user = self
            .store
            .get_user(user_id)
            .await?
            .ok_or(OwnershipError::UserNotFound)?;

        if !user.is_owner {
            return Err(OwnershipError::NotAnOwner);
        }

        Ok(user)
    }

    /// `require_owner`, then the room must exist and belong to the actor.
    pub async fn require_room_owner(
        &self,
        user_id: i32,
        room_id: i32,
    ) -> Result<rooms::Model, OwnershipError> {
        self.require_owner(user_id).await?;

        let (room, owner) = self
            .store
            .get_room_with_owner(room_id)
            .await?
            .ok_or(OwnershipError::RoomNotFound)?;

        if owner.id != user_id {
            return Err(OwnershipError::WrongOwner);
        }

        Ok(room)
    }

    /// The picture must exist; ownership is checked against its room.
    pub async fn require_picture_owner(
        &self,
        user_id: i32,
        picture_id: i32,
    ) -> Result<room_pictures::Model, OwnershipError> {
        let picture = self
            .store
            .get_picture(picture_id)
            .await?
            .ok_or(OwnershipError::PictureNotFound)?;

        self.require_room_owner(user_id, picture.room_id).await?;

        Ok(picture)
    }
}
