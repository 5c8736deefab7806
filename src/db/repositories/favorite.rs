use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::entities::{favorites, prelude::*};

pub struct FavoriteRepository {
    conn: DatabaseConnection,
}

impl FavoriteRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Idempotent: an existing (user, room) pair is left untouched.
    pub async fn add(&self, user_id: i32, room_id: i32) -> Result<()> {
        let existing = Favorites::find()
            .filter(favorites::Column::UserId.eq(user_id))
            .filter(favorites::Column::RoomId.eq(room_id))
            .one(&self.conn)
            .await
            .context("Failed to query favorite")?;

        if existing.is_some() {
            return Ok(());
        }

        let now = chrono::Utc::now().to_rfc3339();

        favorites::ActiveModel {
            user_id: Set(user_id),
            room_id: Set(room_id),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&self.conn)
        .await?;

        Ok(())
    }

    pub async fn remove(&self, user_id: i32, room_id: i32) -> Result<()> {
        Favorites::delete_many()
            .filter(favorites::Column::UserId.eq(user_id))
            .filter(favorites::Column::RoomId.eq(room_id))
            .exec(&self.conn)
            .await
            .context("Failed to remove favorite")?;

        Ok(())
    }

    /// Bookmarked room ids, ascending, for quick client-side lookups.
    pub async fn room_ids_for_user(&self, user_id: i32) -> Result<Vec<i32>> {
        let favorites = Favorites::find()
            .filter(favorites::Column::UserId.eq(user_id))
            .order_by_asc(favorites::Column::RoomId)
            .all(&self.conn)
            .await
            .context("Failed to list favorite ids")?;

        Ok(favorites.into_iter().map(|f| f.room_id).collect())
    }

    /// Bookmarked room ids, most recently favorited first.
    pub async fn recent_room_ids_for_user(&self, user_id: i32) -> Result<Vec<i32>> {
        let favorites = Favorites::find()
            .filter(favorites::Column::UserId.eq(user_id))
            .order_by_desc(favorites::Column::CreatedAt)
            .all(&self.conn)
            .await
            .context("Failed to list favorites")?;

        Ok(favorites.into_iter().map(|f| f.room_id).collect())
    }
}
