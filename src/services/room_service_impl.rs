//! `SeaORM` implementation of the `RoomService` trait.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

use crate::db::{RoomDetails, RoomListing, Store};
use crate::entities::rooms;
use crate::models::{RoomInput, RoomSearchParams};
use crate::services::ImageService;
use crate::services::ownership::OwnershipGuard;
use crate::services::room_service::{RoomError, RoomService};

pub struct SeaOrmRoomService {
    store: Store,
    guard: OwnershipGuard,
    images: Arc<ImageService>,
}

impl SeaOrmRoomService {
    #[must_use]
    pub fn new(store: Store, images: Arc<ImageService>) -> Self {
        let guard = OwnershipGuard::new(store.clone());
        Self {
            store,
            guard,
            images,
        }
    }
}

#[async_trait]
impl RoomService for SeaOrmRoomService {
    async fn search(&self, params: &RoomSearchParams) -> Result<Vec<RoomListing>, RoomError> {
        let listings = self.store.search_rooms(params).await?;
        Ok(listings)
    }

    async fn list_by_owner(&self, owner_id: i32) -> Result<Vec<RoomListing>, RoomError> {
        let listings = self.store.list_rooms_by_owner(owner_id).await?;
        Ok(listings)
    }

    async fn get_details(&self, room_id: i32) -> Result<RoomDetails, RoomError> {
        self.store
            .room_details(room_id)
            .await?
            .ok_or(RoomError::NotFound)
    }

    async fn create_room(
        &self,
        owner_id: i32,
        input: &RoomInput,
    ) -> Result<rooms::Model, RoomError> {
        self.guard.require_owner(owner_id).await?;

        let room = self.store.create_room(owner_id, input).await?;

        info!("Room {} created by user {}", room.id, owner_id);

        Ok(room)
    }

    async fn update_room(
        &self,
        owner_id: i32,
        room_id: i32,
        input: &RoomInput,
    ) -> Result<rooms::Model, RoomError> {
        self.guard.require_room_owner(owner_id, room_id).await?;

        let room = self.store.update_room(room_id, input).await?;

        Ok(room)
    }

    async fn set_availability(
        &self,
        owner_id: i32,
        room_id: i32,
    ) -> Result<Option<rooms::Model>, RoomError> {
        // Deliberate soft-fail: a vanished room is not an error here.
        let Some(room) = self.store.get_room(room_id).await? else {
            return Ok(None);
        };

        self.guard.require_room_owner(owner_id, room_id).await?;

        let updated = self.store.set_room_rented(room_id, !room.is_rented).await?;

        info!(
            "Room {} availability toggled to is_rented={}",
            room_id, updated.is_rented
        );

        Ok(Some(updated))
    }

    async fn delete_room(&self, owner_id: i32, room_id: i32) -> Result<bool, RoomError> {
        self.guard.require_room_owner(owner_id, room_id).await?;

        let picture_urls = self.store.delete_room(room_id).await?;

        for url in &picture_urls {
            self.images.delete_image(url).await;
        }

        info!(
            "Room {} deleted by user {} ({} pictures removed)",
            room_id,
            owner_id,
            picture_urls.len()
        );

        Ok(true)
    }

    async fn add_favorite(&self, user_id: i32, room_id: i32) -> Result<(), RoomError> {
        if self.store.get_room(room_id).await?.is_none() {
            return Ok(());
        }

        self.store.add_favorite(user_id, room_id).await?;
        Ok(())
    }

    async fn remove_favorite(&self, user_id: i32, room_id: i32) -> Result<(), RoomError> {
        if self.store.get_room(room_id).await?.is_none() {
            return Ok(());
        }

        self.store.remove_favorite(user_id, room_id).await?;
        Ok(())
    }

    async fn list_favorites(&self, user_id: i32) -> Result<Vec<RoomListing>, RoomError> {
        let room_ids = self.store.recent_favorite_room_ids(user_id).await?;
        let listings = self.store.room_listings_by_ids(&room_ids).await?;
        Ok(listings)
    }

    async fn favorite_room_ids(&self, user_id: i32) -> Result<Vec<i32>, RoomError> {
        let ids = self.store.favorite_room_ids(user_id).await?;
        Ok(ids)
    }
}
