//! `SeaORM` implementation of the `PictureService` trait.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

use crate::db::Store;
use crate::entities::room_pictures;
use crate::services::ImageService;
use crate::services::ownership::OwnershipGuard;
use crate::services::picture_service::{PictureError, PictureService};

pub struct SeaOrmPictureService {
    store: Store,
    guard: OwnershipGuard,
    images: Arc<ImageService>,
}

impl SeaOrmPictureService {
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
impl PictureService for SeaOrmPictureService {
    async fn list_for_room(
        &self,
        room_id: i32,
    ) -> Result<Vec<room_pictures::Model>, PictureError> {
        let pictures = self.store.list_pictures_for_room(room_id).await?;
        Ok(pictures)
    }

    async fn add_pictures(
        &self,
        owner_id: i32,
        room_id: i32,
        urls: Vec<String>,
    ) -> Result<Vec<room_pictures::Model>, PictureError> {
        self.guard.require_room_owner(owner_id, room_id).await?;

        if urls.is_empty() {
            return Ok(vec![]);
        }

        let created = self.store.insert_pictures(room_id, &urls).await?;

        info!("Added {} picture(s) to room {}", created.len(), room_id);

        Ok(created)
    }

    async fn swap_order(
        &self,
        owner_id: i32,
        ids: &[i32],
        ascending: bool,
    ) -> Result<room_pictures::Model, PictureError> {
        let [source_id, target_id] = ids else {
            return Err(PictureError::InvalidInput(
                "Invalid input for swapping pictures".to_string(),
            ));
        };

        let source = self
            .guard
            .require_picture_owner(owner_id, *source_id)
            .await?;
        let target = self
            .guard
            .require_picture_owner(owner_id, *target_id)
            .await?;

        if source.room_id != target.room_id {
            return Err(PictureError::InvalidInput(
                "Pictures belong to different rooms".to_string(),
            ));
        }

        let updated = self
            .store
            .swap_picture_order(*source_id, *target_id, ascending)
            .await?;

        Ok(updated)
    }

    async fn delete_picture(&self, owner_id: i32, picture_id: i32) -> Result<(), PictureError> {
        self.guard
            .require_picture_owner(owner_id, picture_id)
            .await?;

        if let Some(deleted) = self.store.delete_picture(picture_id).await? {
            self.images.delete_image(&deleted.url).await;
            info!("Picture {} deleted from room {}", picture_id, deleted.room_id);
        }

        Ok(())
    }
}
