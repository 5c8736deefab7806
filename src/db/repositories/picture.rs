use anyhow::{Context, Result};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};

use crate::entities::{prelude::*, room_pictures};

/// Storage operations for the room picture gallery.
///
/// Gallery invariant: whenever a room has pictures, exactly one has
/// `is_cover = true` and it is the one with the lowest `order`. Orders are
/// assigned densely on insert; deletes may leave gaps, which every
/// operation here tolerates by comparing relative order only.
pub struct PictureRepository {
    conn: DatabaseConnection,
}

impl PictureRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get(&self, id: i32) -> Result<Option<room_pictures::Model>> {
        let picture = RoomPictures::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query room picture by ID")?;

        Ok(picture)
    }

    pub async fn list_for_room(&self, room_id: i32) -> Result<Vec<room_pictures::Model>> {
        let pictures = RoomPictures::find()
            .filter(room_pictures::Column::RoomId.eq(room_id))
            .order_by_asc(room_pictures::Column::Order)
            .all(&self.conn)
            .await
            .context("Failed to list room pictures")?;

        Ok(pictures)
    }

    /// Appends a batch of pictures with consecutive orders `max+1..max+K`.
    ///
    /// The first picture ever added to an empty room becomes the cover. If
    /// the room already had pictures the cover is recomputed afterwards,
    /// inside the same transaction, so an inconsistent starting state heals
    /// rather than spreads.
    pub async fn insert_batch(
        &self,
        room_id: i32,
        urls: &[String],
    ) -> Result<Vec<room_pictures::Model>> {
        if urls.is_empty() {
            return Ok(vec![]);
        }

        let txn = self.conn.begin().await?;

        let max_order = max_order_on(&txn, room_id).await?;
        let was_empty = max_order == 0;
        let now = chrono::Utc::now().to_rfc3339();

        let mut created = Vec::with_capacity(urls.len());
        for (offset, url) in urls.iter().enumerate() {
            let order = max_order + 1 + offset as i32;

            let picture = room_pictures::ActiveModel {
                url: Set(url.clone()),
                order: Set(order),
                is_cover: Set(was_empty && offset == 0),
                room_id: Set(room_id),
                created_at: Set(now.clone()),
                ..Default::default()
            }
            .insert(&txn)
            .await?;

            created.push(picture);
        }

        if !was_empty {
            recompute_cover_on(&txn, room_id).await?;
        }

        txn.commit().await?;

        Ok(created)
    }

    /// Makes the lowest-order picture of the room the cover. Idempotent and
    /// safe to call after any structural change; the single source of truth
    /// for `is_cover`.
    pub async fn recompute_cover(&self, room_id: i32) -> Result<()> {
        recompute_cover_on(&self.conn, room_id).await
    }

    /// Moves `source` onto `target`'s position, shifting everything in
    /// between by one. All statements run in one transaction; the shift is
    /// scoped to the source picture's room.
    pub async fn swap_order(
        &self,
        source_id: i32,
        target_id: i32,
        ascending: bool,
    ) -> Result<room_pictures::Model> {
        let txn = self.conn.begin().await?;

        let source = RoomPictures::find_by_id(source_id)
            .one(&txn)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Picture not found: {source_id}"))?;
        let target = RoomPictures::find_by_id(target_id)
            .one(&txn)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Picture not found: {target_id}"))?;

        let room_id = source.room_id;

        // Pictures between source and target, bounds chosen so the target's
        // slot is vacated and the source's closed.
        let in_between = if ascending {
            RoomPictures::find()
                .filter(room_pictures::Column::RoomId.eq(room_id))
                .filter(room_pictures::Column::Order.gt(source.order))
                .filter(room_pictures::Column::Order.lte(target.order))
                .all(&txn)
                .await?
        } else {
            RoomPictures::find()
                .filter(room_pictures::Column::RoomId.eq(room_id))
                .filter(room_pictures::Column::Order.gte(target.order))
                .filter(room_pictures::Column::Order.lt(source.order))
                .all(&txn)
                .await?
        };

        let mut cover_impacted = in_between.iter().any(|p| p.is_cover);

        if !in_between.is_empty() {
            let shift = if ascending { -1 } else { 1 };
            let ids: Vec<i32> = in_between.iter().map(|p| p.id).collect();

            RoomPictures::update_many()
                .col_expr(
                    room_pictures::Column::Order,
                    Expr::col(room_pictures::Column::Order).add(shift),
                )
                .filter(room_pictures::Column::Id.is_in(ids))
                .exec(&txn)
                .await?;
        }

        cover_impacted |= source.is_cover;
        let target_order = target.order;

        let mut active: room_pictures::ActiveModel = source.into();
        active.order = Set(target_order);
        let updated = active.update(&txn).await?;

        if cover_impacted {
            recompute_cover_on(&txn, room_id).await?;
        }

        txn.commit().await?;

        // The update above may have been overtaken by the cover recompute.
        let refreshed = RoomPictures::find_by_id(updated.id)
            .one(&self.conn)
            .await?
            .unwrap_or(updated);

        Ok(refreshed)
    }

    /// Deletes the picture; a deleted cover promotes the surviving
    /// lowest-order picture. Remaining orders are not re-packed.
    pub async fn delete(&self, id: i32) -> Result<Option<room_pictures::Model>> {
        let txn = self.conn.begin().await?;

        let Some(picture) = RoomPictures::find_by_id(id).one(&txn).await? else {
            txn.commit().await?;
            return Ok(None);
        };

        RoomPictures::delete_by_id(id).exec(&txn).await?;

        if picture.is_cover {
            recompute_cover_on(&txn, picture.room_id).await?;
        }

        txn.commit().await?;

        Ok(Some(picture))
    }
}

async fn max_order_on<C: ConnectionTrait>(db: &C, room_id: i32) -> Result<i32> {
    let last = RoomPictures::find()
        .filter(room_pictures::Column::RoomId.eq(room_id))
        .order_by_desc(room_pictures::Column::Order)
        .one(db)
        .await?;

    Ok(last.map_or(0, |p| p.order))
}

async fn recompute_cover_on<C: ConnectionTrait>(db: &C, room_id: i32) -> Result<()> {
    let Some(first) = RoomPictures::find()
        .filter(room_pictures::Column::RoomId.eq(room_id))
        .order_by_asc(room_pictures::Column::Order)
        .one(db)
        .await?
    else {
        return Ok(());
    };

    RoomPictures::update_many()
        .col_expr(room_pictures::Column::IsCover, Expr::value(false))
        .filter(room_pictures::Column::RoomId.eq(room_id))
        .filter(room_pictures::Column::Id.ne(first.id))
        .filter(room_pictures::Column::IsCover.eq(true))
        .exec(db)
        .await?;

    if !first.is_cover {
        let mut active: room_pictures::ActiveModel = first.into();
        active.is_cover = Set(true);
        active.update(db).await?;
    }

    Ok(())
}
