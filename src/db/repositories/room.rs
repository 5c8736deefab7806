use std::collections::HashMap;

use anyhow::{Context, Result};
use sea_orm::sea_query::{Expr, Func, JoinType};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait, Set, TransactionTrait,
};

use crate::entities::{addresses, cities, prelude::*, provinces, room_pictures, rooms, users};
use crate::models::{AddressKind, RoomInput, RoomSearchParams, RoomSort, SortDirection};

/// A room together with its address chain and pictures, gallery order
/// ascending.
#[derive(Debug, Clone)]
pub struct RoomListing {
    pub room: rooms::Model,
    pub address: addresses::Model,
    pub city: cities::Model,
    pub province: provinces::Model,
    pub pictures: Vec<room_pictures::Model>,
}

/// A listing enriched with public contact data of its owner.
#[derive(Debug, Clone)]
pub struct RoomDetails {
    pub listing: RoomListing,
    pub owner_name: String,
    pub owner_phone: Option<String>,
    /// "City, PR" of the owner's own address, when present.
    pub owner_city: Option<String>,
}

pub struct RoomRepository {
    conn: DatabaseConnection,
}

impl RoomRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get(&self, id: i32) -> Result<Option<rooms::Model>> {
        let room = Rooms::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query room by ID")?;

        Ok(room)
    }

    /// Room plus its owning user, for ownership checks.
    pub async fn get_with_owner(&self, id: i32) -> Result<Option<(rooms::Model, users::Model)>> {
        let result = Rooms::find_by_id(id)
            .find_also_related(Users)
            .one(&self.conn)
            .await
            .context("Failed to query room with owner")?;

        Ok(result.and_then(|(room, owner)| owner.map(|o| (room, o))))
    }

    /// Room and address commit together or not at all. Room addresses are
    /// always residential.
    pub async fn create(&self, owner_id: i32, input: &RoomInput) -> Result<rooms::Model> {
        let txn = self.conn.begin().await?;

        let address = addresses::ActiveModel {
            kind: Set(AddressKind::Residential.code().to_string()),
            street: Set(input.address.street.clone()),
            number: Set(input.address.number),
            other: Set(input.address.other.clone()),
            postal_code: Set(input.address.postal_code.to_uppercase()),
            city_id: Set(input.address.city_id),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let now = chrono::Utc::now().to_rfc3339();

        let room = rooms::ActiveModel {
            room_type: Set(input.room_type.code().to_string()),
            bathroom_type: Set(input.bathroom_type.code().to_string()),
            gender: Set(input.gender.code().to_string()),
            description: Set(input.description.clone()),
            rent_price: Set(input.rent_price),
            size: Set(input.size),
            number_of_rooms: Set(input.number_of_rooms),
            is_rented: Set(false),
            owner_id: Set(owner_id),
            address_id: Set(address.id),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        Ok(room)
    }

    /// Updates the scalar room fields and the address sub-record in one
    /// transaction. `is_rented` is untouched here; see `set_rented`.
    pub async fn update(&self, room_id: i32, input: &RoomInput) -> Result<rooms::Model> {
        let txn = self.conn.begin().await?;

        let room = Rooms::find_by_id(room_id)
            .one(&txn)
            .await
            .context("Failed to query room for update")?
            .ok_or_else(|| anyhow::anyhow!("Room not found: {room_id}"))?;

        let address = Addresses::find_by_id(room.address_id)
            .one(&txn)
            .await
            .context("Failed to query room address for update")?
            .ok_or_else(|| anyhow::anyhow!("Address not found for room {room_id}"))?;

        let mut address_active: addresses::ActiveModel = address.into();
        address_active.kind = Set(AddressKind::Residential.code().to_string());
        address_active.street = Set(input.address.street.clone());
        address_active.number = Set(input.address.number);
        address_active.other = Set(input.address.other.clone());
        address_active.postal_code = Set(input.address.postal_code.to_uppercase());
        address_active.city_id = Set(input.address.city_id);
        address_active.update(&txn).await?;

        let mut room_active: rooms::ActiveModel = room.into();
        room_active.room_type = Set(input.room_type.code().to_string());
        room_active.bathroom_type = Set(input.bathroom_type.code().to_string());
        room_active.gender = Set(input.gender.code().to_string());
        room_active.description = Set(input.description.clone());
        room_active.rent_price = Set(input.rent_price);
        room_active.size = Set(input.size);
        room_active.number_of_rooms = Set(input.number_of_rooms);
        let updated = room_active.update(&txn).await?;

        txn.commit().await?;

        Ok(updated)
    }

    pub async fn set_rented(&self, room_id: i32, is_rented: bool) -> Result<rooms::Model> {
        let room = Rooms::find_by_id(room_id)
            .one(&self.conn)
            .await
            .context("Failed to query room for availability update")?
            .ok_or_else(|| anyhow::anyhow!("Room not found: {room_id}"))?;

        let mut active: rooms::ActiveModel = room.into();
        active.is_rented = Set(is_rented);
        let updated = active.update(&self.conn).await?;

        Ok(updated)
    }

    /// Deletes the room, its pictures and its address in one transaction.
    /// Returns the stored picture URLs so the caller can remove the files.
    pub async fn delete(&self, room_id: i32) -> Result<Vec<String>> {
        let txn = self.conn.begin().await?;

        let room = Rooms::find_by_id(room_id)
            .one(&txn)
            .await
            .context("Failed to query room for deletion")?
            .ok_or_else(|| anyhow::anyhow!("Room not found: {room_id}"))?;

        let pictures = RoomPictures::find()
            .filter(room_pictures::Column::RoomId.eq(room_id))
            .all(&txn)
            .await?;
        let urls: Vec<String> = pictures.into_iter().map(|p| p.url).collect();

        RoomPictures::delete_many()
            .filter(room_pictures::Column::RoomId.eq(room_id))
            .exec(&txn)
            .await?;

        let address_id = room.address_id;
        Rooms::delete_by_id(room_id).exec(&txn).await?;
        Addresses::delete_by_id(address_id).exec(&txn).await?;

        txn.commit().await?;

        Ok(urls)
    }

    /// Public search. `is_rented = true` rooms never appear regardless of
    /// the requested filters.
    pub async fn search(&self, params: &RoomSearchParams) -> Result<Vec<RoomListing>> {
        let mut query = Rooms::find().filter(rooms::Column::IsRented.eq(false));

        if let Some(city_id) = params.city_id {
            query = query
                .join(JoinType::InnerJoin, rooms::Relation::Addresses.def())
                .filter(addresses::Column::CityId.eq(city_id));
        }

        if let Some(room_type) = params.room_type {
            query = query.filter(rooms::Column::RoomType.eq(room_type.code()));
        }

        if let Some(bathroom_type) = params.bathroom_type {
            query = query.filter(rooms::Column::BathroomType.eq(bathroom_type.code()));
        }

        if let Some(gender) = params.gender {
            query = query.filter(rooms::Column::Gender.eq(gender.code()));
        }

        if let Some(description) = &params.description {
            // instr() keeps the match case-sensitive; LIKE would not be on
            // SQLite.
            query = query.filter(
                Expr::expr(
                    Func::cust("instr")
                        .arg(Expr::col((rooms::Entity, rooms::Column::Description)))
                        .arg(description.clone()),
                )
                .gt(0),
            );
        }

        if let Some(min) = params.rent_price_min {
            query = query.filter(rooms::Column::RentPrice.gte(min));
        }
        if let Some(max) = params.rent_price_max {
            query = query.filter(rooms::Column::RentPrice.lte(max));
        }
        if let Some(min) = params.size_min {
            query = query.filter(rooms::Column::Size.gte(min));
        }
        if let Some(max) = params.size_max {
            query = query.filter(rooms::Column::Size.lte(max));
        }
        if let Some(min) = params.number_of_rooms_min {
            query = query.filter(rooms::Column::NumberOfRooms.gte(min));
        }
        if let Some(max) = params.number_of_rooms_max {
            query = query.filter(rooms::Column::NumberOfRooms.lte(max));
        }

        if let Some((sort, direction)) = params.sort {
            let column = match sort {
                RoomSort::Price => rooms::Column::RentPrice,
                RoomSort::Size => rooms::Column::Size,
            };
            query = match direction {
                SortDirection::Ascending => query.order_by_asc(column),
                SortDirection::Descending => query.order_by_desc(column),
            };
        }

        let rooms = query.all(&self.conn).await?;
        self.hydrate(rooms).await
    }

    /// The owner's rooms, newest first.
    pub async fn list_by_owner(&self, owner_id: i32) -> Result<Vec<RoomListing>> {
        let rooms = Rooms::find()
            .filter(rooms::Column::OwnerId.eq(owner_id))
            .order_by_desc(rooms::Column::CreatedAt)
            .all(&self.conn)
            .await?;

        self.hydrate(rooms).await
    }

    /// Listings for an explicit id list, returned in the given order.
    pub async fn listings_by_ids(&self, ids: &[i32]) -> Result<Vec<RoomListing>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        let rooms = Rooms::find()
            .filter(rooms::Column::Id.is_in(ids.iter().copied()))
            .all(&self.conn)
            .await?;

        let mut by_id: HashMap<i32, rooms::Model> =
            rooms.into_iter().map(|r| (r.id, r)).collect();
        let ordered: Vec<rooms::Model> = ids.iter().filter_map(|id| by_id.remove(id)).collect();

        self.hydrate(ordered).await
    }

    pub async fn details(&self, room_id: i32) -> Result<Option<RoomDetails>> {
        let Some((room, owner)) = self.get_with_owner(room_id).await? else {
            return Ok(None);
        };

        let mut listings = self.hydrate(vec![room]).await?;
        let Some(listing) = listings.pop() else {
            return Ok(None);
        };

        let owner_city = match owner.address_id {
            Some(address_id) => self.city_label_for_address(address_id).await?,
            None => None,
        };

        Ok(Some(RoomDetails {
            listing,
            owner_name: owner.first_name,
            owner_phone: owner.phone,
            owner_city,
        }))
    }

    async fn city_label_for_address(&self, address_id: i32) -> Result<Option<String>> {
        let Some(address) = Addresses::find_by_id(address_id).one(&self.conn).await? else {
            return Ok(None);
        };
        let Some((city, Some(province))) = Cities::find_by_id(address.city_id)
            .find_also_related(Provinces)
            .one(&self.conn)
            .await?
        else {
            return Ok(None);
        };

        Ok(Some(format!("{}, {}", city.name, province.abbreviation)))
    }

    /// Batch-loads the address chain and pictures for the given rooms,
    /// preserving their order.
    async fn hydrate(&self, rooms: Vec<rooms::Model>) -> Result<Vec<RoomListing>> {
        if rooms.is_empty() {
            return Ok(vec![]);
        }

        let address_ids: Vec<i32> = rooms.iter().map(|r| r.address_id).collect();
        let room_ids: Vec<i32> = rooms.iter().map(|r| r.id).collect();

        let addresses: HashMap<i32, addresses::Model> = Addresses::find()
            .filter(addresses::Column::Id.is_in(address_ids))
            .all(&self.conn)
            .await?
            .into_iter()
            .map(|a| (a.id, a))
            .collect();

        let city_ids: Vec<i32> = addresses.values().map(|a| a.city_id).collect();
        let cities: HashMap<i32, cities::Model> = Cities::find()
            .filter(cities::Column::Id.is_in(city_ids))
            .all(&self.conn)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        let province_ids: Vec<i32> = cities.values().map(|c| c.province_id).collect();
        let provinces: HashMap<i32, provinces::Model> = Provinces::find()
            .filter(provinces::Column::Id.is_in(province_ids))
            .all(&self.conn)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        let mut pictures: HashMap<i32, Vec<room_pictures::Model>> = HashMap::new();
        for picture in RoomPictures::find()
            .filter(room_pictures::Column::RoomId.is_in(room_ids))
            .order_by_asc(room_pictures::Column::Order)
            .all(&self.conn)
            .await?
        {
            pictures.entry(picture.room_id).or_default().push(picture);
        }

        let mut listings = Vec::with_capacity(rooms.len());
        for room in rooms {
            let Some(address) = addresses.get(&room.address_id).cloned() else {
                continue;
            };
            let Some(city) = cities.get(&address.city_id).cloned() else {
                continue;
            };
            let Some(province) = provinces.get(&city.province_id).cloned() else {
                continue;
            };
            let room_pictures = pictures.remove(&room.id).unwrap_or_default();

            listings.push(RoomListing {
                room,
                address,
                city,
                province,
                pictures: room_pictures,
            });
        }

        Ok(listings)
    }
}
