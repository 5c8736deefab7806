use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "rooms")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// "I" individual or "S" shared (see `models::RoomType`).
    pub room_type: String,

    /// "E" ensuite or "S" shared (see `models::BathroomType`).
    pub bathroom_type: String,

    /// "M", "F" or "A" (see `models::GenderPreference`).
    pub gender: String,

    pub description: String,

    pub rent_price: i32,

    /// Square metres.
    pub size: i32,

    pub number_of_rooms: i32,

    pub is_rented: bool,

    /// Listing user; must have `is_owner = true`.
    pub owner_id: i32,

    /// 1:1 with addresses, created together with the room.
    #[sea_orm(unique)]
    pub address_id: i32,

    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::OwnerId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Users,
    #[sea_orm(
        belongs_to = "super::addresses::Entity",
        from = "Column::AddressId",
        to = "super::addresses::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Addresses,
    #[sea_orm(has_many = "super::room_pictures::Entity")]
    RoomPictures,
    #[sea_orm(has_many = "super::favorites::Entity")]
    Favorites,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::addresses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Addresses.def()
    }
}

impl Related<super::room_pictures::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RoomPictures.def()
    }
}

impl Related<super::favorites::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Favorites.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
