use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "room_pictures")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Relative URL under the images mount (e.g. "rooms/<uuid>.jpg").
    pub url: String,

    /// Positive position within the room's gallery; dense 1..N on insert,
    /// gaps tolerated after deletes.
    pub order: i32,

    /// Exactly one per room whenever the room has pictures; always the
    /// picture with the lowest order.
    pub is_cover: bool,

    pub room_id: i32,

    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::rooms::Entity",
        from = "Column::RoomId",
        to = "super::rooms::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Rooms,
}

impl Related<super::rooms::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Rooms.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
