use crate::entities::prelude::*;
use crate::entities::{cities, favorites, provinces, room_pictures};
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::Schema;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Reference data seeded once; cities/provinces are immutable afterwards.
const PROVINCES: &[(i32, &str, &str, &[&str])] = &[
    (1, "Alberta", "AB", &["Calgary", "Edmonton", "Red Deer"]),
    (2, "British Columbia", "BC", &["Vancouver", "Victoria", "Kelowna"]),
    (3, "Ontario", "ON", &["Toronto", "Ottawa", "Mississauga"]),
    (4, "Quebec", "QC", &["Montreal", "Quebec City", "Laval"]),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();
        let schema = Schema::new(backend);

        manager
            .create_table(
                schema
                    .create_table_from_entity(Provinces)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(Cities)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(Addresses)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(Users)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(Rooms)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(RoomPictures)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(Favorites)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_favorites_user_room")
                    .table(Favorites)
                    .col(favorites::Column::UserId)
                    .col(favorites::Column::RoomId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_room_pictures_room_order")
                    .table(RoomPictures)
                    .col(room_pictures::Column::RoomId)
                    .col(room_pictures::Column::Order)
                    .to_owned(),
            )
            .await?;

        let mut city_id = 1;
        for (province_id, name, abbreviation, city_names) in PROVINCES {
            let insert = sea_orm_migration::sea_query::Query::insert()
                .into_table(Provinces)
                .columns([
                    provinces::Column::Id,
                    provinces::Column::Name,
                    provinces::Column::Abbreviation,
                ])
                .values_panic([(*province_id).into(), (*name).into(), (*abbreviation).into()])
                .to_owned();
            manager.exec_stmt(insert).await?;

            for city_name in *city_names {
                let insert = sea_orm_migration::sea_query::Query::insert()
                    .into_table(Cities)
                    .columns([
                        cities::Column::Id,
                        cities::Column::Name,
                        cities::Column::ProvinceId,
                    ])
                    .values_panic([city_id.into(), (*city_name).into(), (*province_id).into()])
                    .to_owned();
                manager.exec_stmt(insert).await?;
                city_id += 1;
            }
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Favorites).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RoomPictures).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Rooms).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Addresses).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Cities).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Provinces).to_owned())
            .await?;

        Ok(())
    }
}
