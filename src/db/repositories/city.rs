use anyhow::{Context, Result};
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

use crate::entities::{cities, prelude::*, provinces};

pub struct CityRepository {
    conn: DatabaseConnection,
}

impl CityRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Two-tier name search: short queries (< 4 chars) match by prefix to
    /// keep the result set wide, longer ones by substring. Both tiers are
    /// case-insensitive.
    pub async fn search(&self, query: &str) -> Result<Vec<(cities::Model, provinces::Model)>> {
        let needle = query.to_lowercase();
        let pattern = if needle.chars().count() < 4 {
            format!("{needle}%")
        } else {
            format!("%{needle}%")
        };

        let results = Cities::find()
            .filter(
                Expr::expr(Func::lower(Expr::col((cities::Entity, cities::Column::Name))))
                    .like(pattern),
            )
            .find_also_related(Provinces)
            .order_by_asc(cities::Column::Name)
            .all(&self.conn)
            .await
            .context("Failed to search cities")?;

        Ok(results
            .into_iter()
            .filter_map(|(city, province)| province.map(|p| (city, p)))
            .collect())
    }

    pub async fn list_by_province(&self, province_id: i32) -> Result<Vec<cities::Model>> {
        let results = Cities::find()
            .filter(cities::Column::ProvinceId.eq(province_id))
            .order_by_asc(cities::Column::Name)
            .all(&self.conn)
            .await
            .context("Failed to list cities for province")?;

        Ok(results)
    }

    pub async fn list_provinces(&self) -> Result<Vec<provinces::Model>> {
        let results = Provinces::find()
            .order_by_asc(provinces::Column::Name)
            .all(&self.conn)
            .await
            .context("Failed to list provinces")?;

        Ok(results)
    }
}
