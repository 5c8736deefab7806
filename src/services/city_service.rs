//! Read-only lookups over the seeded city/province reference data.

use anyhow::Result;
use serde::Serialize;

use crate::db::Store;
use crate::entities::provinces;

/// A city hit with its province label, ready for autocomplete display.
#[derive(Debug, Clone, Serialize)]
pub struct CityHit {
    pub id: i32,
    pub name: String,
    pub province: String,
}

pub struct CityService {
    store: Store,
}

impl CityService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    /// Two-tier name search: prefix match for short queries, substring
    /// otherwise (both case-insensitive).
    pub async fn search(&self, query: &str) -> Result<Vec<CityHit>> {
        let hits = self.store.search_cities(query).await?;

        Ok(hits
            .into_iter()
            .map(|(city, province)| CityHit {
                id: city.id,
                name: city.name,
                province: province.abbreviation,
            })
            .collect())
    }

    pub async fn list_by_province(&self, province_id: i32) -> Result<Vec<CityHit>> {
        let cities = self.store.list_cities_by_province(province_id).await?;
        let provinces = self.store.list_provinces().await?;

        Ok(cities
            .into_iter()
            .map(|city| {
                let province = provinces
                    .iter()
                    .find(|p| p.id == city.province_id)
                    .map(|p| p.abbreviation.clone())
                    .unwrap_or_default();
                CityHit {
                    id: city.id,
                    name: city.name,
                    province,
                }
            })
            .collect())
    }

    pub async fn list_provinces(&self) -> Result<Vec<provinces::Model>> {
        self.store.list_provinces().await
    }
}
