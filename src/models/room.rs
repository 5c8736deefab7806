//! Domain enums and search parameters for room listings.
//!
//! The persistence layer stores single-letter codes (matching the seeded
//! schema); these types are the typed boundary the services and handlers
//! work with.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoomType {
    Individual,
    Shared,
}

impl RoomType {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Individual => "I",
            Self::Shared => "S",
        }
    }

    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "I" => Some(Self::Individual),
            "S" => Some(Self::Shared),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BathroomType {
    Ensuite,
    Shared,
}

impl BathroomType {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Ensuite => "E",
            Self::Shared => "S",
        }
    }

    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "E" => Some(Self::Ensuite),
            "S" => Some(Self::Shared),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GenderPreference {
    Male,
    Female,
    Any,
}

impl GenderPreference {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Male => "M",
            Self::Female => "F",
            Self::Any => "A",
        }
    }

    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "M" => Some(Self::Male),
            "F" => Some(Self::Female),
            "A" => Some(Self::Any),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AddressKind {
    Residential,
    Business,
}

impl AddressKind {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Residential => "R",
            Self::Business => "B",
        }
    }

    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "R" => Some(Self::Residential),
            "B" => Some(Self::Business),
            _ => None,
        }
    }
}

/// Sort keys accepted by the public room search. Anything else leaves the
/// result set in storage order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomSort {
    Price,
    Size,
}

impl RoomSort {
    #[must_use]
    pub fn parse(key: &str) -> Option<Self> {
        match key {
            "price" => Some(Self::Price),
            "size" => Some(Self::Size),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    #[must_use]
    pub fn parse(dir: &str) -> Self {
        if dir.eq_ignore_ascii_case("desc") {
            Self::Descending
        } else {
            Self::Ascending
        }
    }
}

/// Validated address fields embedded in room input.
#[derive(Debug, Clone)]
pub struct AddressInput {
    pub street: String,
    pub number: i32,
    pub other: Option<String>,
    /// Normalized to uppercase before storage.
    pub postal_code: String,
    pub city_id: i32,
}

/// Validated fields for creating or updating a room listing. Composition
/// rather than inheritance: the address travels as an embedded struct.
#[derive(Debug, Clone)]
pub struct RoomInput {
    pub room_type: RoomType,
    pub bathroom_type: BathroomType,
    pub gender: GenderPreference,
    pub description: String,
    pub rent_price: i32,
    pub size: i32,
    pub number_of_rooms: i32,
    pub address: AddressInput,
}

/// Loose filter parameters from the search query string. Every bound is
/// optional and applied independently.
#[derive(Debug, Clone, Default)]
pub struct RoomSearchParams {
    pub city_id: Option<i32>,
    pub room_type: Option<RoomType>,
    pub bathroom_type: Option<BathroomType>,
    pub gender: Option<GenderPreference>,
    pub description: Option<String>,
    pub rent_price_min: Option<i32>,
    pub rent_price_max: Option<i32>,
    pub size_min: Option<i32>,
    pub size_max: Option<i32>,
    pub number_of_rooms_min: Option<i32>,
    pub number_of_rooms_max: Option<i32>,
    pub sort: Option<(RoomSort, SortDirection)>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_codes_round_trip() {
        assert_eq!(RoomType::from_code("I"), Some(RoomType::Individual));
        assert_eq!(RoomType::Individual.code(), "I");
        assert_eq!(BathroomType::from_code("E"), Some(BathroomType::Ensuite));
        assert_eq!(GenderPreference::from_code("A"), Some(GenderPreference::Any));
        assert_eq!(AddressKind::from_code("B"), Some(AddressKind::Business));
        assert_eq!(RoomType::from_code("X"), None);
    }

    #[test]
    fn test_sort_parsing() {
        assert_eq!(RoomSort::parse("price"), Some(RoomSort::Price));
        assert_eq!(RoomSort::parse("size"), Some(RoomSort::Size));
        assert_eq!(RoomSort::parse("rating"), None);
        assert_eq!(SortDirection::parse("desc"), SortDirection::Descending);
        assert_eq!(SortDirection::parse("asc"), SortDirection::Ascending);
        assert_eq!(SortDirection::parse("sideways"), SortDirection::Ascending);
    }
}
