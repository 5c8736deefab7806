use serde::{Deserialize, Serialize};

use crate::db::{RoomDetails, RoomListing};
use crate::entities::{room_pictures, rooms};

use super::validation::FieldError;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Field-level validation messages, present only on validation
    /// failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            errors: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
            errors: None,
        }
    }

    pub fn field_errors(message: impl Into<String>, errors: Vec<FieldError>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
            errors: Some(errors),
        }
    }
}

// ============================================================================
// Request payloads
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct RegisterPayload {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct AddressPayload {
    pub street: String,
    pub number: i32,
    pub other: Option<String>,
    pub postal_code: String,
    pub city_id: i32,
}

/// Room fields with the address flattened in, mirroring the flat form the
/// client submits.
#[derive(Debug, Deserialize)]
pub struct RoomPayload {
    pub room_type: String,
    pub bathroom_type: String,
    pub gender: String,
    pub description: String,
    pub rent_price: i32,
    pub size: i32,
    pub number_of_rooms: i32,
    #[serde(flatten)]
    pub address: AddressPayload,
}

#[derive(Debug, Deserialize)]
pub struct OwnerProfilePayload {
    /// "R" or "B".
    pub kind: String,
    pub phone: String,
    #[serde(flatten)]
    pub address: AddressPayload,
}

#[derive(Debug, Deserialize)]
pub struct SwapOrderPayload {
    pub ids: Vec<i32>,
    pub ascending: bool,
}

// ============================================================================
// Response DTOs
// ============================================================================

#[derive(Debug, Serialize)]
pub struct RoomDto {
    pub id: i32,
    pub room_type: String,
    pub bathroom_type: String,
    pub gender: String,
    pub description: String,
    pub rent_price: i32,
    pub size: i32,
    pub number_of_rooms: i32,
    pub is_rented: bool,
}

impl From<rooms::Model> for RoomDto {
    fn from(room: rooms::Model) -> Self {
        Self {
            id: room.id,
            room_type: room.room_type,
            bathroom_type: room.bathroom_type,
            gender: room.gender,
            description: room.description,
            rent_price: room.rent_price,
            size: room.size,
            number_of_rooms: room.number_of_rooms,
            is_rented: room.is_rented,
        }
    }
}

/// A listing as shown in search results and owner overviews.
#[derive(Debug, Serialize)]
pub struct RoomSummaryDto {
    pub id: i32,
    pub room_type: String,
    pub bathroom_type: String,
    pub gender: String,
    pub description: String,
    pub rent_price: i32,
    pub size: i32,
    pub number_of_rooms: i32,
    pub is_rented: bool,
    pub street: String,
    pub number: i32,
    pub postal_code: String,
    pub other: Option<String>,
    /// "City, PR"
    pub city: String,
    /// Picture URLs, gallery order ascending (cover first).
    pub pictures: Vec<String>,
}

impl From<RoomListing> for RoomSummaryDto {
    fn from(listing: RoomListing) -> Self {
        Self {
            id: listing.room.id,
            room_type: listing.room.room_type,
            bathroom_type: listing.room.bathroom_type,
            gender: listing.room.gender,
            description: listing.room.description,
            rent_price: listing.room.rent_price,
            size: listing.room.size,
            number_of_rooms: listing.room.number_of_rooms,
            is_rented: listing.room.is_rented,
            street: listing.address.street,
            number: listing.address.number,
            postal_code: listing.address.postal_code,
            other: listing.address.other,
            city: format!("{}, {}", listing.city.name, listing.province.abbreviation),
            pictures: listing.pictures.into_iter().map(|p| p.url).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RoomDetailsDto {
    #[serde(flatten)]
    pub summary: RoomSummaryDto,
    pub owner_name: String,
    pub owner_phone: Option<String>,
    pub owner_city: Option<String>,
}

impl From<RoomDetails> for RoomDetailsDto {
    fn from(details: RoomDetails) -> Self {
        Self {
            summary: RoomSummaryDto::from(details.listing),
            owner_name: details.owner_name,
            owner_phone: details.owner_phone,
            owner_city: details.owner_city,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PictureDto {
    pub id: i32,
    pub url: String,
    pub order: i32,
    pub is_cover: bool,
    pub room_id: i32,
}

impl From<room_pictures::Model> for PictureDto {
    fn from(picture: room_pictures::Model) -> Self {
        Self {
            id: picture.id,
            url: picture.url,
            order: picture.order,
            is_cover: picture.is_cover,
            room_id: picture.room_id,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProvinceDto {
    pub id: i32,
    pub name: String,
    pub abbreviation: String,
}
