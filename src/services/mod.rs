pub mod ownership;
pub use ownership::{OwnershipError, OwnershipGuard};

pub mod auth_service;
pub mod auth_service_impl;
pub use auth_service::{AuthError, AuthService, OwnerProfileInput, RegisterInput, UserInfo};
pub use auth_service_impl::SeaOrmAuthService;

pub mod room_service;
pub mod room_service_impl;
pub use room_service::{RoomError, RoomService};
pub use room_service_impl::SeaOrmRoomService;

pub mod picture_service;
pub mod picture_service_impl;
pub use picture_service::{PictureError, PictureService};
pub use picture_service_impl::SeaOrmPictureService;

pub mod city_service;
pub use city_service::{CityHit, CityService};

pub mod image;
pub use image::{ImageService, StorageError};
