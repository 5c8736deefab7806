pub mod prelude;

pub mod addresses;
pub mod cities;
pub mod favorites;
pub mod provinces;
pub mod room_pictures;
pub mod rooms;
pub mod users;
