pub use super::addresses::Entity as Addresses;
pub use super::cities::Entity as Cities;
pub use super::favorites::Entity as Favorites;
pub use super::provinces::Entity as Provinces;
pub use super::room_pictures::Entity as RoomPictures;
pub use super::rooms::Entity as Rooms;
pub use super::users::Entity as Users;
