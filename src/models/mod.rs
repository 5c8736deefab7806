pub mod room;

pub use room::{
    AddressInput, AddressKind, BathroomType, GenderPreference, RoomInput, RoomSearchParams,
    RoomSort, RoomType, SortDirection,
};
