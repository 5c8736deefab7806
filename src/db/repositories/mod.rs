pub mod city;
pub mod favorite;
pub mod picture;
pub mod room;
pub mod user;
