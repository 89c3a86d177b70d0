//! This file serves as the root for all SeaORM entity modules.
//! We define the data models for the property marketplace here: users,
//! the listings they publish, and the photo/inquiry/favorite rows that
//! hang off a listing.

pub mod favorite;
pub mod inquiry;
pub mod property;
pub mod property_photo;
pub mod user;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::favorite::Entity as Favorite;
    pub use super::inquiry::Entity as Inquiry;
    pub use super::property::Entity as Property;
    pub use super::property_photo::Entity as PropertyPhoto;
    pub use super::user::Entity as User;
}
