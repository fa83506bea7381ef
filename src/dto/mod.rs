pub mod auth;
pub mod cart;
pub mod catalog;
pub mod chats;
pub mod couriers;
pub mod orders;
pub mod reviews;
pub mod stores;
pub mod users;
