pub mod auth_service;
pub mod cart_service;
pub mod catalog_service;
pub mod chat_service;
pub mod courier_service;
pub mod order_service;
pub mod review_service;
pub mod store_service;
pub mod user_service;
