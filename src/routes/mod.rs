use axum::Router;

use crate::state::AppState;

pub mod auth;
pub mod cart;
pub mod categories;
pub mod chats;
pub mod combos;
pub mod contacts;
pub mod couriers;
pub mod doc;
pub mod health;
pub mod orders;
pub mod params;
pub mod products;
pub mod reviews;
pub mod stores;
pub mod users;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/categories", categories::router())
        .nest("/stores", stores::router())
        .nest("/products", products::router())
        .nest("/combos", combos::router())
        .nest("/contacts", contacts::router())
        .nest("/cart", cart::router())
        .nest("/orders", orders::router())
        .nest("/couriers", couriers::router())
        .nest("/store-reviews", reviews::store_router())
        .nest("/courier-reviews", reviews::courier_router())
        .nest("/chats", chats::router())
}
