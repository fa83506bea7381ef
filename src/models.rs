use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::ratings::ReviewerCount;

pub use crate::entity::couriers::CourierStatus;
pub use crate::entity::orders::OrderStatus;
pub use crate::entity::users::Role;

// The password hash never leaves the entity layer.
#[derive(Debug, Serialize, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub phone_number: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserBrief {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
}

impl UserBrief {
    pub fn from_user(model: &crate::entity::users::Model) -> Self {
        Self {
            first_name: model.first_name.clone(),
            last_name: model.last_name.clone(),
            username: model.username.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
}

/// List-view projection: rating aggregates, no description/contacts/products.
#[derive(Debug, Serialize, ToSchema)]
pub struct StoreSummary {
    pub id: Uuid,
    pub name: String,
    pub image: String,
    pub category: Category,
    pub avg_rating: f64,
    #[schema(value_type = String)]
    pub reviewer_count: ReviewerCount,
    pub good_review_percentage: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Store {
    pub id: Uuid,
    pub name: String,
    pub image: String,
    pub category_id: Uuid,
    pub description: String,
    pub address: String,
    pub owner_id: Uuid,
}

/// Detail-view projection with fully nested relations.
#[derive(Debug, Serialize, ToSchema)]
pub struct StoreDetail {
    pub id: Uuid,
    pub name: String,
    pub image: String,
    pub category: Category,
    pub description: String,
    pub address: String,
    pub owner: UserBrief,
    pub products: Vec<Product>,
    pub combos: Vec<ProductCombo>,
    pub contacts: Vec<ContactInfo>,
    pub reviews: Vec<StoreReview>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub image: String,
    pub description: String,
    pub price: i64,
    pub store_id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductCombo {
    pub id: Uuid,
    pub name: String,
    pub image: String,
    pub description: String,
    pub price: i64,
    pub store_id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ContactInfo {
    pub id: Uuid,
    pub phone_number: String,
    pub store_id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StoreReview {
    pub id: Uuid,
    pub store_id: Uuid,
    pub client: UserBrief,
    pub rating: i32,
    pub comment: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CourierReview {
    pub id: Uuid,
    pub courier: UserBrief,
    pub client: UserBrief,
    pub rating: i32,
    // Rendered as "%d-%m-%Y %H:%M".
    pub created_at: String,
}

/// Line total is derived here, once, at representation time.
#[derive(Debug, Serialize, ToSchema)]
pub struct CartItem {
    pub id: Uuid,
    pub product: Product,
    pub quantity: i32,
    pub total_price: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Cart {
    pub id: Uuid,
    pub user_id: Uuid,
    pub items: Vec<CartItem>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderSummary {
    pub id: Uuid,
    pub client: UserBrief,
    pub courier_id: Uuid,
    pub delivery_address: String,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

/// Detail view adds the cart's line items and their aggregate total.
#[derive(Debug, Serialize, ToSchema)]
pub struct OrderDetail {
    pub id: Uuid,
    pub client: UserBrief,
    pub courier_id: Uuid,
    pub delivery_address: String,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub items: Vec<CartItem>,
    pub total_price: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Courier {
    pub id: Uuid,
    pub user_id: Uuid,
    pub current_order_id: Uuid,
    pub status: CourierStatus,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Chat {
    pub id: Uuid,
    pub participants: Vec<UserBrief>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Message {
    pub id: Uuid,
    pub chat_id: Uuid,
    pub author: UserBrief,
    pub text: String,
    pub image: Option<String>,
    pub video: Option<String>,
    pub created_at: DateTime<Utc>,
}
