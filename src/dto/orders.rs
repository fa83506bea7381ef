use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::orders::OrderStatus;
use crate::models::OrderSummary;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    pub delivery_address: String,
    pub courier_id: Uuid,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderRequest {
    pub status: Option<OrderStatus>,
    pub delivery_address: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct OrderList {
    #[schema(value_type = Vec<OrderSummary>)]
    pub items: Vec<OrderSummary>,
}
