use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::couriers::CourierStatus;
use crate::models::Courier;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCourierRequest {
    pub user_id: Uuid,
    pub current_order_id: Uuid,
    pub status: CourierStatus,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCourierRequest {
    pub current_order_id: Option<Uuid>,
    pub status: Option<CourierStatus>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct CourierList {
    #[schema(value_type = Vec<Courier>)]
    pub items: Vec<Courier>,
}
