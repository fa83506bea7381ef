use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{CourierReview, StoreReview};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateStoreReviewRequest {
    pub store_id: Uuid,
    pub rating: i32,
    pub comment: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCourierReviewRequest {
    pub courier_id: Uuid,
    pub rating: i32,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct StoreReviewList {
    #[schema(value_type = Vec<StoreReview>)]
    pub items: Vec<StoreReview>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct CourierReviewList {
    #[schema(value_type = Vec<CourierReview>)]
    pub items: Vec<CourierReview>,
}
