use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::StoreSummary;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateStoreRequest {
    pub name: String,
    pub image: String,
    pub category_id: Uuid,
    pub description: String,
    pub address: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStoreRequest {
    pub name: Option<String>,
    pub image: Option<String>,
    pub category_id: Option<Uuid>,
    pub description: Option<String>,
    pub address: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct StoreList {
    #[schema(value_type = Vec<StoreSummary>)]
    pub items: Vec<StoreSummary>,
}
