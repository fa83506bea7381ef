use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Category, ContactInfo, Product, ProductCombo};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCategoryRequest {
    pub name: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct CategoryList {
    #[schema(value_type = Vec<Category>)]
    pub items: Vec<Category>,
}

// Products and combos share one request shape; they differ only in the
// table they land in.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    pub name: String,
    pub image: String,
    pub description: String,
    pub price: i64,
    pub store_id: Uuid,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub image: Option<String>,
    pub description: Option<String>,
    pub price: Option<i64>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct ProductList {
    #[schema(value_type = Vec<Product>)]
    pub items: Vec<Product>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct ProductComboList {
    #[schema(value_type = Vec<ProductCombo>)]
    pub items: Vec<ProductCombo>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateContactInfoRequest {
    pub phone_number: String,
    pub store_id: Uuid,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateContactInfoRequest {
    pub phone_number: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct ContactInfoList {
    #[schema(value_type = Vec<ContactInfo>)]
    pub items: Vec<ContactInfo>,
}
