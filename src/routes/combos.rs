use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::catalog::{CreateProductRequest, ProductComboList, UpdateProductRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::ProductCombo,
    response::ApiResponse,
    routes::params::StoreScopedQuery,
    services::catalog_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_combos).post(create_combo))
        .route("/{id}", get(get_combo).put(update_combo).delete(delete_combo))
}

#[utoipa::path(get, path = "/api/combos", tag = "Catalog")]
pub async fn list_combos(
    State(state): State<AppState>,
    Query(query): Query<StoreScopedQuery>,
) -> AppResult<Json<ApiResponse<ProductComboList>>> {
    let resp = catalog_service::list_combos(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(get, path = "/api/combos/{id}", tag = "Catalog")]
pub async fn get_combo(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<ProductCombo>>> {
    let resp = catalog_service::get_combo(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/combos",
    request_body = CreateProductRequest,
    security(("bearer_auth" = [])),
    tag = "Catalog"
)]
pub async fn create_combo(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateProductRequest>,
) -> AppResult<Json<ApiResponse<ProductCombo>>> {
    let resp = catalog_service::create_combo(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(put, path = "/api/combos/{id}", security(("bearer_auth" = [])), tag = "Catalog")]
pub async fn update_combo(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProductRequest>,
) -> AppResult<Json<ApiResponse<ProductCombo>>> {
    let resp = catalog_service::update_combo(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(delete, path = "/api/combos/{id}", security(("bearer_auth" = [])), tag = "Catalog")]
pub async fn delete_combo(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = catalog_service::delete_combo(&state, &user, id).await?;
    Ok(Json(resp))
}
