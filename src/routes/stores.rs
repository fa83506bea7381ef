use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::stores::{CreateStoreRequest, StoreList, UpdateStoreRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::{Store, StoreDetail},
    response::ApiResponse,
    routes::params::StoreQuery,
    services::store_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_stores).post(create_store))
        .route(
            "/{id}",
            get(get_store).put(update_store).delete(delete_store),
        )
}

#[utoipa::path(
    get,
    path = "/api/stores",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("q" = Option<String>, Query, description = "Search by store name"),
        ("category" = Option<Uuid>, Query, description = "Filter by category"),
        ("sort_by" = Option<String>, Query, description = "Sort by: name, created_at"),
        ("sort_order" = Option<String>, Query, description = "Sort order: asc, desc")
    ),
    responses(
        (status = 200, description = "List stores with rating aggregates", body = ApiResponse<StoreList>)
    ),
    tag = "Stores"
)]
pub async fn list_stores(
    State(state): State<AppState>,
    Query(query): Query<StoreQuery>,
) -> AppResult<Json<ApiResponse<StoreList>>> {
    let resp = store_service::list_stores(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/stores/{id}",
    params(
        ("id" = Uuid, Path, description = "Store ID")
    ),
    responses(
        (status = 200, description = "Store detail with nested relations", body = ApiResponse<StoreDetail>),
        (status = 404, description = "Store not found"),
    ),
    tag = "Stores"
)]
pub async fn get_store(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<StoreDetail>>> {
    let resp = store_service::get_store(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/stores",
    request_body = CreateStoreRequest,
    responses(
        (status = 201, description = "Create store", body = ApiResponse<Store>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Stores"
)]
pub async fn create_store(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateStoreRequest>,
) -> AppResult<Json<ApiResponse<Store>>> {
    let resp = store_service::create_store(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/stores/{id}",
    params(
        ("id" = Uuid, Path, description = "Store ID")
    ),
    request_body = UpdateStoreRequest,
    responses(
        (status = 200, description = "Updated store", body = ApiResponse<Store>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Stores"
)]
pub async fn update_store(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStoreRequest>,
) -> AppResult<Json<ApiResponse<Store>>> {
    let resp = store_service::update_store(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/stores/{id}",
    params(
        ("id" = Uuid, Path, description = "Store ID")
    ),
    responses(
        (status = 200, description = "Store and everything it owns deleted"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Stores"
)]
pub async fn delete_store(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = store_service::delete_store(&state, &user, id).await?;
    Ok(Json(resp))
}
