use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::couriers::{CourierList, CreateCourierRequest, UpdateCourierRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Courier,
    response::ApiResponse,
    routes::params::Pagination,
    services::courier_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_couriers).post(create_courier))
        .route(
            "/{id}",
            get(get_courier).put(update_courier).delete(delete_courier),
        )
}

#[utoipa::path(get, path = "/api/couriers", security(("bearer_auth" = [])), tag = "Couriers")]
pub async fn list_couriers(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<CourierList>>> {
    let resp = courier_service::list_couriers(&state, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(get, path = "/api/couriers/{id}", security(("bearer_auth" = [])), tag = "Couriers")]
pub async fn get_courier(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Courier>>> {
    let resp = courier_service::get_courier(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/couriers",
    request_body = CreateCourierRequest,
    responses(
        (status = 201, description = "Create courier record", body = ApiResponse<Courier>),
        (status = 400, description = "Validation failed"),
    ),
    security(("bearer_auth" = [])),
    tag = "Couriers"
)]
pub async fn create_courier(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(payload): Json<CreateCourierRequest>,
) -> AppResult<Json<ApiResponse<Courier>>> {
    let resp = courier_service::create_courier(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(put, path = "/api/couriers/{id}", security(("bearer_auth" = [])), tag = "Couriers")]
pub async fn update_courier(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCourierRequest>,
) -> AppResult<Json<ApiResponse<Courier>>> {
    let resp = courier_service::update_courier(&state, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(delete, path = "/api/couriers/{id}", security(("bearer_auth" = [])), tag = "Couriers")]
pub async fn delete_courier(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = courier_service::delete_courier(&state, id).await?;
    Ok(Json(resp))
}
