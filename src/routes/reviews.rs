use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::reviews::{
        CourierReviewList, CreateCourierReviewRequest, CreateStoreReviewRequest, StoreReviewList,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::{CourierReview, StoreReview},
    response::ApiResponse,
    routes::params::Pagination,
    services::review_service,
    state::AppState,
};

pub fn store_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_store_reviews).post(create_store_review))
        .route(
            "/{id}",
            axum::routing::put(reject_mutation).delete(reject_mutation),
        )
}

pub fn courier_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_courier_reviews).post(create_courier_review))
        .route(
            "/{id}",
            axum::routing::put(reject_mutation).delete(reject_mutation),
        )
}

#[utoipa::path(get, path = "/api/store-reviews", tag = "Reviews")]
pub async fn list_store_reviews(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<StoreReviewList>>> {
    let resp = review_service::list_store_reviews(&state, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/store-reviews",
    request_body = CreateStoreReviewRequest,
    responses(
        (status = 201, description = "Create store review", body = ApiResponse<StoreReview>),
        (status = 400, description = "Validation failed"),
    ),
    security(("bearer_auth" = [])),
    tag = "Reviews"
)]
pub async fn create_store_review(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateStoreReviewRequest>,
) -> AppResult<Json<ApiResponse<StoreReview>>> {
    let resp = review_service::create_store_review(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(get, path = "/api/courier-reviews", tag = "Reviews")]
pub async fn list_courier_reviews(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<CourierReviewList>>> {
    let resp = review_service::list_courier_reviews(&state, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/courier-reviews",
    request_body = CreateCourierReviewRequest,
    responses(
        (status = 201, description = "Create courier review", body = ApiResponse<CourierReview>),
        (status = 400, description = "Validation failed"),
    ),
    security(("bearer_auth" = [])),
    tag = "Reviews"
)]
pub async fn create_courier_review(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateCourierReviewRequest>,
) -> AppResult<Json<ApiResponse<CourierReview>>> {
    let resp = review_service::create_courier_review(&state, &user, payload).await?;
    Ok(Json(resp))
}

// Reviews are immutable once created; both verbs on both collections land here.
#[utoipa::path(
    put,
    path = "/api/store-reviews/{id}",
    responses((status = 403, description = "Reviews cannot be modified")),
    security(("bearer_auth" = [])),
    tag = "Reviews"
)]
pub async fn reject_mutation(
    _user: AuthUser,
    Path(_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = review_service::reject_review_mutation()?;
    Ok(Json(resp))
}
