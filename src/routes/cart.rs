use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post, put},
};
use uuid::Uuid;

use crate::{
    dto::cart::{AddCartItemRequest, UpdateCartItemRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::{Cart, CartItem},
    response::ApiResponse,
    services::cart_service,
    state::AppState,
};

// One cart per user; the resource is addressed without an id.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_cart).post(create_cart).delete(delete_cart))
        .route("/items", post(add_item))
        .route("/items/{id}", put(update_item).delete(remove_item))
}

#[utoipa::path(
    get,
    path = "/api/cart",
    responses(
        (status = 200, description = "Current user's cart with line totals", body = ApiResponse<Cart>),
        (status = 404, description = "No cart yet"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn get_cart(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<Cart>>> {
    let resp = cart_service::get_cart(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/cart",
    responses(
        (status = 201, description = "Create the user's cart", body = ApiResponse<Cart>),
        (status = 400, description = "Cart already exists"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn create_cart(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<Cart>>> {
    let resp = cart_service::create_cart(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(delete, path = "/api/cart", security(("bearer_auth" = [])), tag = "Cart")]
pub async fn delete_cart(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = cart_service::delete_cart(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/cart/items",
    request_body = AddCartItemRequest,
    responses(
        (status = 200, description = "Add or update a cart item", body = ApiResponse<CartItem>),
        (status = 400, description = "Bad request"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn add_item(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<AddCartItemRequest>,
) -> AppResult<Json<ApiResponse<CartItem>>> {
    let resp = cart_service::add_item(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(put, path = "/api/cart/items/{id}", security(("bearer_auth" = [])), tag = "Cart")]
pub async fn update_item(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCartItemRequest>,
) -> AppResult<Json<ApiResponse<CartItem>>> {
    let resp = cart_service::update_item(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(delete, path = "/api/cart/items/{id}", security(("bearer_auth" = [])), tag = "Cart")]
pub async fn remove_item(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = cart_service::remove_item(&state, &user, id).await?;
    Ok(Json(resp))
}
