use axum::{Json, Router, extract::State, routing::post};

use crate::{
    dto::auth::{AuthResponse, LoginRequest, LogoutRequest, RegisterRequest},
    error::AppResult,
    response::ApiResponse,
    services::auth_service::{login_user, logout_user, register_user},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
}

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Register user and issue a token pair", body = ApiResponse<AuthResponse>),
        (status = 400, description = "Validation failed")
    ),
    tag = "Auth"
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<Json<ApiResponse<AuthResponse>>> {
    let resp = register_user(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login user and issue a token pair", body = ApiResponse<AuthResponse>),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<ApiResponse<AuthResponse>>> {
    let resp = login_user(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    request_body = LogoutRequest,
    responses(
        (status = 200, description = "Invalidate a refresh token"),
        (status = 400, description = "Malformed or already revoked token")
    ),
    tag = "Auth"
)]
pub async fn logout(
    State(state): State<AppState>,
    Json(payload): Json<LogoutRequest>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = logout_user(&state, payload).await?;
    Ok(Json(resp))
}
