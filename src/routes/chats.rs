use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::chats::{ChatList, CreateChatRequest, MessageList, PostMessageRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::{Chat, Message},
    response::ApiResponse,
    services::chat_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_chats).post(create_chat))
        .route("/{id}/messages", get(list_messages).post(post_message))
}

#[utoipa::path(get, path = "/api/chats", security(("bearer_auth" = [])), tag = "Chats")]
pub async fn list_chats(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<ChatList>>> {
    let resp = chat_service::list_chats(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/chats",
    request_body = CreateChatRequest,
    responses(
        (status = 201, description = "Create chat with participants", body = ApiResponse<Chat>)
    ),
    security(("bearer_auth" = [])),
    tag = "Chats"
)]
pub async fn create_chat(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateChatRequest>,
) -> AppResult<Json<ApiResponse<Chat>>> {
    let resp = chat_service::create_chat(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(get, path = "/api/chats/{id}/messages", security(("bearer_auth" = [])), tag = "Chats")]
pub async fn list_messages(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<MessageList>>> {
    let resp = chat_service::list_messages(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/chats/{id}/messages",
    request_body = PostMessageRequest,
    security(("bearer_auth" = [])),
    tag = "Chats"
)]
pub async fn post_message(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<PostMessageRequest>,
) -> AppResult<Json<ApiResponse<Message>>> {
    let resp = chat_service::post_message(&state, &user, id, payload).await?;
    Ok(Json(resp))
}
