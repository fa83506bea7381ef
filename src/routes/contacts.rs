use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::catalog::{ContactInfoList, CreateContactInfoRequest, UpdateContactInfoRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::ContactInfo,
    response::ApiResponse,
    routes::params::StoreScopedQuery,
    services::catalog_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_contacts).post(create_contact))
        .route(
            "/{id}",
            axum::routing::put(update_contact).delete(delete_contact),
        )
}

#[utoipa::path(get, path = "/api/contacts", tag = "Catalog")]
pub async fn list_contacts(
    State(state): State<AppState>,
    Query(query): Query<StoreScopedQuery>,
) -> AppResult<Json<ApiResponse<ContactInfoList>>> {
    let resp = catalog_service::list_contacts(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/contacts",
    request_body = CreateContactInfoRequest,
    security(("bearer_auth" = [])),
    tag = "Catalog"
)]
pub async fn create_contact(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateContactInfoRequest>,
) -> AppResult<Json<ApiResponse<ContactInfo>>> {
    let resp = catalog_service::create_contact(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(put, path = "/api/contacts/{id}", security(("bearer_auth" = [])), tag = "Catalog")]
pub async fn update_contact(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateContactInfoRequest>,
) -> AppResult<Json<ApiResponse<ContactInfo>>> {
    let resp = catalog_service::update_contact(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(delete, path = "/api/contacts/{id}", security(("bearer_auth" = [])), tag = "Catalog")]
pub async fn delete_contact(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = catalog_service::delete_contact(&state, &user, id).await?;
    Ok(Json(resp))
}
