use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, PaginatorTrait, QueryOrder, QuerySelect, Set};
use uuid::Uuid;

use crate::{
    dto::users::{UpdateUserRequest, UserList},
    entity::users::{ActiveModel as UserActive, Column as UserCol, Entity as Users, Model as UserModel},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::User,
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    state::AppState,
};

pub async fn list_users(
    state: &AppState,
    pagination: Pagination,
) -> AppResult<ApiResponse<UserList>> {
    let (page, limit, offset) = pagination.normalize();

    let finder = Users::find().order_by_asc(UserCol::Username);
    let total = finder.clone().count(&state.orm).await? as i64;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(user_from_entity)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Users", UserList { items }, Some(meta)))
}

pub async fn get_user(state: &AppState, id: Uuid) -> AppResult<ApiResponse<User>> {
    let result = Users::find_by_id(id)
        .one(&state.orm)
        .await?
        .map(user_from_entity);
    let result = match result {
        Some(u) => u,
        None => return Err(AppError::NotFound),
    };
    Ok(ApiResponse::success("User", result, None))
}

// Profile mutations are self-scoped; the role never changes.
pub async fn update_user(
    state: &AppState,
    actor: &AuthUser,
    id: Uuid,
    payload: UpdateUserRequest,
) -> AppResult<ApiResponse<User>> {
    let existing = Users::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(u) => u,
        None => return Err(AppError::NotFound),
    };

    if actor.user_id != existing.id {
        return Err(AppError::Forbidden);
    }

    let mut active: UserActive = existing.into();
    if let Some(email) = payload.email {
        active.email = Set(email);
    }
    if let Some(first_name) = payload.first_name {
        active.first_name = Set(first_name);
    }
    if let Some(last_name) = payload.last_name {
        active.last_name = Set(last_name);
    }
    if let Some(phone_number) = payload.phone_number {
        active.phone_number = Set(Some(phone_number));
    }
    let user = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Updated",
        user_from_entity(user),
        Some(Meta::empty()),
    ))
}

pub async fn delete_user(
    state: &AppState,
    actor: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    if actor.user_id != id {
        return Err(AppError::Forbidden);
    }

    let result = Users::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

fn user_from_entity(model: UserModel) -> User {
    User {
        id: model.id,
        username: model.username,
        email: model.email,
        first_name: model.first_name,
        last_name: model.last_name,
        role: model.role,
        phone_number: model.phone_number,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
