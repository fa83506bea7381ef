use sea_orm::{
    ActiveModelTrait, EntityTrait, PaginatorTrait, QuerySelect, Set,
};
use uuid::Uuid;

use crate::{
    dto::couriers::{CourierList, CreateCourierRequest, UpdateCourierRequest},
    entity::{
        couriers::{ActiveModel as CourierActive, Entity as Couriers, Model as CourierModel},
        orders::Entity as Orders,
        users::Entity as Users,
    },
    error::{AppError, AppResult},
    models::Courier,
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    state::AppState,
};

pub async fn list_couriers(
    state: &AppState,
    pagination: Pagination,
) -> AppResult<ApiResponse<CourierList>> {
    let (page, limit, offset) = pagination.normalize();

    let finder = Couriers::find();
    let total = finder.clone().count(&state.orm).await? as i64;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(courier_from_entity)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Couriers", CourierList { items }, Some(meta)))
}

pub async fn get_courier(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Courier>> {
    let result = Couriers::find_by_id(id)
        .one(&state.orm)
        .await?
        .map(courier_from_entity);
    let result = match result {
        Some(c) => c,
        None => return Err(AppError::NotFound),
    };
    Ok(ApiResponse::success("Courier", result, None))
}

pub async fn create_courier(
    state: &AppState,
    payload: CreateCourierRequest,
) -> AppResult<ApiResponse<Courier>> {
    let user = Users::find_by_id(payload.user_id).one(&state.orm).await?;
    if user.is_none() {
        return Err(AppError::Validation("user_id: user not found".into()));
    }
    let order = Orders::find_by_id(payload.current_order_id)
        .one(&state.orm)
        .await?;
    if order.is_none() {
        return Err(AppError::Validation("current_order_id: order not found".into()));
    }

    let courier = CourierActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(payload.user_id),
        current_order_id: Set(payload.current_order_id),
        status: Set(payload.status),
    }
    .insert(&state.orm)
    .await?;

    Ok(ApiResponse::success(
        "Courier created",
        courier_from_entity(courier),
        Some(Meta::empty()),
    ))
}

pub async fn update_courier(
    state: &AppState,
    id: Uuid,
    payload: UpdateCourierRequest,
) -> AppResult<ApiResponse<Courier>> {
    let existing = Couriers::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(c) => c,
        None => return Err(AppError::NotFound),
    };

    if let Some(order_id) = payload.current_order_id {
        let order = Orders::find_by_id(order_id).one(&state.orm).await?;
        if order.is_none() {
            return Err(AppError::Validation("current_order_id: order not found".into()));
        }
    }

    let mut active: CourierActive = existing.into();
    if let Some(order_id) = payload.current_order_id {
        active.current_order_id = Set(order_id);
    }
    if let Some(status) = payload.status {
        active.status = Set(status);
    }
    let courier = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Updated",
        courier_from_entity(courier),
        Some(Meta::empty()),
    ))
}

pub async fn delete_courier(
    state: &AppState,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = Couriers::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

fn courier_from_entity(model: CourierModel) -> Courier {
    Courier {
        id: model.id,
        user_id: model.user_id,
        current_order_id: model.current_order_id,
        status: model.status,
    }
}
