use std::collections::HashMap;

use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use chrono::Utc;
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::orders::{CreateOrderRequest, OrderList, UpdateOrderRequest},
    entity::{
        carts::{Column as CartCol, Entity as Carts},
        orders::{
            ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel,
            OrderStatus,
        },
        users::{Column as UserCol, Entity as Users},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{OrderDetail, OrderSummary, UserBrief},
    policy,
    response::{ApiResponse, Meta},
    routes::params::{OrderListQuery, SortOrder},
    services::cart_service,
    state::AppState,
};

pub async fn list_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    policy::ensure(policy::can_access_orders(user))?;

    let (page, limit, offset) = query.pagination.normalize();

    // Rows where the actor placed the order or is assigned to deliver it.
    let mut condition = Condition::all().add(
        Condition::any()
            .add(OrderCol::ClientId.eq(user.user_id))
            .add(OrderCol::CourierId.eq(user.user_id)),
    );
    if let Some(status) = query.status.as_ref().filter(|s| !s.is_empty()) {
        condition = condition.add(OrderCol::Status.eq(status.clone()));
    }

    let sort_order = query.sort_order.unwrap_or(SortOrder::Desc);
    let mut finder = Orders::find().filter(condition);
    finder = match sort_order {
        SortOrder::Asc => finder.order_by_asc(OrderCol::CreatedAt),
        SortOrder::Desc => finder.order_by_desc(OrderCol::CreatedAt),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let orders = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?;

    let client_ids: Vec<Uuid> = orders.iter().map(|o| o.client_id).collect();
    let clients: HashMap<Uuid, UserBrief> = Users::find()
        .filter(UserCol::Id.is_in(client_ids))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|u| (u.id, UserBrief::from_user(&u)))
        .collect();

    let mut items = Vec::with_capacity(orders.len());
    for order in orders {
        let client = clients.get(&order.client_id).cloned().ok_or_else(|| {
            AppError::Internal(anyhow::anyhow!("order {} has no client", order.id))
        })?;
        items.push(order_summary(order, client));
    }

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Orders", OrderList { items }, Some(meta)))
}

pub async fn create_order(
    state: &AppState,
    user: &AuthUser,
    payload: CreateOrderRequest,
) -> AppResult<ApiResponse<OrderDetail>> {
    policy::ensure(policy::can_access_orders(user))?;

    if payload.delivery_address.trim().is_empty() {
        return Err(AppError::Validation("delivery_address: must not be empty".into()));
    }

    let cart = Carts::find()
        .filter(CartCol::UserId.eq(user.user_id))
        .one(&state.orm)
        .await?;
    let cart = match cart {
        Some(c) => c,
        None => return Err(AppError::Validation("cart: user has no cart".into())),
    };

    // A courier is any user reference; the role is not checked at this layer.
    let courier = Users::find_by_id(payload.courier_id).one(&state.orm).await?;
    if courier.is_none() {
        return Err(AppError::Validation("courier_id: user not found".into()));
    }

    let order = OrderActive {
        id: Set(Uuid::new_v4()),
        client_id: Set(user.user_id),
        cart_id: Set(cart.id),
        status: Set(OrderStatus::Pending),
        delivery_address: Set(payload.delivery_address),
        courier_id: Set(payload.courier_id),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "order_create",
        Some("orders"),
        Some(serde_json::json!({ "order_id": order.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    let detail = order_detail(state, order).await?;
    Ok(ApiResponse::success("Order created", detail, Some(Meta::empty())))
}

pub async fn get_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<OrderDetail>> {
    policy::ensure(policy::can_access_orders(user))?;

    let order = Orders::find_by_id(id).one(&state.orm).await?;
    let order = match order {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };

    policy::ensure(policy::owns_order(user, order.client_id))?;

    let detail = order_detail(state, order).await?;
    Ok(ApiResponse::success("Order", detail, Some(Meta::empty())))
}

pub async fn update_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateOrderRequest,
) -> AppResult<ApiResponse<OrderDetail>> {
    policy::ensure(policy::can_access_orders(user))?;

    let existing = Orders::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };

    policy::ensure(policy::owns_order(user, existing.client_id))?;

    let mut active: OrderActive = existing.into();
    if let Some(status) = payload.status {
        active.status = Set(status);
    }
    if let Some(delivery_address) = payload.delivery_address {
        if delivery_address.trim().is_empty() {
            return Err(AppError::Validation("delivery_address: must not be empty".into()));
        }
        active.delivery_address = Set(delivery_address);
    }
    let order = active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "order_update",
        Some("orders"),
        Some(serde_json::json!({ "order_id": order.id, "status": order.status.as_str() })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    let detail = order_detail(state, order).await?;
    Ok(ApiResponse::success("Updated", detail, Some(Meta::empty())))
}

pub async fn delete_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    policy::ensure(policy::can_access_orders(user))?;

    let existing = Orders::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };

    policy::ensure(policy::owns_order(user, existing.client_id))?;

    Orders::delete_by_id(id).exec(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "order_delete",
        Some("orders"),
        Some(serde_json::json!({ "order_id": id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

async fn order_detail(state: &AppState, order: OrderModel) -> AppResult<OrderDetail> {
    let client = Users::find_by_id(order.client_id)
        .one(&state.orm)
        .await?
        .map(|u| UserBrief::from_user(&u))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("order {} has no client", order.id)))?;

    let items = cart_service::load_cart_items(state, order.cart_id).await?;
    let total_price = cart_service::cart_total(&items);

    Ok(OrderDetail {
        id: order.id,
        client,
        courier_id: order.courier_id,
        delivery_address: order.delivery_address,
        status: order.status,
        created_at: order.created_at.with_timezone(&Utc),
        items,
        total_price,
    })
}

fn order_summary(order: OrderModel, client: UserBrief) -> OrderSummary {
    OrderSummary {
        id: order.id,
        client,
        courier_id: order.courier_id,
        delivery_address: order.delivery_address,
        status: order.status,
        created_at: order.created_at.with_timezone(&Utc),
    }
}
