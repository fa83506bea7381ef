use std::collections::HashMap;

use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, TransactionTrait};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::cart::{AddCartItemRequest, UpdateCartItemRequest},
    entity::{
        cart_items::{
            ActiveModel as CartItemActive, Column as CartItemCol, Entity as CartItems,
            Model as CartItemModel,
        },
        carts::{ActiveModel as CartActive, Column as CartCol, Entity as Carts, Model as CartModel},
        products::{Column as ProductCol, Entity as Products},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Cart, CartItem, Product},
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn get_cart(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<Cart>> {
    let cart = find_own_cart(state, user).await?;
    let items = load_cart_items(state, cart.id).await?;

    Ok(ApiResponse::success(
        "Cart",
        Cart {
            id: cart.id,
            user_id: cart.user_id,
            items,
        },
        None,
    ))
}

pub async fn create_cart(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<Cart>> {
    let exist = Carts::find()
        .filter(CartCol::UserId.eq(user.user_id))
        .one(&state.orm)
        .await?;
    if exist.is_some() {
        return Err(AppError::Validation("cart: user already has a cart".into()));
    }

    let cart = CartActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.user_id),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(ApiResponse::success(
        "Cart created",
        Cart {
            id: cart.id,
            user_id: cart.user_id,
            items: Vec::new(),
        },
        Some(Meta::empty()),
    ))
}

pub async fn delete_cart(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let cart = find_own_cart(state, user).await?;

    let txn = state.orm.begin().await?;
    CartItems::delete_many()
        .filter(CartItemCol::CartId.eq(cart.id))
        .exec(&txn)
        .await?;
    Carts::delete_by_id(cart.id).exec(&txn).await?;
    txn.commit().await?;

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

pub async fn add_item(
    state: &AppState,
    user: &AuthUser,
    payload: AddCartItemRequest,
) -> AppResult<ApiResponse<CartItem>> {
    if payload.quantity < 1 {
        return Err(AppError::Validation("quantity: must be at least 1".into()));
    }

    let cart = find_own_cart(state, user).await?;

    let product = Products::find_by_id(payload.product_id)
        .one(&state.orm)
        .await?;
    let product = match product {
        Some(p) => p,
        None => return Err(AppError::Validation("product_id: product not found".into())),
    };

    let exist = CartItems::find()
        .filter(CartItemCol::CartId.eq(cart.id))
        .filter(CartItemCol::ProductId.eq(payload.product_id))
        .one(&state.orm)
        .await?;

    let item = if let Some(item) = exist {
        let mut active: CartItemActive = item.into();
        active.quantity = Set(payload.quantity);
        active.update(&state.orm).await?
    } else {
        CartItemActive {
            id: Set(Uuid::new_v4()),
            cart_id: Set(cart.id),
            product_id: Set(payload.product_id),
            quantity: Set(payload.quantity),
            created_at: NotSet,
        }
        .insert(&state.orm)
        .await?
    };

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "cart_update",
        Some("cart_items"),
        Some(serde_json::json!({ "product_id": payload.product_id, "quantity": payload.quantity })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "OK",
        item_view(&item, product_from_entity(product)),
        None,
    ))
}

pub async fn update_item(
    state: &AppState,
    user: &AuthUser,
    item_id: Uuid,
    payload: UpdateCartItemRequest,
) -> AppResult<ApiResponse<CartItem>> {
    if payload.quantity < 1 {
        return Err(AppError::Validation("quantity: must be at least 1".into()));
    }

    let cart = find_own_cart(state, user).await?;

    let existing = CartItems::find_by_id(item_id).one(&state.orm).await?;
    let existing = match existing {
        Some(i) if i.cart_id == cart.id => i,
        _ => return Err(AppError::NotFound),
    };

    let product_id = existing.product_id;
    let mut active: CartItemActive = existing.into();
    active.quantity = Set(payload.quantity);
    let item = active.update(&state.orm).await?;

    let product = Products::find_by_id(product_id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("cart item {} has no product", item_id)))?;

    Ok(ApiResponse::success(
        "Updated",
        item_view(&item, product_from_entity(product)),
        Some(Meta::empty()),
    ))
}

pub async fn remove_item(
    state: &AppState,
    user: &AuthUser,
    item_id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let cart = find_own_cart(state, user).await?;

    let result = CartItems::delete_many()
        .filter(CartItemCol::Id.eq(item_id))
        .filter(CartItemCol::CartId.eq(cart.id))
        .exec(&state.orm)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "cart_remove",
        Some("cart_items"),
        Some(serde_json::json!({ "cart_item_id": item_id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Removed from cart",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

/// Aggregate total over the line items. The item serializer never re-sums;
/// this is the single place the cart-wide figure comes from.
pub fn cart_total(items: &[CartItem]) -> i64 {
    items.iter().map(|item| item.total_price).sum()
}

/// Items of a cart with their products and derived line totals.
pub(crate) async fn load_cart_items(state: &AppState, cart_id: Uuid) -> AppResult<Vec<CartItem>> {
    let item_models = CartItems::find()
        .filter(CartItemCol::CartId.eq(cart_id))
        .all(&state.orm)
        .await?;

    let product_ids: Vec<Uuid> = item_models.iter().map(|i| i.product_id).collect();
    let products: HashMap<Uuid, Product> = Products::find()
        .filter(ProductCol::Id.is_in(product_ids))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|p| (p.id, product_from_entity(p)))
        .collect();

    let mut items = Vec::with_capacity(item_models.len());
    for item in &item_models {
        let product = products.get(&item.product_id).ok_or_else(|| {
            AppError::Internal(anyhow::anyhow!("cart item {} has no product", item.id))
        })?;
        items.push(item_view(
            item,
            Product {
                id: product.id,
                name: product.name.clone(),
                image: product.image.clone(),
                description: product.description.clone(),
                price: product.price,
                store_id: product.store_id,
            },
        ));
    }
    Ok(items)
}

async fn find_own_cart(state: &AppState, user: &AuthUser) -> AppResult<CartModel> {
    let cart = Carts::find()
        .filter(CartCol::UserId.eq(user.user_id))
        .one(&state.orm)
        .await?;
    match cart {
        Some(c) => Ok(c),
        None => Err(AppError::NotFound),
    }
}

fn item_view(item: &CartItemModel, product: Product) -> CartItem {
    let total_price = product.price * i64::from(item.quantity);
    CartItem {
        id: item.id,
        product,
        quantity: item.quantity,
        total_price,
    }
}

fn product_from_entity(model: crate::entity::products::Model) -> Product {
    Product {
        id: model.id,
        name: model.name,
        image: model.image,
        description: model.description,
        price: model.price,
        store_id: model.store_id,
    }
}
