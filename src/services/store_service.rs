use std::collections::HashMap;

use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::stores::{CreateStoreRequest, StoreList, UpdateStoreRequest},
    entity::{
        cart_items::{Column as CartItemCol, Entity as CartItems},
        categories::{Column as CategoryCol, Entity as Categories},
        contact_infos::{Column as ContactCol, Entity as ContactInfos},
        product_combos::{Column as ComboCol, Entity as ProductCombos},
        products::{Column as ProductCol, Entity as Products},
        store_reviews::{Column as ReviewCol, Entity as StoreReviews},
        stores::{ActiveModel as StoreActive, Column as StoreCol, Entity as Stores, Model as StoreModel},
        users::{Column as UserCol, Entity as Users},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{
        Category, ContactInfo, Product, ProductCombo, Store, StoreDetail, StoreReview,
        StoreSummary, UserBrief,
    },
    policy::{self, Method},
    ratings,
    response::{ApiResponse, Meta},
    routes::params::{SortOrder, StoreQuery, StoreSortBy},
    state::AppState,
};

pub async fn list_stores(state: &AppState, query: StoreQuery) -> AppResult<ApiResponse<StoreList>> {
    let (page, limit, offset) = query.pagination.normalize();

    let mut condition = Condition::all();
    if let Some(category_id) = query.category {
        condition = condition.add(StoreCol::CategoryId.eq(category_id));
    }
    if let Some(search) = query.q.as_ref().filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", search);
        condition = condition.add(Expr::col(StoreCol::Name).ilike(pattern));
    }

    let sort_by = query.sort_by.unwrap_or(StoreSortBy::Name);
    let sort_order = query.sort_order.unwrap_or(SortOrder::Asc);
    let sort_col = match sort_by {
        StoreSortBy::Name => StoreCol::Name,
        StoreSortBy::CreatedAt => StoreCol::CreatedAt,
    };

    let mut finder = Stores::find().filter(condition);
    finder = match sort_order {
        SortOrder::Asc => finder.order_by_asc(sort_col),
        SortOrder::Desc => finder.order_by_desc(sort_col),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let stores = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?;

    let category_ids: Vec<Uuid> = stores.iter().map(|s| s.category_id).collect();
    let categories: HashMap<Uuid, Category> = Categories::find()
        .filter(CategoryCol::Id.is_in(category_ids))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|c| (c.id, Category { id: c.id, name: c.name }))
        .collect();

    // Ratings are recomputed from the raw review rows on every request.
    let store_ids: Vec<Uuid> = stores.iter().map(|s| s.id).collect();
    let reviews = StoreReviews::find()
        .filter(ReviewCol::StoreId.is_in(store_ids))
        .all(&state.orm)
        .await?;
    let mut ratings_by_store: HashMap<Uuid, Vec<i32>> = HashMap::new();
    for review in reviews {
        ratings_by_store
            .entry(review.store_id)
            .or_default()
            .push(review.rating);
    }

    let mut items = Vec::with_capacity(stores.len());
    for store in stores {
        let category = categories
            .get(&store.category_id)
            .cloned()
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("store {} has no category", store.id)))?;
        let store_ratings = ratings_by_store.remove(&store.id).unwrap_or_default();
        items.push(StoreSummary {
            id: store.id,
            name: store.name,
            image: store.image,
            category,
            avg_rating: ratings::average_rating(&store_ratings),
            reviewer_count: ratings::reviewer_count(store_ratings.len()),
            good_review_percentage: ratings::good_review_percentage(&store_ratings),
        });
    }

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Stores", StoreList { items }, Some(meta)))
}

pub async fn get_store(state: &AppState, id: Uuid) -> AppResult<ApiResponse<StoreDetail>> {
    // Object gate inherited from the courier flow; retrieval is a safe
    // method, so only the safe branch is reachable here.
    policy::ensure(policy::can_mutate_as_courier(Method::Safe, None))?;

    let store = Stores::find_by_id(id).one(&state.orm).await?;
    let store = match store {
        Some(s) => s,
        None => return Err(AppError::NotFound),
    };

    let category = Categories::find_by_id(store.category_id)
        .one(&state.orm)
        .await?
        .map(|c| Category { id: c.id, name: c.name })
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("store {} has no category", store.id)))?;

    let owner = Users::find_by_id(store.owner_id)
        .one(&state.orm)
        .await?
        .map(|u| UserBrief::from_user(&u))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("store {} has no owner", store.id)))?;

    let products: Vec<Product> = Products::find()
        .filter(ProductCol::StoreId.eq(store.id))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(product_from_entity)
        .collect();

    let combos: Vec<ProductCombo> = ProductCombos::find()
        .filter(ComboCol::StoreId.eq(store.id))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|m| ProductCombo {
            id: m.id,
            name: m.name,
            image: m.image,
            description: m.description,
            price: m.price,
            store_id: m.store_id,
        })
        .collect();

    let contacts: Vec<ContactInfo> = ContactInfos::find()
        .filter(ContactCol::StoreId.eq(store.id))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|m| ContactInfo {
            id: m.id,
            phone_number: m.phone_number,
            store_id: m.store_id,
        })
        .collect();

    let review_models = StoreReviews::find()
        .filter(ReviewCol::StoreId.eq(store.id))
        .all(&state.orm)
        .await?;
    let client_ids: Vec<Uuid> = review_models.iter().map(|r| r.client_id).collect();
    let clients: HashMap<Uuid, UserBrief> = Users::find()
        .filter(UserCol::Id.is_in(client_ids))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|u| (u.id, UserBrief::from_user(&u)))
        .collect();

    let mut reviews = Vec::with_capacity(review_models.len());
    for review in review_models {
        let client = clients
            .get(&review.client_id)
            .cloned()
            .ok_or_else(|| {
                AppError::Internal(anyhow::anyhow!("review {} has no client", review.id))
            })?;
        reviews.push(StoreReview {
            id: review.id,
            store_id: review.store_id,
            client,
            rating: review.rating,
            comment: review.comment,
        });
    }

    let detail = StoreDetail {
        id: store.id,
        name: store.name,
        image: store.image,
        category,
        description: store.description,
        address: store.address,
        owner,
        products,
        combos,
        contacts,
        reviews,
    };

    Ok(ApiResponse::success("Store", detail, None))
}

pub async fn create_store(
    state: &AppState,
    user: &AuthUser,
    payload: CreateStoreRequest,
) -> AppResult<ApiResponse<Store>> {
    policy::ensure(policy::can_create_store(user))?;

    let category = Categories::find_by_id(payload.category_id)
        .one(&state.orm)
        .await?;
    if category.is_none() {
        return Err(AppError::Validation("category_id: category not found".into()));
    }

    let store = StoreActive {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name),
        image: Set(payload.image),
        category_id: Set(payload.category_id),
        description: Set(payload.description),
        address: Set(payload.address),
        owner_id: Set(user.user_id),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "store_create",
        Some("stores"),
        Some(serde_json::json!({ "store_id": store.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Store created",
        store_from_entity(store),
        Some(Meta::empty()),
    ))
}

pub async fn update_store(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateStoreRequest,
) -> AppResult<ApiResponse<Store>> {
    // Role-level gate first, object-level gate after the fetch, exactly as
    // stacked upstream.
    policy::ensure(policy::can_create_store(user))?;

    let existing = Stores::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(s) => s,
        None => return Err(AppError::NotFound),
    };

    policy::ensure(policy::can_modify_store(user, Method::Mutating, existing.owner_id))?;

    if let Some(category_id) = payload.category_id {
        let category = Categories::find_by_id(category_id).one(&state.orm).await?;
        if category.is_none() {
            return Err(AppError::Validation("category_id: category not found".into()));
        }
    }

    let mut active: StoreActive = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(name);
    }
    if let Some(image) = payload.image {
        active.image = Set(image);
    }
    if let Some(category_id) = payload.category_id {
        active.category_id = Set(category_id);
    }
    if let Some(description) = payload.description {
        active.description = Set(description);
    }
    if let Some(address) = payload.address {
        active.address = Set(address);
    }

    let store = active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "store_update",
        Some("stores"),
        Some(serde_json::json!({ "store_id": store.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Updated",
        store_from_entity(store),
        Some(Meta::empty()),
    ))
}

/// Deletes the store and everything it owns in a single transaction. The SQL
/// `ON DELETE CASCADE` clauses remain as a storage-layer backstop.
pub async fn delete_store(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    policy::ensure(policy::can_create_store(user))?;

    let existing = Stores::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(s) => s,
        None => return Err(AppError::NotFound),
    };

    policy::ensure(policy::can_modify_store(user, Method::Mutating, existing.owner_id))?;

    let txn = state.orm.begin().await?;

    StoreReviews::delete_many()
        .filter(ReviewCol::StoreId.eq(id))
        .exec(&txn)
        .await?;
    ContactInfos::delete_many()
        .filter(ContactCol::StoreId.eq(id))
        .exec(&txn)
        .await?;

    let product_ids: Vec<Uuid> = Products::find()
        .filter(ProductCol::StoreId.eq(id))
        .all(&txn)
        .await?
        .into_iter()
        .map(|p| p.id)
        .collect();
    if !product_ids.is_empty() {
        CartItems::delete_many()
            .filter(CartItemCol::ProductId.is_in(product_ids.clone()))
            .exec(&txn)
            .await?;
        Products::delete_many()
            .filter(ProductCol::Id.is_in(product_ids))
            .exec(&txn)
            .await?;
    }

    ProductCombos::delete_many()
        .filter(ComboCol::StoreId.eq(id))
        .exec(&txn)
        .await?;
    Stores::delete_by_id(id).exec(&txn).await?;

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "store_delete",
        Some("stores"),
        Some(serde_json::json!({ "store_id": id })),
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

fn store_from_entity(model: StoreModel) -> Store {
    Store {
        id: model.id,
        name: model.name,
        image: model.image,
        category_id: model.category_id,
        description: model.description,
        address: model.address,
        owner_id: model.owner_id,
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
