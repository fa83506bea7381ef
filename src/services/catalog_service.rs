//! CRUD over the catalog collections a store owns: categories, products,
//! combos and contact numbers. Writes all pass the generic owner gate.

use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::catalog::{
        CategoryList, ContactInfoList, CreateCategoryRequest, CreateContactInfoRequest,
        CreateProductRequest, ProductComboList, ProductList, UpdateCategoryRequest,
        UpdateContactInfoRequest, UpdateProductRequest,
    },
    entity::{
        categories::{ActiveModel as CategoryActive, Entity as Categories},
        contact_infos::{ActiveModel as ContactActive, Column as ContactCol, Entity as ContactInfos},
        product_combos::{ActiveModel as ComboActive, Column as ComboCol, Entity as ProductCombos},
        products::{ActiveModel as ProductActive, Column as ProductCol, Entity as Products},
        stores::Entity as Stores,
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Category, ContactInfo, Product, ProductCombo},
    policy::{self, Method},
    response::{ApiResponse, Meta},
    routes::params::{Pagination, StoreScopedQuery},
    state::AppState,
};

pub async fn list_categories(
    state: &AppState,
    pagination: Pagination,
) -> AppResult<ApiResponse<CategoryList>> {
    let (page, limit, offset) = pagination.normalize();
    let finder = Categories::find();
    let total = finder.clone().count(&state.orm).await? as i64;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|c| Category { id: c.id, name: c.name })
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Categories", CategoryList { items }, Some(meta)))
}

pub async fn create_category(
    state: &AppState,
    user: &AuthUser,
    payload: CreateCategoryRequest,
) -> AppResult<ApiResponse<Category>> {
    policy::ensure(policy::can_write_catalog(user, Method::Mutating))?;

    let category = CategoryActive {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name),
    }
    .insert(&state.orm)
    .await?;

    Ok(ApiResponse::success(
        "Category created",
        Category { id: category.id, name: category.name },
        Some(Meta::empty()),
    ))
}

pub async fn update_category(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateCategoryRequest,
) -> AppResult<ApiResponse<Category>> {
    policy::ensure(policy::can_write_catalog(user, Method::Mutating))?;

    let existing = Categories::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(c) => c,
        None => return Err(AppError::NotFound),
    };

    let mut active: CategoryActive = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(name);
    }
    let category = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Updated",
        Category { id: category.id, name: category.name },
        Some(Meta::empty()),
    ))
}

pub async fn delete_category(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    policy::ensure(policy::can_write_catalog(user, Method::Mutating))?;

    let result = Categories::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

pub async fn list_products(
    state: &AppState,
    query: StoreScopedQuery,
) -> AppResult<ApiResponse<ProductList>> {
    let (page, limit, offset) = query.pagination.normalize();
    let mut condition = Condition::all();
    if let Some(store_id) = query.store_id {
        condition = condition.add(ProductCol::StoreId.eq(store_id));
    }

    let finder = Products::find().filter(condition).order_by_asc(ProductCol::Name);
    let total = finder.clone().count(&state.orm).await? as i64;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(product_from_entity)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Products", ProductList { items }, Some(meta)))
}

pub async fn get_product(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Product>> {
    let result = Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .map(product_from_entity);
    let result = match result {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };
    Ok(ApiResponse::success("Product", result, None))
}

pub async fn create_product(
    state: &AppState,
    user: &AuthUser,
    payload: CreateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    policy::ensure(policy::can_write_catalog(user, Method::Mutating))?;
    validate_price(payload.price)?;
    ensure_store_exists(state, payload.store_id).await?;

    let product = ProductActive {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name),
        image: Set(payload.image),
        description: Set(payload.description),
        price: Set(payload.price),
        store_id: Set(payload.store_id),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "product_create",
        Some("products"),
        Some(serde_json::json!({ "product_id": product.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Product created",
        product_from_entity(product),
        Some(Meta::empty()),
    ))
}

pub async fn update_product(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    policy::ensure(policy::can_write_catalog(user, Method::Mutating))?;
    if let Some(price) = payload.price {
        validate_price(price)?;
    }

    let existing = Products::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };

    let mut active: ProductActive = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(name);
    }
    if let Some(image) = payload.image {
        active.image = Set(image);
    }
    if let Some(description) = payload.description {
        active.description = Set(description);
    }
    if let Some(price) = payload.price {
        active.price = Set(price);
    }

    let product = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Updated",
        product_from_entity(product),
        Some(Meta::empty()),
    ))
}

pub async fn delete_product(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    policy::ensure(policy::can_write_catalog(user, Method::Mutating))?;

    let result = Products::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "product_delete",
        Some("products"),
        Some(serde_json::json!({ "product_id": id })),
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

pub async fn list_combos(
    state: &AppState,
    query: StoreScopedQuery,
) -> AppResult<ApiResponse<ProductComboList>> {
    let (page, limit, offset) = query.pagination.normalize();
    let mut condition = Condition::all();
    if let Some(store_id) = query.store_id {
        condition = condition.add(ComboCol::StoreId.eq(store_id));
    }

    let finder = ProductCombos::find().filter(condition).order_by_asc(ComboCol::Name);
    let total = finder.clone().count(&state.orm).await? as i64;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(combo_from_entity)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Combos", ProductComboList { items }, Some(meta)))
}

pub async fn get_combo(state: &AppState, id: Uuid) -> AppResult<ApiResponse<ProductCombo>> {
    let result = ProductCombos::find_by_id(id)
        .one(&state.orm)
        .await?
        .map(combo_from_entity);
    let result = match result {
        Some(c) => c,
        None => return Err(AppError::NotFound),
    };
    Ok(ApiResponse::success("Combo", result, None))
}

pub async fn create_combo(
    state: &AppState,
    user: &AuthUser,
    payload: CreateProductRequest,
) -> AppResult<ApiResponse<ProductCombo>> {
    policy::ensure(policy::can_write_catalog(user, Method::Mutating))?;
    validate_price(payload.price)?;
    ensure_store_exists(state, payload.store_id).await?;

    let combo = ComboActive {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name),
        image: Set(payload.image),
        description: Set(payload.description),
        price: Set(payload.price),
        store_id: Set(payload.store_id),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(ApiResponse::success(
        "Combo created",
        combo_from_entity(combo),
        Some(Meta::empty()),
    ))
}

pub async fn update_combo(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateProductRequest,
) -> AppResult<ApiResponse<ProductCombo>> {
    policy::ensure(policy::can_write_catalog(user, Method::Mutating))?;
    if let Some(price) = payload.price {
        validate_price(price)?;
    }

    let existing = ProductCombos::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(c) => c,
        None => return Err(AppError::NotFound),
    };

    let mut active: ComboActive = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(name);
    }
    if let Some(image) = payload.image {
        active.image = Set(image);
    }
    if let Some(description) = payload.description {
        active.description = Set(description);
    }
    if let Some(price) = payload.price {
        active.price = Set(price);
    }

    let combo = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Updated",
        combo_from_entity(combo),
        Some(Meta::empty()),
    ))
}

pub async fn delete_combo(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    policy::ensure(policy::can_write_catalog(user, Method::Mutating))?;

    let result = ProductCombos::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

pub async fn list_contacts(
    state: &AppState,
    query: StoreScopedQuery,
) -> AppResult<ApiResponse<ContactInfoList>> {
    let (page, limit, offset) = query.pagination.normalize();
    let mut condition = Condition::all();
    if let Some(store_id) = query.store_id {
        condition = condition.add(ContactCol::StoreId.eq(store_id));
    }

    let finder = ContactInfos::find().filter(condition);
    let total = finder.clone().count(&state.orm).await? as i64;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|m| ContactInfo {
            id: m.id,
            phone_number: m.phone_number,
            store_id: m.store_id,
        })
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Contacts", ContactInfoList { items }, Some(meta)))
}

pub async fn create_contact(
    state: &AppState,
    user: &AuthUser,
    payload: CreateContactInfoRequest,
) -> AppResult<ApiResponse<ContactInfo>> {
    policy::ensure(policy::can_write_catalog(user, Method::Mutating))?;
    ensure_store_exists(state, payload.store_id).await?;

    let contact = ContactActive {
        id: Set(Uuid::new_v4()),
        phone_number: Set(payload.phone_number),
        store_id: Set(payload.store_id),
    }
    .insert(&state.orm)
    .await?;

    Ok(ApiResponse::success(
        "Contact created",
        ContactInfo {
            id: contact.id,
            phone_number: contact.phone_number,
            store_id: contact.store_id,
        },
        Some(Meta::empty()),
    ))
}

pub async fn update_contact(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateContactInfoRequest,
) -> AppResult<ApiResponse<ContactInfo>> {
    policy::ensure(policy::can_write_catalog(user, Method::Mutating))?;

    let existing = ContactInfos::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(c) => c,
        None => return Err(AppError::NotFound),
    };

    let mut active: ContactActive = existing.into();
    if let Some(phone_number) = payload.phone_number {
        active.phone_number = Set(phone_number);
    }
    let contact = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Updated",
        ContactInfo {
            id: contact.id,
            phone_number: contact.phone_number,
            store_id: contact.store_id,
        },
        Some(Meta::empty()),
    ))
}

pub async fn delete_contact(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    policy::ensure(policy::can_write_catalog(user, Method::Mutating))?;

    let result = ContactInfos::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

fn validate_price(price: i64) -> AppResult<()> {
    if price < 0 {
        return Err(AppError::Validation("price: must not be negative".into()));
    }
    Ok(())
}

async fn ensure_store_exists(state: &AppState, store_id: Uuid) -> AppResult<()> {
    let store = Stores::find_by_id(store_id).one(&state.orm).await?;
    if store.is_none() {
        return Err(AppError::Validation("store_id: store not found".into()));
    }
    Ok(())
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

fn combo_from_entity(model: crate::entity::product_combos::Model) -> ProductCombo {
    ProductCombo {
        id: model.id,
        name: model.name,
        image: model.image,
        description: model.description,
        price: model.price,
        store_id: model.store_id,
    }
}
