//! Store and courier reviews. Creation is open to any authenticated user;
//! once written a review can never be edited or deleted through the API.

use std::collections::HashMap;

use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::reviews::{
        CourierReviewList, CreateCourierReviewRequest, CreateStoreReviewRequest, StoreReviewList,
    },
    entity::{
        courier_reviews::{
            ActiveModel as CourierReviewActive, Column as CourierReviewCol,
            Entity as CourierReviews,
        },
        store_reviews::{
            ActiveModel as StoreReviewActive, Column as StoreReviewCol, Entity as StoreReviews,
        },
        stores::Entity as Stores,
        users::{Column as UserCol, Entity as Users},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{CourierReview, StoreReview, UserBrief},
    policy::{self, Method},
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    state::AppState,
};

const CREATED_AT_FORMAT: &str = "%d-%m-%Y %H:%M";

pub async fn list_store_reviews(
    state: &AppState,
    pagination: Pagination,
) -> AppResult<ApiResponse<StoreReviewList>> {
    let (page, limit, offset) = pagination.normalize();

    let finder = StoreReviews::find().order_by_desc(StoreReviewCol::CreatedAt);
    let total = finder.clone().count(&state.orm).await? as i64;
    let review_models = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?;

    let client_ids: Vec<Uuid> = review_models.iter().map(|r| r.client_id).collect();
    let clients = briefs_by_id(state, client_ids).await?;

    let mut items = Vec::with_capacity(review_models.len());
    for review in review_models {
        let client = clients.get(&review.client_id).cloned().ok_or_else(|| {
            AppError::Internal(anyhow::anyhow!("review {} has no client", review.id))
        })?;
        items.push(StoreReview {
            id: review.id,
            store_id: review.store_id,
            client,
            rating: review.rating,
            comment: review.comment,
        });
    }

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Store reviews", StoreReviewList { items }, Some(meta)))
}

pub async fn create_store_review(
    state: &AppState,
    user: &AuthUser,
    payload: CreateStoreReviewRequest,
) -> AppResult<ApiResponse<StoreReview>> {
    validate_rating(payload.rating)?;

    let store = Stores::find_by_id(payload.store_id).one(&state.orm).await?;
    if store.is_none() {
        return Err(AppError::Validation("store_id: store not found".into()));
    }

    let review = StoreReviewActive {
        id: Set(Uuid::new_v4()),
        client_id: Set(user.user_id),
        store_id: Set(payload.store_id),
        rating: Set(payload.rating),
        comment: Set(payload.comment),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    let client = Users::find_by_id(user.user_id)
        .one(&state.orm)
        .await?
        .map(|u| UserBrief::from_user(&u))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("review author not found")))?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "store_review_create",
        Some("store_reviews"),
        Some(serde_json::json!({ "review_id": review.id, "store_id": review.store_id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Review created",
        StoreReview {
            id: review.id,
            store_id: review.store_id,
            client,
            rating: review.rating,
            comment: review.comment,
        },
        Some(Meta::empty()),
    ))
}

/// Mutations are rejected wholesale; there is no update/delete body to reach.
pub fn reject_review_mutation() -> AppResult<ApiResponse<serde_json::Value>> {
    policy::ensure(policy::review_mutable(Method::Mutating))?;
    Ok(ApiResponse::success(
        "OK",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

pub async fn list_courier_reviews(
    state: &AppState,
    pagination: Pagination,
) -> AppResult<ApiResponse<CourierReviewList>> {
    let (page, limit, offset) = pagination.normalize();

    let finder = CourierReviews::find().order_by_desc(CourierReviewCol::CreatedAt);
    let total = finder.clone().count(&state.orm).await? as i64;
    let review_models = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?;

    let mut user_ids: Vec<Uuid> = Vec::with_capacity(review_models.len() * 2);
    for review in &review_models {
        user_ids.push(review.client_id);
        user_ids.push(review.courier_id);
    }
    let briefs = briefs_by_id(state, user_ids).await?;

    let mut items = Vec::with_capacity(review_models.len());
    for review in review_models {
        let client = briefs.get(&review.client_id).cloned().ok_or_else(|| {
            AppError::Internal(anyhow::anyhow!("review {} has no client", review.id))
        })?;
        let courier = briefs.get(&review.courier_id).cloned().ok_or_else(|| {
            AppError::Internal(anyhow::anyhow!("review {} has no courier", review.id))
        })?;
        items.push(CourierReview {
            id: review.id,
            courier,
            client,
            rating: review.rating,
            created_at: review.created_at.format(CREATED_AT_FORMAT).to_string(),
        });
    }

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Courier reviews",
        CourierReviewList { items },
        Some(meta),
    ))
}

pub async fn create_courier_review(
    state: &AppState,
    user: &AuthUser,
    payload: CreateCourierReviewRequest,
) -> AppResult<ApiResponse<CourierReview>> {
    validate_rating(payload.rating)?;

    let courier = Users::find_by_id(payload.courier_id).one(&state.orm).await?;
    let courier = match courier {
        Some(u) => UserBrief::from_user(&u),
        None => return Err(AppError::Validation("courier_id: user not found".into())),
    };

    let review = CourierReviewActive {
        id: Set(Uuid::new_v4()),
        client_id: Set(user.user_id),
        courier_id: Set(payload.courier_id),
        rating: Set(payload.rating),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    let client = Users::find_by_id(user.user_id)
        .one(&state.orm)
        .await?
        .map(|u| UserBrief::from_user(&u))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("review author not found")))?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "courier_review_create",
        Some("courier_reviews"),
        Some(serde_json::json!({ "review_id": review.id, "courier_id": review.courier_id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Review created",
        CourierReview {
            id: review.id,
            courier,
            client,
            rating: review.rating,
            created_at: review.created_at.format(CREATED_AT_FORMAT).to_string(),
        },
        Some(Meta::empty()),
    ))
}

fn validate_rating(rating: i32) -> AppResult<()> {
    if !(1..=5).contains(&rating) {
        return Err(AppError::Validation("rating: must be between 1 and 5".into()));
    }
    Ok(())
}

async fn briefs_by_id(
    state: &AppState,
    user_ids: Vec<Uuid>,
) -> AppResult<HashMap<Uuid, UserBrief>> {
    let briefs = Users::find()
        .filter(UserCol::Id.is_in(user_ids))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|u| (u.id, UserBrief::from_user(&u)))
        .collect();
    Ok(briefs)
}
