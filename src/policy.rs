//! Per-request authorization predicates. Each takes the acting user and the
//! target's relevant fields explicitly; any `false` turns into a 403 before
//! the handler body touches storage.

use uuid::Uuid;

use crate::{
    entity::{orders::OrderStatus, users::Role},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Safe,
    Mutating,
}

impl Method {
    pub fn is_safe(self) -> bool {
        matches!(self, Method::Safe)
    }
}

/// Only owners may open stores.
pub fn can_create_store(actor: &AuthUser) -> bool {
    actor.role == Role::Owner
}

/// Anyone may read a store; only its owner may change it.
pub fn can_modify_store(actor: &AuthUser, method: Method, owner_id: Uuid) -> bool {
    if method.is_safe() {
        return true;
    }
    actor.user_id == owner_id
}

/// Courier object gate. Mutations pass only when the courier's *role* equals
/// the Delivered *status* label, which no role value can.
/// TODO: almost certainly meant to compare `Courier::status`; confirm the
/// intended gate before changing the comparison.
pub fn can_mutate_as_courier(method: Method, courier_role: Option<Role>) -> bool {
    if method.is_safe() {
        return true;
    }
    courier_role.is_some_and(|role| role.as_str() == OrderStatus::Delivered.as_str())
}

/// Owners are excluded from the order collections entirely.
pub fn can_access_orders(actor: &AuthUser) -> bool {
    actor.role != Role::Owner
}

/// Object-level: only the client who placed the order.
pub fn owns_order(actor: &AuthUser, client_id: Uuid) -> bool {
    actor.user_id == client_id
}

/// Generic catalog gate: reads for everyone, writes for owners.
pub fn can_write_catalog(actor: &AuthUser, method: Method) -> bool {
    if method.is_safe() {
        return true;
    }
    actor.role == Role::Owner
}

/// Reviews are immutable once created.
pub fn review_mutable(method: Method) -> bool {
    method.is_safe()
}

/// Collapse a predicate result into the uniform denial error. The response
/// never says which predicate failed.
pub fn ensure(allowed: bool) -> AppResult<()> {
    if allowed { Ok(()) } else { Err(AppError::Forbidden) }
}
