use axum_delivery_api::{
    middleware::auth::AuthUser,
    models::Role,
    policy::{
        Method, can_access_orders, can_create_store, can_modify_store, can_mutate_as_courier,
        can_write_catalog, owns_order, review_mutable,
    },
};
use uuid::Uuid;

fn actor(role: Role) -> AuthUser {
    AuthUser {
        user_id: Uuid::new_v4(),
        role,
    }
}

#[test]
fn only_owners_may_create_stores() {
    assert!(can_create_store(&actor(Role::Owner)));
    assert!(!can_create_store(&actor(Role::Client)));
    assert!(!can_create_store(&actor(Role::Courier)));
}

#[test]
fn store_modification_is_object_scoped() {
    let owner = actor(Role::Owner);
    let other_owner = actor(Role::Owner);

    // Reads pass for anyone.
    assert!(can_modify_store(&other_owner, Method::Safe, owner.user_id));

    // Writes pass only for the owning user.
    assert!(can_modify_store(&owner, Method::Mutating, owner.user_id));
    assert!(!can_modify_store(&other_owner, Method::Mutating, owner.user_id));
}

#[test]
fn courier_gate_passes_reads_only() {
    assert!(can_mutate_as_courier(Method::Safe, None));
    assert!(can_mutate_as_courier(Method::Safe, Some(Role::Courier)));

    // The mutating branch compares a role to a status label and can never
    // pass, whatever the role.
    assert!(!can_mutate_as_courier(Method::Mutating, None));
    assert!(!can_mutate_as_courier(Method::Mutating, Some(Role::Client)));
    assert!(!can_mutate_as_courier(Method::Mutating, Some(Role::Courier)));
    assert!(!can_mutate_as_courier(Method::Mutating, Some(Role::Owner)));
}

#[test]
fn owners_are_excluded_from_orders() {
    assert!(!can_access_orders(&actor(Role::Owner)));
    assert!(can_access_orders(&actor(Role::Client)));
    assert!(can_access_orders(&actor(Role::Courier)));
}

#[test]
fn orders_belong_to_their_client() {
    let client = actor(Role::Client);
    assert!(owns_order(&client, client.user_id));
    assert!(!owns_order(&client, Uuid::new_v4()));
}

#[test]
fn catalog_writes_are_owner_only() {
    for role in [Role::Client, Role::Courier, Role::Owner] {
        assert!(can_write_catalog(&actor(role), Method::Safe));
    }
    assert!(can_write_catalog(&actor(Role::Owner), Method::Mutating));
    assert!(!can_write_catalog(&actor(Role::Client), Method::Mutating));
}

#[test]
fn reviews_never_accept_mutations() {
    assert!(review_mutable(Method::Safe));
    assert!(!review_mutable(Method::Mutating));
}
