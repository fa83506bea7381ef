use axum_delivery_api::{
    db::{create_orm_conn, create_pool, run_migrations},
    dto::{
        auth::{LoginRequest, LogoutRequest, RegisterRequest},
        cart::AddCartItemRequest,
        catalog::{CreateCategoryRequest, CreateContactInfoRequest, CreateProductRequest},
        orders::CreateOrderRequest,
        reviews::CreateStoreReviewRequest,
        stores::{CreateStoreRequest, UpdateStoreRequest},
    },
    entity::{
        cart_items::{Column as CartItemCol, Entity as CartItems},
        contact_infos::{Column as ContactCol, Entity as ContactInfos},
        product_combos::{Column as ComboCol, Entity as ProductCombos},
        products::{Column as ProductCol, Entity as Products},
        store_reviews::{Column as ReviewCol, Entity as StoreReviews},
        users::ActiveModel as UserActive,
    },
    error::AppError,
    middleware::auth::AuthUser,
    models::{OrderStatus, Role},
    ratings::ReviewerCount,
    routes::params::{Pagination, StoreQuery},
    services::{
        auth_service, cart_service, catalog_service, order_service, review_service, store_service,
    },
    state::AppState,
};
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set, Statement};
use uuid::Uuid;

// Full flow: registration and token pair, duplicate username rejection,
// single-use logout, store creation and gating, rating aggregates, cart line
// totals, order defaults, and the explicit store cascade.
#[tokio::test]
async fn marketplace_flow() -> anyhow::Result<()> {
    // Allow skipping when no DB is configured in the environment.
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            return Ok(());
        }
    };

    unsafe { std::env::set_var("JWT_SECRET", "integration-test-secret") };

    let state = setup_state(&database_url).await?;

    // Registration issues exactly one access and one refresh token.
    let registered = auth_service::register_user(
        &state,
        register_request("flow_owner", Role::Owner),
    )
    .await?
    .data
    .unwrap();
    assert!(!registered.access.is_empty());
    assert!(!registered.refresh.is_empty());
    assert_ne!(registered.access, registered.refresh);
    assert_eq!(registered.user.username, "flow_owner");

    // A duplicate username is a validation failure, and no token comes back.
    let duplicate = auth_service::register_user(
        &state,
        register_request("flow_owner", Role::Client),
    )
    .await;
    assert!(matches!(duplicate, Err(AppError::Validation(_))));

    // Login returns a fresh pair; bad password stays generic.
    let login = auth_service::login_user(
        &state,
        LoginRequest {
            username: "flow_owner".into(),
            password: "password123".into(),
        },
    )
    .await?
    .data
    .unwrap();
    assert!(!login.access.is_empty());

    let bad_login = auth_service::login_user(
        &state,
        LoginRequest {
            username: "flow_owner".into(),
            password: "wrong".into(),
        },
    )
    .await;
    assert!(matches!(bad_login, Err(AppError::Unauthorized(_))));

    // Logout is single-use per refresh token.
    auth_service::logout_user(
        &state,
        LogoutRequest {
            refresh: login.refresh.clone(),
        },
    )
    .await?;
    let second_logout = auth_service::logout_user(
        &state,
        LogoutRequest {
            refresh: login.refresh,
        },
    )
    .await;
    assert!(matches!(second_logout, Err(AppError::BadRequest(_))));

    // Seed flow users directly.
    let owner_id = create_user(&state, "store_owner", Role::Owner).await?;
    let other_owner_id = create_user(&state, "other_owner", Role::Owner).await?;
    let client_id = create_user(&state, "hungry_client", Role::Client).await?;
    let courier_id = create_user(&state, "fast_courier", Role::Courier).await?;

    let auth_owner = AuthUser {
        user_id: owner_id,
        role: Role::Owner,
    };
    let auth_other_owner = AuthUser {
        user_id: other_owner_id,
        role: Role::Owner,
    };
    let auth_client = AuthUser {
        user_id: client_id,
        role: Role::Client,
    };

    let category = catalog_service::create_category(
        &state,
        &auth_owner,
        CreateCategoryRequest {
            name: "Seafood".into(),
        },
    )
    .await?
    .data
    .unwrap();

    // Non-owners are denied store creation outright.
    let denied = store_service::create_store(
        &state,
        &auth_client,
        store_request("Client Store", category.id),
    )
    .await;
    assert!(matches!(denied, Err(AppError::Forbidden)));

    let store = store_service::create_store(
        &state,
        &auth_owner,
        store_request("Crab Shack", category.id),
    )
    .await?
    .data
    .unwrap();

    // A different owner cannot touch it.
    let foreign_update = store_service::update_store(
        &state,
        &auth_other_owner,
        store.id,
        UpdateStoreRequest {
            name: Some("Hijacked".into()),
            image: None,
            category_id: None,
            description: None,
            address: None,
        },
    )
    .await;
    assert!(matches!(foreign_update, Err(AppError::Forbidden)));

    // Fill the store with a product, a combo and a contact number.
    let product = catalog_service::create_product(
        &state,
        &auth_owner,
        CreateProductRequest {
            name: "Crab Burger".into(),
            image: "product_images/crab-burger.png".into(),
            description: "Signature burger".into(),
            price: 450,
            store_id: store.id,
        },
    )
    .await?
    .data
    .unwrap();

    catalog_service::create_combo(
        &state,
        &auth_owner,
        CreateProductRequest {
            name: "Crab Combo".into(),
            image: "product_images/crab-combo.png".into(),
            description: "Burger and fries".into(),
            price: 600,
            store_id: store.id,
        },
    )
    .await?;

    catalog_service::create_contact(
        &state,
        &auth_owner,
        CreateContactInfoRequest {
            phone_number: "+996700112233".into(),
            store_id: store.id,
        },
    )
    .await?;

    // Two reviews: ratings 5 and 2 -> average 3.5, half of them good.
    for (rating, comment) in [(5, "great"), (2, "slow delivery")] {
        review_service::create_store_review(
            &state,
            &auth_client,
            CreateStoreReviewRequest {
                store_id: store.id,
                rating,
                comment: comment.into(),
            },
        )
        .await?;
    }

    let out_of_range = review_service::create_store_review(
        &state,
        &auth_client,
        CreateStoreReviewRequest {
            store_id: store.id,
            rating: 6,
            comment: "too good".into(),
        },
    )
    .await;
    assert!(matches!(out_of_range, Err(AppError::Validation(_))));

    let listing = store_service::list_stores(&state, store_query()).await?.data.unwrap();
    let summary = listing
        .items
        .iter()
        .find(|s| s.id == store.id)
        .expect("store in listing");
    assert_eq!(summary.avg_rating, 3.5);
    assert_eq!(summary.reviewer_count, ReviewerCount::Exact(2));
    assert_eq!(summary.good_review_percentage, "50%");

    let detail = store_service::get_store(&state, store.id).await?.data.unwrap();
    assert_eq!(detail.products.len(), 1);
    assert_eq!(detail.combos.len(), 1);
    assert_eq!(detail.contacts.len(), 1);
    assert_eq!(detail.reviews.len(), 2);

    // Cart: one cart per user, line totals derived from price * quantity.
    cart_service::create_cart(&state, &auth_client).await?;
    let second_cart = cart_service::create_cart(&state, &auth_client).await;
    assert!(matches!(second_cart, Err(AppError::Validation(_))));

    let item = cart_service::add_item(
        &state,
        &auth_client,
        AddCartItemRequest {
            product_id: product.id,
            quantity: 2,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(item.total_price, 900);

    // Orders default to pending and carry the cart's aggregate total.
    let order = order_service::create_order(
        &state,
        &auth_client,
        CreateOrderRequest {
            delivery_address: "12 Harbor St".into(),
            courier_id,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.total_price, 900);
    assert_eq!(order.items.len(), 1);

    // Owners never see the order collections.
    let owner_orders = order_service::list_orders(
        &state,
        &auth_owner,
        order_query(),
    )
    .await;
    assert!(matches!(owner_orders, Err(AppError::Forbidden)));

    // Explicit cascade: the store takes its reviews, contacts, products,
    // combos and dependent cart items with it.
    store_service::delete_store(&state, &auth_owner, store.id).await?;

    assert_eq!(
        StoreReviews::find()
            .filter(ReviewCol::StoreId.eq(store.id))
            .all(&state.orm)
            .await?
            .len(),
        0
    );
    assert_eq!(
        ContactInfos::find()
            .filter(ContactCol::StoreId.eq(store.id))
            .all(&state.orm)
            .await?
            .len(),
        0
    );
    assert_eq!(
        Products::find()
            .filter(ProductCol::StoreId.eq(store.id))
            .all(&state.orm)
            .await?
            .len(),
        0
    );
    assert_eq!(
        ProductCombos::find()
            .filter(ComboCol::StoreId.eq(store.id))
            .all(&state.orm)
            .await?
            .len(),
        0
    );
    assert_eq!(
        CartItems::find()
            .filter(CartItemCol::ProductId.eq(product.id))
            .all(&state.orm)
            .await?
            .len(),
        0
    );

    Ok(())
}

async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let pool = create_pool(database_url).await?;
    let orm = create_orm_conn(database_url).await?;
    run_migrations(&orm).await?;

    // Clean tables between runs.
    let backend = orm.get_database_backend();
    orm.execute(Statement::from_string(
        backend,
        "TRUNCATE TABLE messages, chat_participants, chats, courier_reviews, couriers, orders, \
         cart_items, carts, store_reviews, contact_infos, product_combos, products, stores, \
         categories, audit_logs, revoked_tokens, users RESTART IDENTITY CASCADE",
    ))
    .await?;

    Ok(AppState { pool, orm })
}

async fn create_user(state: &AppState, username: &str, role: Role) -> anyhow::Result<Uuid> {
    let user = UserActive {
        id: Set(Uuid::new_v4()),
        username: Set(username.to_string()),
        email: Set(format!("{username}@example.com")),
        password_hash: Set("dummy".into()),
        first_name: Set(String::new()),
        last_name: Set(String::new()),
        role: Set(role),
        phone_number: Set(None),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(user.id)
}

fn register_request(username: &str, role: Role) -> RegisterRequest {
    RegisterRequest {
        username: username.to_string(),
        email: format!("{username}@example.com"),
        password: "password123".into(),
        role,
        phone_number: None,
        first_name: String::new(),
        last_name: String::new(),
    }
}

fn store_request(name: &str, category_id: Uuid) -> CreateStoreRequest {
    CreateStoreRequest {
        name: name.to_string(),
        image: "store_images/crab-shack.png".into(),
        category_id,
        description: "Seafood, delivered".into(),
        address: "12 Harbor St".into(),
    }
}

fn store_query() -> StoreQuery {
    StoreQuery {
        pagination: Pagination {
            page: None,
            per_page: None,
        },
        q: None,
        category: None,
        sort_by: None,
        sort_order: None,
    }
}

fn order_query() -> axum_delivery_api::routes::params::OrderListQuery {
    axum_delivery_api::routes::params::OrderListQuery {
        pagination: Pagination {
            page: None,
            per_page: None,
        },
        status: None,
        sort_order: None,
    }
}
