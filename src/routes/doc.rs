use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{AuthResponse, Claims, LoginRequest, LogoutRequest, RefreshClaims, RegisterRequest, UserIdentity},
        cart::{AddCartItemRequest, UpdateCartItemRequest},
        catalog::{
            CategoryList, ContactInfoList, CreateCategoryRequest, CreateContactInfoRequest,
            CreateProductRequest, ProductComboList, ProductList, UpdateCategoryRequest,
            UpdateContactInfoRequest, UpdateProductRequest,
        },
        chats::{ChatList, CreateChatRequest, MessageList, PostMessageRequest},
        couriers::{CourierList, CreateCourierRequest, UpdateCourierRequest},
        orders::{CreateOrderRequest, OrderList, UpdateOrderRequest},
        reviews::{
            CourierReviewList, CreateCourierReviewRequest, CreateStoreReviewRequest,
            StoreReviewList,
        },
        stores::{CreateStoreRequest, StoreList, UpdateStoreRequest},
        users::{UpdateUserRequest, UserList},
    },
    models::{
        Cart, CartItem, Category, Chat, ContactInfo, Courier, CourierReview, CourierStatus,
        Message, OrderDetail, OrderStatus, OrderSummary, Product, ProductCombo, Role, Store,
        StoreDetail, StoreReview, StoreSummary, User, UserBrief,
    },
    response::{ApiResponse, Meta},
    routes::{
        auth, cart, categories, chats, combos, contacts, couriers, health, orders, params,
        products as product_routes, reviews, stores as store_routes, users as user_routes,
    },
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::register,
        auth::login,
        auth::logout,
        user_routes::list_users,
        user_routes::get_user,
        user_routes::update_user,
        user_routes::delete_user,
        categories::list_categories,
        categories::create_category,
        categories::update_category,
        categories::delete_category,
        store_routes::list_stores,
        store_routes::get_store,
        store_routes::create_store,
        store_routes::update_store,
        store_routes::delete_store,
        product_routes::list_products,
        product_routes::get_product,
        product_routes::create_product,
        product_routes::update_product,
        product_routes::delete_product,
        combos::list_combos,
        combos::get_combo,
        combos::create_combo,
        combos::update_combo,
        combos::delete_combo,
        contacts::list_contacts,
        contacts::create_contact,
        contacts::update_contact,
        contacts::delete_contact,
        cart::get_cart,
        cart::create_cart,
        cart::delete_cart,
        cart::add_item,
        cart::update_item,
        cart::remove_item,
        orders::list_orders,
        orders::create_order,
        orders::get_order,
        orders::update_order,
        orders::delete_order,
        couriers::list_couriers,
        couriers::get_courier,
        couriers::create_courier,
        couriers::update_courier,
        couriers::delete_courier,
        reviews::list_store_reviews,
        reviews::create_store_review,
        reviews::list_courier_reviews,
        reviews::create_courier_review,
        reviews::reject_mutation,
        chats::list_chats,
        chats::create_chat,
        chats::list_messages,
        chats::post_message
    ),
    components(
        schemas(
            Role,
            OrderStatus,
            CourierStatus,
            User,
            UserBrief,
            Category,
            StoreSummary,
            Store,
            StoreDetail,
            Product,
            ProductCombo,
            ContactInfo,
            StoreReview,
            CourierReview,
            CartItem,
            Cart,
            OrderSummary,
            OrderDetail,
            Courier,
            Chat,
            Message,
            RegisterRequest,
            LoginRequest,
            LogoutRequest,
            UserIdentity,
            AuthResponse,
            Claims,
            RefreshClaims,
            UpdateUserRequest,
            UserList,
            CreateCategoryRequest,
            UpdateCategoryRequest,
            CategoryList,
            CreateStoreRequest,
            UpdateStoreRequest,
            StoreList,
            CreateProductRequest,
            UpdateProductRequest,
            ProductList,
            ProductComboList,
            CreateContactInfoRequest,
            UpdateContactInfoRequest,
            ContactInfoList,
            AddCartItemRequest,
            UpdateCartItemRequest,
            CreateOrderRequest,
            UpdateOrderRequest,
            OrderList,
            CreateCourierRequest,
            UpdateCourierRequest,
            CourierList,
            CreateStoreReviewRequest,
            CreateCourierReviewRequest,
            StoreReviewList,
            CourierReviewList,
            CreateChatRequest,
            PostMessageRequest,
            ChatList,
            MessageList,
            params::Pagination,
            params::StoreQuery,
            params::OrderListQuery,
            params::StoreScopedQuery,
            health::HealthData,
            Meta,
            ApiResponse<StoreList>,
            ApiResponse<StoreDetail>,
            ApiResponse<AuthResponse>,
            ApiResponse<Cart>,
            ApiResponse<OrderList>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Registration, login, logout"),
        (name = "Users", description = "User profiles"),
        (name = "Stores", description = "Store listing, detail and management"),
        (name = "Catalog", description = "Categories, products, combos, contacts"),
        (name = "Cart", description = "The user's cart and its items"),
        (name = "Orders", description = "Order collections"),
        (name = "Couriers", description = "Courier records"),
        (name = "Reviews", description = "Store and courier reviews"),
        (name = "Chats", description = "Plain chat storage"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
