// src/web/routes.rs
use crate::{
    state::AppState,
    web::{
        home_handlers, mw_auth, product_handlers, session_handlers, store_handlers, user_handlers,
    },
};
use axum::{
    middleware,
    routing::{get, post},
    Router,
};

pub fn create_router(app_state: AppState) -> Router {
    // --- Rotas Públicas ---
    let public_routes = Router::new()
        .route("/", get(home_handlers::index_page))
        .route("/api/home/featured", get(home_handlers::featured))
        .route("/api/signup", post(user_handlers::handle_signup))
        .route("/api/signup/moip", post(user_handlers::handle_signup_with_moip))
        .route("/api/activate", post(user_handlers::handle_activate))
        .route("/api/login", post(session_handlers::handle_login))
        .route("/api/logout", post(session_handlers::handle_logout))
        .route("/api/session", get(session_handlers::session_status))
        .route("/api/products", get(product_handlers::list_catalog))
        .route("/api/products/{unique_id}", get(product_handlers::view_product))
        .route("/api/products/{id}/stock", get(product_handlers::product_stock))
        .route("/api/cart/product/{id}", get(product_handlers::cart_product))
        .route("/api/users/{name_id}", get(user_handlers::public_profile));

    // --- Rotas da Lojinha ---
    // Aninhadas sob /api/store; mw_auth é aplicado no router pai
    let store_routes = Router::new()
        .route(
            "/products",
            get(store_handlers::my_products).post(store_handlers::handle_create_product),
        )
        .route("/products/update", post(store_handlers::handle_update_product))
        .route("/products/{unique_id}", get(store_handlers::editable_product))
        .route("/products/{id}/activate", post(store_handlers::activate_product))
        .route("/products/{id}/deactivate", post(store_handlers::deactivate_product));

    // --- Rotas Autenticadas ---
    let authenticated_routes = Router::new()
        .route("/api/user", get(user_handlers::logged_user))
        .route("/api/user/update", post(user_handlers::handle_update_user))
        .route("/api/user/account", get(user_handlers::account_id))
        .route("/api/cart/clear", post(session_handlers::handle_clear_cart))
        .nest("/api/store", store_routes)
        // Aplica require_auth a TODAS as rotas definidas ACIMA neste router
        .route_layer(middleware::from_fn(mw_auth::require_auth));

    // --- Router Final ---
    Router::new()
        .merge(public_routes)
        .merge(authenticated_routes)
        .with_state(app_state)
}
