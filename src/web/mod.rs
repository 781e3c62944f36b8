// src/web/mod.rs
pub mod envelope;
pub mod home_handlers;
pub mod mw_auth;
pub mod product_handlers;
pub mod routes;
pub mod session_handlers;
pub mod store_handlers;
pub mod user_handlers;
