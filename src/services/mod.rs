// src/services/mod.rs
pub mod activation_service;
pub mod auth_service;
pub mod cpf;
pub mod dates;
pub mod pagination;
pub mod payment_service;
pub mod product_service;
pub mod session_service;
pub mod store_service;
pub mod user_service;
