// src/models/mod.rs
pub mod product;
pub mod store;
pub mod user;
