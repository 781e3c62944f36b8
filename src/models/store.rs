// src/models/store.rs
use serde::Serialize;
use sqlx::FromRow;

// Card de lojinha em destaque na home: nome, logo, produtos publicados
// e total vendido.
#[derive(Debug, Serialize, FromRow)]
pub struct FeaturedStore {
    pub name: String,
    pub profile_image: Option<String>,
    pub n_produtos: i64,
    pub sales: i64,
}
