// src/web/home_handlers.rs
use crate::{
    error::AppResult,
    services::{product_service, store_service},
    state::AppState,
    templates::IndexPage,
    web::envelope::ApiResponse,
};
use askama::Template;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
    Json,
};
use serde_json::{json, Value};

// Quantos destaques a home mostra de cada tipo
const FEATURED_PRODUCTS: i64 = 8;
const FEATURED_STORES: i64 = 6;

// GET / — serve a casca do front
pub async fn index_page() -> impl IntoResponse {
    let template = IndexPage {
        app_name: "Crescendinho",
    };
    match template.render() {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!("❌ Erro ao renderizar index.html: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Erro interno ao renderizar a página.",
            )
                .into_response()
        }
    }
}

// GET /api/home/featured — destaques da home: produtos e lojinhas
pub async fn featured(State(state): State<AppState>) -> AppResult<Json<ApiResponse<Value>>> {
    let produtos = product_service::featured_products(&state.db_pool, FEATURED_PRODUCTS).await?;
    let lojas = store_service::featured_stores(&state.db_pool, FEATURED_STORES).await?;

    Ok(Json(ApiResponse::ok(json!({
        "featured_products": produtos,
        "featured_stores": lojas,
    }))))
}
