// src/web/product_handlers.rs
use crate::{
    error::{AppError, AppResult},
    models::product::{GenderFacet, ProductFilter},
    services::product_service,
    state::AppState,
    web::envelope::ApiResponse,
};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

// Parâmetros da listagem do catálogo. `page` começa em 1.
#[derive(Debug, Deserialize)]
pub struct CatalogQuery {
    pub page: Option<i64>,
    pub facet: Option<GenderFacet>,
    pub brand_id: Option<i64>,
    pub category: Option<String>,
    pub quality: Option<String>,
}

// GET /api/products?facet=meninos&page=1&brand_id=2
pub async fn list_catalog(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> AppResult<Json<ApiResponse<Value>>> {
    let filter = ProductFilter {
        brand_id: query.brand_id,
        category: query.category,
        quality: query.quality,
    };
    let page = query.page.unwrap_or(1);

    let produtos =
        product_service::list_products(&state.db_pool, &filter, query.facet, page).await?;
    let paginas = product_service::count_product_pages(&state.db_pool, &filter, query.facet).await?;

    Ok(Json(ApiResponse::ok(json!({
        "paginas": paginas,
        "produtos": produtos,
    }))))
}

// GET /api/products/{unique_id} — página de detalhe
pub async fn view_product(
    State(state): State<AppState>,
    Path(unique_id): Path<String>,
) -> AppResult<Json<ApiResponse<Value>>> {
    match product_service::get_viewable_product(&state.db_pool, &unique_id).await? {
        Some(produto) => Ok(Json(ApiResponse::ok(json!(produto)))),
        None => Err(AppError::Failed(
            "Nenhum produto encontrado com este identificador.".to_string(),
        )),
    }
}

// GET /api/products/{id}/stock — stock atual, para o front validar quantidades
pub async fn product_stock(
    State(state): State<AppState>,
    Path(product_id): Path<i64>,
) -> AppResult<Json<ApiResponse<Value>>> {
    match product_service::get_product_stock(&state.db_pool, product_id).await? {
        Some(stock) => Ok(Json(ApiResponse::ok(json!({ "stock": stock })))),
        None => Err(AppError::Failed(
            "Nenhum produto encontrado com este identificador.".to_string(),
        )),
    }
}

#[derive(Debug, Deserialize)]
pub struct CartQuery {
    pub quantidade: Option<i64>,
}

// GET /api/cart/product/{id}?quantidade=2 — linha de carrinho com a loja.
// A quantidade não é validada contra o stock aqui.
pub async fn cart_product(
    State(state): State<AppState>,
    Path(product_id): Path<i64>,
    Query(query): Query<CartQuery>,
) -> AppResult<Json<ApiResponse<Value>>> {
    let quantidade = query.quantidade.unwrap_or(1);
    match product_service::get_product_for_cart(&state.db_pool, product_id, quantidade).await? {
        Some(item) => Ok(Json(ApiResponse::ok(json!(item)))),
        None => Err(AppError::Failed(
            "Nenhum produto encontrado com este identificador.".to_string(),
        )),
    }
}
