// src/web/store_handlers.rs
// Gestão da lojinha do usuário logado. Todas as rotas passam pelo
// middleware de autenticação; o id do dono vem das extensões.
use crate::{
    error::{AppError, AppResult},
    models::product::{ProductData, UpdateProductData, IMAGE_EXTRA, IMAGE_PROFILE},
    services::{product_service, store_service},
    state::AppState,
    web::{envelope::ApiResponse, mw_auth::UserId},
};
use axum::{
    extract::{Extension, Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
}

// GET /api/store/products?page=0 — produtos da lojinha, página de 12
pub async fn my_products(
    State(state): State<AppState>,
    Extension(user_id_ext): Extension<UserId>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<ApiResponse<Value>>> {
    let pagina = product_service::paginated_store_products(
        &state.db_pool,
        user_id_ext.0,
        query.page.unwrap_or(0),
    )
    .await?;
    Ok(Json(ApiResponse::ok(json!(pagina))))
}

// POST /api/store/products — cria um produto na lojinha do usuário.
// Os metadados de imagem do payload vão para product_images, nunca
// para a linha do produto.
pub async fn handle_create_product(
    State(state): State<AppState>,
    Extension(user_id_ext): Extension<UserId>,
    Json(data): Json<ProductData>,
) -> AppResult<Json<ApiResponse<Value>>> {
    let store_id = store_service::store_id_for_owner(&state.db_pool, user_id_ext.0)
        .await?
        .ok_or_else(|| AppError::Failed("Você ainda não tem uma lojinha.".to_string()))?;

    let (product_id, unique_id) =
        product_service::create_product(&state.db_pool, store_id, &data).await?;

    if let Some(imagem) = &data.imagem {
        product_service::save_image(&state.db_pool, product_id, imagem, IMAGE_PROFILE).await?;
    }
    for extra in data.imagens.iter().flatten() {
        product_service::save_image(&state.db_pool, product_id, extra, IMAGE_EXTRA).await?;
    }

    Ok(Json(ApiResponse::ok(json!({
        "id": product_id,
        "unique_id": unique_id,
    }))))
}

// POST /api/store/products/update — edita pela chave primária
pub async fn handle_update_product(
    State(state): State<AppState>,
    Json(data): Json<UpdateProductData>,
) -> AppResult<Json<ApiResponse<()>>> {
    product_service::update_product(&state.db_pool, &data).await?;

    // Imagens novas entram como extras; a troca de perfil é outra operação
    for extra in data.data.imagens.iter().flatten() {
        product_service::save_image(&state.db_pool, data.id, extra, IMAGE_EXTRA).await?;
    }

    Ok(Json(ApiResponse::ok_empty()))
}

// GET /api/store/products/{unique_id} — produto para edição, restrito ao dono
pub async fn editable_product(
    State(state): State<AppState>,
    Extension(user_id_ext): Extension<UserId>,
    Path(unique_id): Path<String>,
) -> AppResult<Json<ApiResponse<Value>>> {
    match product_service::get_editable_product(&state.db_pool, &unique_id, user_id_ext.0).await? {
        Some(produto) => Ok(Json(ApiResponse::ok(json!(produto)))),
        None => Err(AppError::Failed(
            "Nenhum produto encontrado com este identificador.".to_string(),
        )),
    }
}

// POST /api/store/products/{id}/activate — torna o produto visível e vendável
pub async fn activate_product(
    State(state): State<AppState>,
    Path(product_id): Path<i64>,
) -> AppResult<Json<ApiResponse<()>>> {
    product_service::set_product_active(&state.db_pool, product_id, true).await?;
    Ok(Json(ApiResponse::ok_empty()))
}

// POST /api/store/products/{id}/deactivate — tira da vitrine sem apagar
pub async fn deactivate_product(
    State(state): State<AppState>,
    Path(product_id): Path<i64>,
) -> AppResult<Json<ApiResponse<()>>> {
    product_service::set_product_active(&state.db_pool, product_id, false).await?;
    Ok(Json(ApiResponse::ok_empty()))
}
