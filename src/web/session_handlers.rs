// src/web/session_handlers.rs
use crate::{
    error::{AppError, AppResult},
    models::user::LoginForm,
    services::session_service,
    state::AppState,
    web::envelope::ApiResponse,
};
use axum::{extract::State, Json};
use serde_json::{json, Value};
use tower_sessions::Session;

// POST /api/login
pub async fn handle_login(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<LoginForm>,
) -> AppResult<Json<ApiResponse<Value>>> {
    tracing::info!("Tentativa de login para: {}", form.email);

    match session_service::login(&state.db_pool, &session, &form.email, &form.password).await? {
        Some(user_id) => Ok(Json(ApiResponse::ok(json!({ "user_id": user_id })))),
        None => {
            // Mensagem genérica para email desconhecido e senha errada
            tracing::warn!("Credenciais inválidas para: {}", form.email);
            Err(AppError::Failed("Email ou senha inválidos.".to_string()))
        }
    }
}

// POST /api/logout
pub async fn handle_logout(session: Session) -> AppResult<Json<ApiResponse<()>>> {
    session_service::logout(&session).await?;
    Ok(Json(ApiResponse::ok_empty()))
}

// GET /api/session — o front usa para decidir o que renderizar
pub async fn session_status(session: Session) -> Json<ApiResponse<Value>> {
    let logged_in = session_service::is_logged_in(&session).await;
    Json(ApiResponse::ok(json!({ "logged_in": logged_in })))
}

// POST /api/cart/clear — limpa só carrinho e pedido, mantém o login
pub async fn handle_clear_cart(session: Session) -> AppResult<Json<ApiResponse<()>>> {
    session_service::clear_cart_and_order(&session).await?;
    Ok(Json(ApiResponse::ok_empty()))
}
