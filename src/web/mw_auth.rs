// src/web/mw_auth.rs
use crate::{error::AppResult, services::session_service, web::envelope::ApiResponse};
use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use tower_sessions::Session;

// Middleware que verifica se o utilizador está logado.
// Como a superfície é JSON, a falta de sessão responde 401 no envelope
// em vez de redirecionar.
pub async fn require_auth(
    session: Session,
    mut request: Request,
    next: Next,
) -> AppResult<Response> {
    match session_service::current_user_id(&session).await? {
        Some(user_id) => {
            tracing::debug!("Autenticação MW: usuário {} autenticado.", user_id);
            // Handlers protegidos leem o id pelas extensões
            request.extensions_mut().insert(UserId(user_id));
            Ok(next.run(request).await)
        }
        None => {
            tracing::debug!("Autenticação MW: não autenticado.");
            Ok((
                StatusCode::UNAUTHORIZED,
                Json(ApiResponse::<()>::fail("Faça login para continuar.")),
            )
                .into_response())
        }
    }
}

// Guarda o user_id nas extensões da requisição
#[derive(Clone, Debug)]
pub struct UserId(pub i64);
