// src/services/session_service.rs
// Gestão da sessão do visitante: identidade logada + carrinho + pedido.
// A sessão é o contexto explícito passado aos handlers pelo axum; o TTL e a
// persistência ficam por conta da camada tower-sessions configurada no main.

use crate::{
    error::{AppError, AppResult},
    services::user_service,
};
use sqlx::SqlitePool;
use tower_sessions::Session;

pub const USER_ID_KEY: &str = "user_id";
pub const CART_KEY: &str = "cart";
pub const ORDER_KEY: &str = "order";

/// Verifica se existe um utilizador autenticado nesta sessão.
pub async fn is_logged_in(session: &Session) -> bool {
    session
        .get::<i64>(USER_ID_KEY)
        .await
        .ok()
        .flatten()
        .is_some()
}

/// ID do utilizador logado, se houver.
pub async fn current_user_id(session: &Session) -> AppResult<Option<i64>> {
    session
        .get::<i64>(USER_ID_KEY)
        .await
        .map_err(|e| AppError::SessionError(format!("Falha ao ler sessão: {e}")))
}

/// Autentica e grava o utilizador na sessão. A verificação de credenciais
/// é delegada ao user_service; aqui só entra a rotação do id de sessão e a
/// escrita da chave.
pub async fn login(
    pool: &SqlitePool,
    session: &Session,
    email: &str,
    password: &str,
) -> AppResult<Option<i64>> {
    let Some(user_id) = user_service::login(pool, email, password).await? else {
        return Ok(None);
    };

    // Novo id de sessão no login (contra fixação de sessão)
    session
        .cycle_id()
        .await
        .map_err(|e| AppError::SessionError(format!("Falha ao rodar ID: {e}")))?;
    session
        .insert(USER_ID_KEY, user_id)
        .await
        .map_err(|e| AppError::SessionError(format!("Falha ao inserir na sessão: {e}")))?;

    tracing::info!("✅ Login bem-sucedido para o usuário {}", user_id);
    Ok(Some(user_id))
}

/// Encerra a sessão por inteiro (identidade, carrinho e pedido).
pub async fn logout(session: &Session) -> AppResult<()> {
    session
        .delete()
        .await
        .map_err(|e| AppError::SessionError(format!("Falha ao apagar sessão: {e}")))?;
    tracing::info!("🚪 Sessão encerrada.");
    Ok(())
}

/// Limpa apenas o carrinho e o pedido, mantendo o login.
pub async fn clear_cart_and_order(session: &Session) -> AppResult<()> {
    session
        .remove::<serde_json::Value>(CART_KEY)
        .await
        .map_err(|e| AppError::SessionError(format!("Falha ao limpar carrinho: {e}")))?;
    session
        .remove::<serde_json::Value>(ORDER_KEY)
        .await
        .map_err(|e| AppError::SessionError(format!("Falha ao limpar pedido: {e}")))?;
    Ok(())
}
