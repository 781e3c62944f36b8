// src/services/activation_service.rs
use crate::error::{AppError, AppResult};
use sqlx::{SqliteConnection, SqlitePool};
use uuid::Uuid;

/// Gera e guarda o token de ativação de um cadastro novo.
/// Corre dentro da transação do signup para que token e utilizador
/// sejam gravados juntos.
pub async fn generate_token(
    conn: &mut SqliteConnection,
    user_id: i64,
    email: &str,
) -> AppResult<String> {
    let token = Uuid::new_v4().simple().to_string();

    sqlx::query("INSERT INTO activations (token, user_id, email) VALUES (?1, ?2, ?3)")
        .bind(&token)
        .bind(user_id)
        .bind(email)
        .execute(conn)
        .await?;

    Ok(token)
}

/// Consome um token de ativação e ativa a conta correspondente.
/// Token vazio ou desconhecido falha sem tocar em nada.
pub async fn activate(pool: &SqlitePool, token: &str) -> AppResult<()> {
    if token.trim().is_empty() {
        return Err(AppError::Failed(
            "Token inválido, ocorreu um erro no envio do token de ativação, tente novamente!"
                .to_string(),
        ));
    }

    let mut tx = pool.begin().await?;

    let user_id: Option<i64> =
        sqlx::query_scalar("SELECT user_id FROM activations WHERE token = ?1")
            .bind(token)
            .fetch_optional(&mut *tx)
            .await?;

    let Some(user_id) = user_id else {
        return Err(AppError::Failed(
            "Ocorreu um erro no envio do token de ativação, tente novamente!".to_string(),
        ));
    };

    sqlx::query("UPDATE users SET status = 'ativado' WHERE id = ?1")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    // Token é de uso único
    sqlx::query("DELETE FROM activations WHERE token = ?1")
        .bind(token)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    tracing::info!("✅ Conta do usuário {} ativada.", user_id);
    Ok(())
}
