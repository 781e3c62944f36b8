// src/error.rs
use crate::web::envelope::ApiResponse;
use axum::{http::StatusCode, response::IntoResponse, Json};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Erro na base de dados: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Erro de migração da base de dados: {0}")]
    SqlxMigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Erro de variável de ambiente: {0}")]
    EnvVarError(#[from] std::env::VarError),

    #[error("Erro ao processar password")]
    PasswordHashingError,

    // Falha de validação ou de operação, com mensagem voltada ao usuário.
    // O front só distingue sucesso/falha + mensagem, então uma variante chega.
    #[error("{0}")]
    Failed(String),

    #[error("Erro na sessão: {0}")]
    SessionError(String),

    #[error("Erro no gateway de pagamento: {0}")]
    GatewayError(String),

    #[error("Erro interno inesperado")]
    InternalServerError,
}

// Como converter AppError numa resposta HTTP. Todas as falhas saem no mesmo
// envelope JSON {success, message} que o cliente consome.
impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        // Loga o erro detalhado no servidor
        tracing::error!("Erro processado: {:?}", self);

        let (status, user_message) = match self {
            AppError::SqlxError(_) | AppError::SqlxMigrateError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Erro ao aceder aos dados.".to_string(),
            ),
            AppError::EnvVarError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Erro de configuração.".to_string(),
            ),
            AppError::PasswordHashingError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Erro ao processar credenciais.".to_string(),
            ),
            // A mensagem de Failed já foi escrita para o usuário final
            AppError::Failed(message) => (StatusCode::BAD_REQUEST, message),
            AppError::SessionError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Erro na gestão da sua sessão.".to_string(),
            ),
            AppError::GatewayError(_) => (
                StatusCode::BAD_GATEWAY,
                "Erro ao comunicar com o gateway de pagamento.".to_string(),
            ),
            AppError::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Ocorreu um erro inesperado.".to_string(),
            ),
        };

        (status, Json(ApiResponse::<()>::fail(user_message))).into_response()
    }
}

// Tipo Result padrão para a aplicação
pub type AppResult<T = ()> = Result<T, AppError>;
