// src/state.rs
use crate::services::payment_service::MoipClient;
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct AppState {
    pub db_pool: SqlitePool,
    // Cliente HTTP do gateway de pagamento
    pub moip: MoipClient,
}

// Permite extrair o pool da DB diretamente
impl axum::extract::FromRef<AppState> for SqlitePool {
    fn from_ref(state: &AppState) -> SqlitePool {
        state.db_pool.clone()
    }
}

impl axum::extract::FromRef<AppState> for MoipClient {
    fn from_ref(state: &AppState) -> MoipClient {
        state.moip.clone()
    }
}
