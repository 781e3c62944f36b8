// src/services/payment_service.rs
// Adaptador do gateway de pagamento (Moip). O contrato é curto: dado um
// utilizador local, criar (ou vincular via OAuth) uma conta externa e
// persistir o id devolvido em moip_accounts. O provisionamento corre em
// segundo plano, depois do commit do cadastro, e nunca mexe na linha do
// utilizador já gravada.

use crate::{
    error::{AppError, AppResult},
    models::user::Holder,
    services::user_service,
};
use serde::Deserialize;
use sqlx::SqlitePool;

pub const ENDPOINT_SANDBOX: &str = "https://sandbox.moip.com.br";

#[derive(Clone)]
pub struct MoipClient {
    http: reqwest::Client,
    endpoint: String,
    access_token: String,
    app_id: String,
    redirect_url: String,
}

#[derive(Debug, Deserialize)]
struct AccountResponse {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ConnectResponse {
    #[serde(rename = "moipAccount")]
    moip_account: AccountResponse,
}

impl MoipClient {
    /// Lê a configuração do ambiente. Só o access token é obrigatório;
    /// app id e redirect são usados apenas no fluxo OAuth.
    pub fn from_env() -> AppResult<Self> {
        let access_token = std::env::var("MOIP_ACCESS_TOKEN")?;
        let app_id = std::env::var("MOIP_APP_ID").unwrap_or_default();
        let redirect_url = std::env::var("MOIP_REDIRECT_URL").unwrap_or_default();
        let endpoint =
            std::env::var("MOIP_ENDPOINT").unwrap_or_else(|_| ENDPOINT_SANDBOX.to_string());

        Ok(Self {
            http: reqwest::Client::new(),
            endpoint,
            access_token,
            app_id,
            redirect_url,
        })
    }

    /// Cria uma conta de vendedor no gateway e devolve o id externo.
    pub async fn create_account(&self, holder: &Holder) -> AppResult<String> {
        let body = serde_json::json!({
            "email": { "address": holder.email },
            "person": {
                "name": holder.name,
                "lastName": holder.last_name,
                "birthDate": holder.aniversario,
                "taxDocument": { "type": "CPF", "number": holder.cpf },
                "phone": {
                    "countryCode": "55",
                    "areaCode": holder.ddd,
                    "number": holder.telefone,
                },
                "address": {
                    "street": holder.street,
                    "streetNumber": holder.number,
                    "complement": holder.complement,
                    "district": holder.district,
                    "city": holder.city,
                    "state": holder.state,
                    "zipCode": holder.zipcode,
                    "country": "BRA",
                },
            },
            "type": "MERCHANT",
        });

        let response = self
            .http
            .post(format!("{}/v2/accounts", self.endpoint))
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::GatewayError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::GatewayError(format!(
                "criação de conta respondeu {}",
                response.status()
            )));
        }

        let account: AccountResponse = response
            .json()
            .await
            .map_err(|e| AppError::GatewayError(e.to_string()))?;
        Ok(account.id)
    }

    /// Completa o handshake OAuth de vínculo de uma conta já existente,
    /// trocando o authorization code fornecido pelo cliente.
    pub async fn connect_account(&self, code: &str) -> AppResult<String> {
        let body = serde_json::json!({
            "client_id": self.app_id,
            "client_secret": self.access_token,
            "redirect_uri": self.redirect_url,
            "grant_type": "authorization_code",
            "code": code,
        });

        let response = self
            .http
            .post(format!("{}/oauth/accesstoken", self.endpoint))
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::GatewayError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::GatewayError(format!(
                "vínculo de conta respondeu {}",
                response.status()
            )));
        }

        let connect: ConnectResponse = response
            .json()
            .await
            .map_err(|e| AppError::GatewayError(e.to_string()))?;
        Ok(connect.moip_account.id)
    }
}

/// Provisiona a conta externa de um cadastro recém-commitado. Pensada para
/// rodar num tokio::spawn: não devolve erro, só registra o desfecho na
/// linha de moip_accounts ('concluido' ou 'falhou').
pub async fn provision_account(pool: SqlitePool, moip: MoipClient, user_id: i64) {
    tracing::info!("💳 Provisionando conta no gateway para o usuário {}...", user_id);

    let holder = match user_service::create_holder(&pool, user_id).await {
        Ok(Some(holder)) => holder,
        Ok(None) => {
            tracing::error!("Titular não encontrado para o usuário {}.", user_id);
            mark_failed(&pool, user_id).await;
            return;
        }
        Err(e) => {
            tracing::error!("Erro ao montar titular do usuário {}: {:?}", user_id, e);
            mark_failed(&pool, user_id).await;
            return;
        }
    };

    match moip.create_account(&holder).await {
        Ok(account_id) => mark_done(&pool, user_id, &account_id).await,
        Err(e) => {
            tracing::error!("❌ Falha ao provisionar conta para {}: {:?}", user_id, e);
            mark_failed(&pool, user_id).await;
        }
    }
}

/// Variante OAuth: vincula uma conta existente usando o authorization code.
pub async fn link_account(pool: SqlitePool, moip: MoipClient, user_id: i64, code: String) {
    tracing::info!("🔗 Vinculando conta existente para o usuário {}...", user_id);

    match moip.connect_account(&code).await {
        Ok(account_id) => mark_done(&pool, user_id, &account_id).await,
        Err(e) => {
            tracing::error!("❌ Falha ao vincular conta para {}: {:?}", user_id, e);
            mark_failed(&pool, user_id).await;
        }
    }
}

async fn mark_done(pool: &SqlitePool, user_id: i64, account_id: &str) {
    let result = sqlx::query(
        "UPDATE moip_accounts SET account_id = ?1, status = 'concluido' WHERE user_id = ?2",
    )
    .bind(account_id)
    .bind(user_id)
    .execute(pool)
    .await;

    match result {
        Ok(_) => tracing::info!(
            "✅ Conta {} provisionada para o usuário {}.",
            account_id,
            user_id
        ),
        Err(e) => tracing::error!(
            "Erro ao gravar conta provisionada do usuário {}: {:?}",
            user_id,
            e
        ),
    }
}

async fn mark_failed(pool: &SqlitePool, user_id: i64) {
    if let Err(e) = sqlx::query("UPDATE moip_accounts SET status = 'falhou' WHERE user_id = ?1")
        .bind(user_id)
        .execute(pool)
        .await
    {
        tracing::error!(
            "Erro ao marcar falha de provisionamento do usuário {}: {:?}",
            user_id,
            e
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    async fn seed_pending(pool: &SqlitePool) -> i64 {
        let user_id = sqlx::query(
            "INSERT INTO users (name, last_name, email, password, name_id, birthdate, cpf) \
             VALUES ('Maria', 'Silva', 'maria@example.com', 'hash', 'maria1', '1990-03-15', '52998224725')",
        )
        .execute(pool)
        .await
        .unwrap()
        .last_insert_rowid();

        sqlx::query("INSERT INTO moip_accounts (user_id, status) VALUES (?1, 'pendente')")
            .bind(user_id)
            .execute(pool)
            .await
            .unwrap();

        user_id
    }

    #[tokio::test]
    async fn transicoes_de_status_do_provisionamento() {
        let pool = test_pool().await;
        let user_id = seed_pending(&pool).await;

        mark_done(&pool, user_id, "MPA-123").await;
        let (status, account_id): (String, Option<String>) = sqlx::query_as(
            "SELECT status, account_id FROM moip_accounts WHERE user_id = ?1",
        )
        .bind(user_id)
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(status, "concluido");
        assert_eq!(account_id.as_deref(), Some("MPA-123"));

        mark_failed(&pool, user_id).await;
        let status: String =
            sqlx::query_scalar("SELECT status FROM moip_accounts WHERE user_id = ?1")
                .bind(user_id)
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(status, "falhou");
    }

    #[tokio::test]
    async fn provisionamento_sem_titular_marca_falha() {
        let pool = test_pool().await;
        let user_id = seed_pending(&pool).await; // sem linha em address

        let moip = MoipClient {
            http: reqwest::Client::new(),
            endpoint: "http://127.0.0.1:9".to_string(), // inalcançável
            access_token: "token".to_string(),
            app_id: String::new(),
            redirect_url: String::new(),
        };

        provision_account(pool.clone(), moip, user_id).await;

        let status: String =
            sqlx::query_scalar("SELECT status FROM moip_accounts WHERE user_id = ?1")
                .bind(user_id)
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(status, "falhou");
    }
}
