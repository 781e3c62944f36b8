// src/services/user_service.rs
use crate::{
    error::{AppError, AppResult},
    models::user::{Holder, LoggedUser, PublicProfile, SignupPayload, UpdateUserData},
    services::{activation_service, auth_service, cpf, dates},
};
use sqlx::SqlitePool;

// Tentativas de name_id antes de cair no sufixo aleatório.
const NAME_ID_MAX_RETRIES: u32 = 5;

/// Verifica se já existe um utilizador com este email.
pub async fn email_exists(pool: &SqlitePool, email: &str) -> AppResult<bool> {
    let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM users WHERE email = ?1")
        .bind(email)
        .fetch_optional(pool)
        .await?;
    Ok(found.is_some())
}

/// Verifica se um name_id já está em uso.
pub async fn name_id_in_use(pool: &SqlitePool, name_id: &str) -> AppResult<bool> {
    let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM users WHERE name_id = ?1")
        .bind(name_id)
        .fetch_optional(pool)
        .await?;
    Ok(found.is_some())
}

// Base do name_id: só alfanumérico ASCII, minúsculo, sem espaços.
fn slug_base(name: &str) -> String {
    let base: String = name
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect::<String>()
        .to_ascii_lowercase();
    if base.is_empty() {
        "usuario".to_string()
    } else {
        base
    }
}

/// Gera um name_id livre: base derivada do nome + sal de unicidade.
/// O laço de colisão é limitado; esgotadas as tentativas, entra um sufixo
/// aleatório. A UNIQUE constraint em users.name_id é o árbitro final.
pub async fn generate_name_id(pool: &SqlitePool, name: &str) -> AppResult<String> {
    let base = slug_base(name);

    for _ in 0..NAME_ID_MAX_RETRIES {
        let candidate = format!("{}{:x}", base, chrono::Utc::now().timestamp_micros());
        if !name_id_in_use(pool, &candidate).await? {
            return Ok(candidate);
        }
    }

    tracing::warn!(
        "Colisões seguidas ao gerar name_id para '{}', usando sufixo aleatório.",
        name
    );
    Ok(format!("{}{:08x}", base, rand::random::<u32>()))
}

/// Cadastra um utilizador novo com o seu endereço.
///
/// Valida confirmação de senha, email duplicado e CPF antes de qualquer
/// escrita. Utilizador, endereço, token de ativação e a linha 'pendente' da
/// conta no gateway entram numa transação só; o provisionamento externo corre
/// depois do commit, em segundo plano (ver payment_service).
pub async fn register_user(pool: &SqlitePool, payload: SignupPayload) -> AppResult<i64> {
    let SignupPayload {
        user_info: user,
        address_info: address,
    } = payload;

    if user.password != user.confirmpassword {
        return Err(AppError::Failed("Senhas não são iguais.".to_string()));
    }

    if email_exists(pool, &user.email).await? {
        return Err(AppError::Failed(
            "Ocorreu um erro ao realizar o cadastro, esse email já foi cadastrado.".to_string(),
        ));
    }

    if !cpf::validate(&user.cpf) {
        return Err(AppError::Failed("CPF inválido.".to_string()));
    }

    // Datas chegam em DD-MM-YYYY; o banco guarda YYYY-MM-DD
    let birthdate = dates::to_storage(&user.birthdate)?;
    let issue_date = user
        .issue_date
        .as_deref()
        .map(dates::to_storage)
        .transpose()?;

    let name_id = generate_name_id(pool, &user.name).await?;
    let password_hash = auth_service::hash_password(&user.password).await?;

    let mut tx = pool.begin().await?;

    let insert_result = sqlx::query(
        "INSERT INTO users \
         (name, last_name, email, password, name_id, birthdate, rg, issue_date, cpf, gender, \
          ddd_1, tel_1, ddd_2, tel_2) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
    )
    .bind(&user.name)
    .bind(&user.last_name)
    .bind(&user.email)
    .bind(&password_hash)
    .bind(&name_id)
    .bind(&birthdate)
    .bind(&user.rg)
    .bind(&issue_date)
    .bind(&user.cpf)
    .bind(&user.gender)
    .bind(&user.ddd_1)
    .bind(&user.tel_1)
    .bind(&user.ddd_2)
    .bind(&user.tel_2)
    .execute(&mut *tx)
    .await;

    // UNIQUE constraint (email ou name_id) perdida na corrida entre a
    // checagem e o INSERT: códigos 19/2067/1555 no SQLite
    if let Err(sqlx::Error::Database(db_err)) = &insert_result {
        if db_err
            .code()
            .is_some_and(|c| c == "19" || c == "2067" || c == "1555")
        {
            tracing::warn!("Cadastro perdeu corrida de unicidade para '{}'.", user.email);
            tx.rollback().await?;
            return Err(AppError::Failed(
                "Ocorreu um erro ao realizar o cadastro, esse email já foi cadastrado."
                    .to_string(),
            ));
        }
    }
    let user_id = insert_result?.last_insert_rowid();

    sqlx::query(
        "INSERT INTO address (user_id, street, number, complement, district, city, state, zipcode) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
    )
    .bind(user_id)
    .bind(&address.street)
    .bind(&address.number)
    .bind(&address.complement)
    .bind(&address.district)
    .bind(&address.city)
    .bind(&address.state)
    .bind(&address.zipcode)
    .execute(&mut *tx)
    .await?;

    let token = activation_service::generate_token(&mut *tx, user_id, &user.email).await?;

    // A conta no gateway nasce 'pendente'; o provisionamento externo corre
    // depois do commit e atualiza esta linha.
    sqlx::query("INSERT INTO moip_accounts (user_id, status) VALUES (?1, 'pendente')")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    // O disparo real do email fica com o worker de notificações
    tracing::info!(
        "✉️ Token de ativação {} gerado para {} ({}).",
        token,
        user.email,
        user.name
    );
    tracing::info!("✅ Utilizador '{}' cadastrado (id {}).", name_id, user_id);

    Ok(user_id)
}

/// Altera o cadastro por inteiro, chaveado pelo email.
/// Sem diff de campos nem controle de concorrência otimista.
pub async fn update_user(pool: &SqlitePool, data: &UpdateUserData) -> AppResult<()> {
    let birthdate = dates::to_storage(&data.birthdate)?;

    let rows_affected = sqlx::query(
        "UPDATE users SET \
             name = ?1, last_name = ?2, birthdate = ?3, \
             ddd_1 = ?4, tel_1 = ?5, ddd_2 = ?6, tel_2 = ?7, \
             updated_at = datetime('now') \
         WHERE email = ?8",
    )
    .bind(&data.name)
    .bind(&data.last_name)
    .bind(&birthdate)
    .bind(&data.ddd_1)
    .bind(&data.tel_1)
    .bind(&data.ddd_2)
    .bind(&data.tel_2)
    .bind(&data.email)
    .execute(pool)
    .await?
    .rows_affected();

    if rows_affected == 0 {
        tracing::warn!("Alteração de cadastro sem efeito para '{}'.", data.email);
        return Err(AppError::Failed(
            "Ocorreu um erro ao alterar o seu cadastro.".to_string(),
        ));
    }

    tracing::info!("✅ Cadastro alterado para '{}'.", data.email);
    Ok(())
}

/// Verifica as credenciais e devolve o id do utilizador.
/// `None` tanto para email desconhecido quanto para senha errada.
pub async fn login(pool: &SqlitePool, email: &str, password: &str) -> AppResult<Option<i64>> {
    let row: Option<(i64, String)> =
        sqlx::query_as("SELECT id, password FROM users WHERE email = ?1")
            .bind(email)
            .fetch_optional(pool)
            .await?;

    let Some((user_id, stored_hash)) = row else {
        return Ok(None);
    };

    if auth_service::verify_password(password, &stored_hash).await? {
        Ok(Some(user_id))
    } else {
        Ok(None)
    }
}

/// Cadastro do utilizador logado, com a data de nascimento já no formato
/// de exibição.
pub async fn get_logged_user(pool: &SqlitePool, user_id: i64) -> AppResult<Option<LoggedUser>> {
    let user: Option<LoggedUser> = sqlx::query_as(
        "SELECT name, last_name, birthdate, email, rg, cpf, ddd_1, tel_1, ddd_2, tel_2 \
         FROM users WHERE id = ?1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    match user {
        Some(mut user) => {
            user.birthdate = dates::to_display(&user.birthdate)?;
            Ok(Some(user))
        }
        None => Ok(None),
    }
}

/// Perfil público de um utilizador, buscado pelo name_id.
pub async fn get_user_by_name_id(
    pool: &SqlitePool,
    name_id: &str,
) -> AppResult<Option<PublicProfile>> {
    let profile = sqlx::query_as::<_, PublicProfile>(
        "SELECT name, last_name, gender, created_at FROM users WHERE name_id = ?1",
    )
    .bind(name_id)
    .fetch_optional(pool)
    .await?;
    Ok(profile)
}

/// Id da conta externa no gateway, se o provisionamento já concluiu.
pub async fn get_account_id(pool: &SqlitePool, user_id: i64) -> AppResult<Option<String>> {
    let account_id: Option<Option<String>> =
        sqlx::query_scalar("SELECT account_id FROM moip_accounts WHERE user_id = ?1")
            .bind(user_id)
            .fetch_optional(pool)
            .await?;
    Ok(account_id.flatten())
}

/// Utilizador + endereço numa linha só, no formato que a API de contas
/// do gateway espera como titular.
pub async fn create_holder(pool: &SqlitePool, user_id: i64) -> AppResult<Option<Holder>> {
    let holder = sqlx::query_as::<_, Holder>(
        "SELECT users.name, users.last_name, users.email, \
                users.birthdate AS aniversario, users.cpf, \
                users.ddd_1 AS ddd, users.tel_1 AS telefone, \
                address.street, address.number, address.complement, address.district, \
                address.city, address.state, address.zipcode \
         FROM users \
         JOIN address ON address.user_id = users.id \
         WHERE users.id = ?1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;
    Ok(holder)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;
    use crate::models::user::{AddressInfo, UserInfo};
    use crate::services::activation_service;

    fn payload(name: &str, email: &str) -> SignupPayload {
        SignupPayload {
            user_info: UserInfo {
                name: name.to_string(),
                last_name: "Silva".to_string(),
                email: email.to_string(),
                password: "segredo123".to_string(),
                confirmpassword: "segredo123".to_string(),
                birthdate: "15-03-1990".to_string(),
                rg: Some("123456789".to_string()),
                issue_date: Some("01-02-2010".to_string()),
                cpf: "529.982.247-25".to_string(),
                gender: Some("feminino".to_string()),
                ddd_1: Some("11".to_string()),
                tel_1: Some("999990000".to_string()),
                ddd_2: None,
                tel_2: None,
            },
            address_info: AddressInfo {
                street: "Rua das Flores".to_string(),
                number: Some("42".to_string()),
                complement: None,
                district: Some("Centro".to_string()),
                city: "São Paulo".to_string(),
                state: "SP".to_string(),
                zipcode: "01000-000".to_string(),
            },
        }
    }

    async fn count(pool: &SqlitePool, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn cadastro_valido_grava_usuario_e_endereco() {
        let pool = test_pool().await;
        let user_id = register_user(&pool, payload("Maria", "maria@example.com"))
            .await
            .unwrap();
        assert!(user_id > 0);

        assert_eq!(count(&pool, "users").await, 1);
        assert_eq!(count(&pool, "address").await, 1);

        // Data armazenada no formato do banco
        let birthdate: String = sqlx::query_scalar("SELECT birthdate FROM users WHERE id = ?1")
            .bind(user_id)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(birthdate, "1990-03-15");

        // Conta no gateway nasce pendente, token de ativação existe
        let moip_status: String =
            sqlx::query_scalar("SELECT status FROM moip_accounts WHERE user_id = ?1")
                .bind(user_id)
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(moip_status, "pendente");
        assert_eq!(count(&pool, "activations").await, 1);
    }

    #[tokio::test]
    async fn senha_diferente_da_confirmacao_nao_grava_nada() {
        let pool = test_pool().await;
        let mut dados = payload("Maria", "maria@example.com");
        dados.user_info.confirmpassword = "outra".to_string();

        let err = register_user(&pool, dados).await.unwrap_err();
        assert!(matches!(err, AppError::Failed(m) if m == "Senhas não são iguais."));
        assert_eq!(count(&pool, "users").await, 0);
        assert_eq!(count(&pool, "address").await, 0);
    }

    #[tokio::test]
    async fn email_duplicado_falha_sem_escrever() {
        let pool = test_pool().await;
        register_user(&pool, payload("Maria", "maria@example.com"))
            .await
            .unwrap();

        let err = register_user(&pool, payload("Outra", "maria@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Failed(m) if m.contains("já foi cadastrado")));
        assert_eq!(count(&pool, "users").await, 1);
        assert_eq!(count(&pool, "address").await, 1);
    }

    #[tokio::test]
    async fn cpf_invalido_e_rejeitado() {
        let pool = test_pool().await;
        let mut dados = payload("Maria", "maria@example.com");
        dados.user_info.cpf = "529.982.247-26".to_string();

        let err = register_user(&pool, dados).await.unwrap_err();
        assert!(matches!(err, AppError::Failed(m) if m == "CPF inválido."));
        assert_eq!(count(&pool, "users").await, 0);
    }

    #[tokio::test]
    async fn name_ids_nao_colidem_para_nomes_iguais() {
        let pool = test_pool().await;
        register_user(&pool, payload("Maria Clara", "a@example.com"))
            .await
            .unwrap();
        register_user(&pool, payload("Maria Clara", "b@example.com"))
            .await
            .unwrap();

        let name_ids: Vec<String> = sqlx::query_scalar("SELECT name_id FROM users")
            .fetch_all(&pool)
            .await
            .unwrap();
        assert_eq!(name_ids.len(), 2);
        assert_ne!(name_ids[0], name_ids[1]);
        // Sem espaços, derivado do nome
        assert!(name_ids.iter().all(|n| n.starts_with("mariaclara")));
    }

    #[tokio::test]
    async fn login_e_ativacao() {
        let pool = test_pool().await;
        let user_id = register_user(&pool, payload("Maria", "maria@example.com"))
            .await
            .unwrap();

        // Credenciais certas e erradas
        assert_eq!(
            login(&pool, "maria@example.com", "segredo123").await.unwrap(),
            Some(user_id)
        );
        assert_eq!(
            login(&pool, "maria@example.com", "errada").await.unwrap(),
            None
        );
        assert_eq!(
            login(&pool, "ninguem@example.com", "segredo123")
                .await
                .unwrap(),
            None
        );

        // Ativação consome o token e muda o status
        let token: String = sqlx::query_scalar("SELECT token FROM activations WHERE user_id = ?1")
            .bind(user_id)
            .fetch_one(&pool)
            .await
            .unwrap();

        assert!(activation_service::activate(&pool, "").await.is_err());
        assert!(activation_service::activate(&pool, "desconhecido")
            .await
            .is_err());

        activation_service::activate(&pool, &token).await.unwrap();
        let status: String = sqlx::query_scalar("SELECT status FROM users WHERE id = ?1")
            .bind(user_id)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(status, "ativado");
        assert_eq!(count(&pool, "activations").await, 0);
    }

    #[tokio::test]
    async fn data_de_nascimento_volta_no_formato_de_exibicao() {
        let pool = test_pool().await;
        let user_id = register_user(&pool, payload("Maria", "maria@example.com"))
            .await
            .unwrap();

        let logged = get_logged_user(&pool, user_id).await.unwrap().unwrap();
        assert_eq!(logged.birthdate, "15-03-1990");
        assert_eq!(logged.email, "maria@example.com");
    }

    #[tokio::test]
    async fn alteracao_de_cadastro_por_email() {
        let pool = test_pool().await;
        let user_id = register_user(&pool, payload("Maria", "maria@example.com"))
            .await
            .unwrap();

        let alteracao = UpdateUserData {
            email: "maria@example.com".to_string(),
            name: "Mariana".to_string(),
            last_name: "Souza".to_string(),
            birthdate: "20-07-1991".to_string(),
            ddd_1: Some("21".to_string()),
            tel_1: Some("888880000".to_string()),
            ddd_2: None,
            tel_2: None,
        };
        update_user(&pool, &alteracao).await.unwrap();

        let logged = get_logged_user(&pool, user_id).await.unwrap().unwrap();
        assert_eq!(logged.name, "Mariana");
        assert_eq!(logged.birthdate, "20-07-1991");

        // Email inexistente falha
        let mut fantasma = alteracao;
        fantasma.email = "ninguem@example.com".to_string();
        assert!(update_user(&pool, &fantasma).await.is_err());
    }

    #[tokio::test]
    async fn holder_junta_usuario_e_endereco() {
        let pool = test_pool().await;
        let user_id = register_user(&pool, payload("Maria", "maria@example.com"))
            .await
            .unwrap();

        let holder = create_holder(&pool, user_id).await.unwrap().unwrap();
        assert_eq!(holder.name, "Maria");
        assert_eq!(holder.aniversario, "1990-03-15");
        assert_eq!(holder.city, "São Paulo");
        assert_eq!(holder.email, "maria@example.com");
    }
}
