// src/models/user.rs
// As datas de pessoas ficam no banco em YYYY-MM-DD; a conversão de/para o
// formato de exibição DD-MM-YYYY acontece em services::dates.
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// Payload completo do cadastro: dados do utilizador + endereço,
// como o cliente envia num único POST.
#[derive(Debug, Deserialize)]
pub struct SignupPayload {
    pub user_info: UserInfo,
    pub address_info: AddressInfo,
}

#[derive(Debug, Deserialize)]
pub struct UserInfo {
    pub name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub confirmpassword: String,
    // Datas chegam no formato de exibição DD-MM-YYYY
    pub birthdate: String,
    pub rg: Option<String>,
    pub issue_date: Option<String>,
    pub cpf: String,
    pub gender: Option<String>,
    pub ddd_1: Option<String>,
    pub tel_1: Option<String>,
    pub ddd_2: Option<String>,
    pub tel_2: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddressInfo {
    pub street: String,
    pub number: Option<String>,
    pub complement: Option<String>,
    pub district: Option<String>,
    pub city: String,
    pub state: String,
    pub zipcode: String,
}

// Cadastro via vínculo de conta existente no gateway (fluxo OAuth):
// mesmo payload do signup + o authorization code devolvido ao cliente.
#[derive(Debug, Deserialize)]
pub struct SignupWithMoipPayload {
    pub user_info: UserInfo,
    pub address_info: AddressInfo,
    pub code: String,
}

// Alteração de cadastro: linha inteira, chaveada pelo email.
#[derive(Debug, Deserialize)]
pub struct UpdateUserData {
    pub email: String,
    pub name: String,
    pub last_name: String,
    pub birthdate: String, // DD-MM-YYYY
    pub ddd_1: Option<String>,
    pub tel_1: Option<String>,
    pub ddd_2: Option<String>,
    pub tel_2: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ActivationForm {
    pub token: String,
}

// Campos que o utilizador logado vê do próprio cadastro (sem hash).
#[derive(Debug, Serialize, FromRow)]
pub struct LoggedUser {
    pub name: String,
    pub last_name: String,
    pub birthdate: String, // convertida para DD-MM-YYYY antes de sair
    pub email: String,
    pub rg: Option<String>,
    pub cpf: String,
    pub ddd_1: Option<String>,
    pub tel_1: Option<String>,
    pub ddd_2: Option<String>,
    pub tel_2: Option<String>,
}

// Perfil público, buscado pelo name_id.
#[derive(Debug, Serialize, FromRow)]
pub struct PublicProfile {
    pub name: String,
    pub last_name: String,
    pub gender: Option<String>,
    pub created_at: Option<String>,
}

// Titular da conta no gateway: utilizador + endereço numa linha só,
// exatamente o que a API de contas pede.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Holder {
    pub name: String,
    pub last_name: String,
    pub email: String,
    pub aniversario: String, // birthdate em YYYY-MM-DD
    pub cpf: String,
    pub ddd: Option<String>,
    pub telefone: Option<String>,
    pub street: String,
    pub number: Option<String>,
    pub complement: Option<String>,
    pub district: Option<String>,
    pub city: String,
    pub state: String,
    pub zipcode: String,
}
