// src/web/user_handlers.rs
use crate::{
    error::{AppError, AppResult},
    models::user::{ActivationForm, SignupPayload, SignupWithMoipPayload, UpdateUserData},
    services::{activation_service, payment_service, user_service},
    state::AppState,
    web::{envelope::ApiResponse, mw_auth::UserId},
};
use axum::{
    extract::{Extension, Path, State},
    Json,
};
use serde_json::{json, Value};

// POST /api/signup — cadastro de novo usuário
pub async fn handle_signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupPayload>,
) -> AppResult<Json<ApiResponse<Value>>> {
    let user_id = user_service::register_user(&state.db_pool, payload).await?;

    // Provisionamento da conta no gateway corre em segundo plano; o cadastro
    // local já está commitado e não é desfeito se o gateway falhar.
    tokio::spawn(payment_service::provision_account(
        state.db_pool.clone(),
        state.moip.clone(),
        user_id,
    ));

    Ok(Json(ApiResponse::ok_with_message(
        json!({ "user_id": user_id }),
        "Cadastro realizado! Enviamos um email para ativar a sua conta.",
    )))
}

// POST /api/signup/moip — cadastro vinculando conta existente no gateway
pub async fn handle_signup_with_moip(
    State(state): State<AppState>,
    Json(payload): Json<SignupWithMoipPayload>,
) -> AppResult<Json<ApiResponse<Value>>> {
    let SignupWithMoipPayload {
        user_info,
        address_info,
        code,
    } = payload;

    let user_id = user_service::register_user(
        &state.db_pool,
        SignupPayload {
            user_info,
            address_info,
        },
    )
    .await?;

    tokio::spawn(payment_service::link_account(
        state.db_pool.clone(),
        state.moip.clone(),
        user_id,
        code,
    ));

    Ok(Json(ApiResponse::ok_with_message(
        json!({ "user_id": user_id }),
        "Cadastro realizado! Enviamos um email para ativar a sua conta.",
    )))
}

// POST /api/activate — consome o token enviado por email
pub async fn handle_activate(
    State(state): State<AppState>,
    Json(form): Json<ActivationForm>,
) -> AppResult<Json<ApiResponse<()>>> {
    activation_service::activate(&state.db_pool, &form.token).await?;
    Ok(Json(ApiResponse::ok_empty()))
}

// GET /api/user — cadastro do usuário logado
pub async fn logged_user(
    State(state): State<AppState>,
    Extension(user_id_ext): Extension<UserId>,
) -> AppResult<Json<ApiResponse<Value>>> {
    let user = user_service::get_logged_user(&state.db_pool, user_id_ext.0)
        .await?
        .ok_or_else(|| {
            // user_id validado pelo middleware mas sem linha na DB
            tracing::error!(
                "CRÍTICO: user_id {} autenticado não encontrado na DB!",
                user_id_ext.0
            );
            AppError::InternalServerError
        })?;

    Ok(Json(ApiResponse::ok(json!(user))))
}

// POST /api/user/update — altera o cadastro inteiro, chaveado pelo email
pub async fn handle_update_user(
    State(state): State<AppState>,
    Json(data): Json<UpdateUserData>,
) -> AppResult<Json<ApiResponse<()>>> {
    user_service::update_user(&state.db_pool, &data).await?;
    Ok(Json(ApiResponse::ok_empty()))
}

// GET /api/user/account — id da conta externa no gateway, se já provisionada
pub async fn account_id(
    State(state): State<AppState>,
    Extension(user_id_ext): Extension<UserId>,
) -> AppResult<Json<ApiResponse<Value>>> {
    let account_id = user_service::get_account_id(&state.db_pool, user_id_ext.0).await?;
    Ok(Json(ApiResponse::ok(json!({ "account_id": account_id }))))
}

// GET /api/users/{name_id} — perfil público
pub async fn public_profile(
    State(state): State<AppState>,
    Path(name_id): Path<String>,
) -> AppResult<Json<ApiResponse<Value>>> {
    match user_service::get_user_by_name_id(&state.db_pool, &name_id).await? {
        Some(profile) => Ok(Json(ApiResponse::ok(json!(profile)))),
        None => Err(AppError::Failed(
            "Nenhum usuário encontrado com este identificador.".to_string(),
        )),
    }
}
