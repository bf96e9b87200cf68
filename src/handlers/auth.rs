// src/handlers/auth.rs

use axum::{extract::State, response::IntoResponse, Json};
use validator::Validate;

use crate::{
    common::{error::AppError, response::DatoResponse},
    config::AppState,
    middleware::auth::UsuarioActual,
    models::auth::{CambiarRolPayload, LoginPayload, LoginResponse, UsuarioAutenticado},
};

// POST /api/login
#[utoipa::path(
    post,
    path = "/api/login",
    tag = "Auth",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Sesión iniciada", body = LoginResponse),
        (status = 401, description = "Credenciales inválidas")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let respuesta = app_state
        .auth_service
        .login(&payload.correo, &payload.contrasena)
        .await?;

    Ok(Json(respuesta))
}

// POST /api/login/cambiar-rol
#[utoipa::path(
    post,
    path = "/api/login/cambiar-rol",
    tag = "Auth",
    request_body = CambiarRolPayload,
    responses(
        (status = 200, description = "Rol de la sesión cambiado", body = LoginResponse),
        (status = 400, description = "El usuario no tiene asignado ese rol")
    ),
    security(("api_jwt" = []))
)]
pub async fn cambiar_rol(
    State(app_state): State<AppState>,
    actual: UsuarioActual,
    Json(payload): Json<CambiarRolPayload>,
) -> Result<impl IntoResponse, AppError> {
    let respuesta = app_state
        .auth_service
        .cambiar_rol(actual.usuario.id, payload.nuevo_rol_id)
        .await?;

    Ok(Json(respuesta))
}

// GET /api/usuarios/me
#[utoipa::path(
    get,
    path = "/api/usuarios/me",
    tag = "Auth",
    responses(
        (status = 200, description = "Perfil del usuario autenticado", body = UsuarioAutenticado),
        (status = 401, description = "Token inválido")
    ),
    security(("api_jwt" = []))
)]
pub async fn perfil(
    State(app_state): State<AppState>,
    actual: UsuarioActual,
) -> Result<impl IntoResponse, AppError> {
    let perfil = app_state
        .auth_service
        .perfil(actual.usuario.id, actual.rol_id)
        .await?;

    Ok(Json(DatoResponse::new(perfil)))
}
