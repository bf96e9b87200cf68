// src/handlers/usuarios.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        error::AppError,
        response::{DatoResponse, ListaResponse},
    },
    config::AppState,
    models::auth::{ActualizarUsuarioPayload, CrearUsuarioPayload, Usuario},
};

// GET /api/usuarios
#[utoipa::path(
    get,
    path = "/api/usuarios",
    tag = "Usuarios",
    responses((status = 200, description = "Listado de usuarios", body = [Usuario])),
    security(("api_jwt" = []))
)]
pub async fn listar_usuarios(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let usuarios = app_state.usuario_repo.listar().await?;
    Ok(Json(ListaResponse::new(usuarios)))
}

// GET /api/usuarios/{id}
#[utoipa::path(
    get,
    path = "/api/usuarios/{id}",
    tag = "Usuarios",
    responses(
        (status = 200, description = "Usuario encontrado", body = Usuario),
        (status = 404, description = "Usuario no encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn obtener_usuario(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let usuario = app_state
        .usuario_repo
        .buscar_por_id(id)
        .await?
        .ok_or(AppError::NotFound("Usuario"))?;

    Ok(Json(DatoResponse::new(usuario)))
}

// POST /api/usuarios
#[utoipa::path(
    post,
    path = "/api/usuarios",
    tag = "Usuarios",
    request_body = CrearUsuarioPayload,
    responses(
        (status = 201, description = "Usuario creado", body = Usuario),
        (status = 400, description = "Datos inválidos o duplicados")
    ),
    security(("api_jwt" = []))
)]
pub async fn crear_usuario(
    State(app_state): State<AppState>,
    Json(payload): Json<CrearUsuarioPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let usuario = app_state.usuario_service.crear(&payload).await?;
    Ok((StatusCode::CREATED, Json(DatoResponse::new(usuario))))
}

// PUT /api/usuarios/{id}
#[utoipa::path(
    put,
    path = "/api/usuarios/{id}",
    tag = "Usuarios",
    request_body = ActualizarUsuarioPayload,
    responses(
        (status = 200, description = "Usuario actualizado", body = Usuario),
        (status = 404, description = "Usuario no encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn actualizar_usuario(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ActualizarUsuarioPayload>,
) -> Result<impl IntoResponse, AppError> {
    let usuario = app_state.usuario_service.actualizar(id, &payload).await?;
    Ok(Json(DatoResponse::new(usuario)))
}

// DELETE /api/usuarios/{id}
#[utoipa::path(
    delete,
    path = "/api/usuarios/{id}",
    tag = "Usuarios",
    responses(
        (status = 200, description = "Usuario eliminado"),
        (status = 400, description = "Registros asociados impiden la eliminación"),
        (status = 404, description = "Usuario no encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn eliminar_usuario(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let usuario = app_state.usuario_service.eliminar(id).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Usuario eliminado exitosamente",
        "data": usuario,
    })))
}
