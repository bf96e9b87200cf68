// src/handlers/rbac.rs
//
// Roles y asignaciones usuario-rol.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        response::{DatoResponse, ListaResponse, MensajeResponse},
    },
    config::AppState,
    models::rbac::{
        ActualizarUsuarioHasRolPayload, CrearUsuarioHasRolPayload, Rol, UsuarioHasRol,
        UsuarioHasRolDetalle,
    },
};

// GET /api/roles
#[utoipa::path(
    get,
    path = "/api/roles",
    tag = "Roles",
    responses((status = 200, description = "Listado de roles", body = [Rol])),
    security(("api_jwt" = []))
)]
pub async fn listar_roles(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let roles = app_state.rol_repo.listar_roles().await?;
    Ok(Json(ListaResponse::new(roles)))
}

// GET /api/roles/{id}
#[utoipa::path(
    get,
    path = "/api/roles/{id}",
    tag = "Roles",
    responses(
        (status = 200, description = "Rol encontrado", body = Rol),
        (status = 404, description = "Rol no encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn obtener_rol(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let rol = app_state
        .rol_repo
        .buscar_rol(id)
        .await?
        .ok_or(AppError::NotFound("Rol"))?;

    Ok(Json(DatoResponse::new(rol)))
}

// GET /api/roles/{id}/permisos
#[utoipa::path(
    get,
    path = "/api/roles/{id}/permisos",
    tag = "Roles",
    responses(
        (status = 200, description = "Módulos concedidos al rol", body = [String]),
        (status = 404, description = "Rol no encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn permisos_de_rol(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .rol_repo
        .buscar_rol(id)
        .await?
        .ok_or(AppError::NotFound("Rol"))?;

    let modulos = app_state.rol_repo.modulos_de_rol(id).await?;
    Ok(Json(ListaResponse::new(modulos)))
}

// GET /api/usuarios_has_rol
#[utoipa::path(
    get,
    path = "/api/usuarios_has_rol",
    tag = "Usuarios-Rol",
    responses((status = 200, description = "Asignaciones con usuario y rol resueltos", body = [UsuarioHasRolDetalle])),
    security(("api_jwt" = []))
)]
pub async fn listar_relaciones(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let relaciones = app_state.rol_repo.listar_relaciones().await?;
    Ok(Json(ListaResponse::new(relaciones)))
}

// GET /api/usuarios_has_rol/{id}
#[utoipa::path(
    get,
    path = "/api/usuarios_has_rol/{id}",
    tag = "Usuarios-Rol",
    responses(
        (status = 200, description = "Asignación encontrada", body = UsuarioHasRolDetalle),
        (status = 404, description = "Asignación no encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn obtener_relacion(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let relacion = app_state
        .rol_repo
        .buscar_relacion_detalle(id)
        .await?
        .ok_or(AppError::NotFound("Asignación de rol"))?;

    Ok(Json(DatoResponse::new(relacion)))
}

// POST /api/usuarios_has_rol
//
// Devuelve TODAS las asignaciones del usuario tras crear la nueva,
// para que el cliente refresque su listado en una sola llamada.
#[utoipa::path(
    post,
    path = "/api/usuarios_has_rol",
    tag = "Usuarios-Rol",
    request_body = CrearUsuarioHasRolPayload,
    responses(
        (status = 201, description = "Asignaciones del usuario", body = [UsuarioHasRolDetalle]),
        (status = 400, description = "El usuario ya tiene asignado este rol")
    ),
    security(("api_jwt" = []))
)]
pub async fn crear_relacion(
    State(app_state): State<AppState>,
    Json(payload): Json<CrearUsuarioHasRolPayload>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .usuario_repo
        .buscar_por_id(payload.usuario_id)
        .await?
        .ok_or(AppError::NotFound("Usuario"))?;
    app_state
        .rol_repo
        .buscar_rol(payload.rol_id)
        .await?
        .ok_or(AppError::NotFound("Rol"))?;

    app_state
        .rol_repo
        .crear_relacion(&app_state.db_pool, payload.usuario_id, payload.rol_id)
        .await?;

    let relaciones = app_state
        .rol_repo
        .relaciones_de_usuario(payload.usuario_id)
        .await?;

    Ok((StatusCode::CREATED, Json(ListaResponse::new(relaciones))))
}

// PUT /api/usuarios_has_rol/{id}
#[utoipa::path(
    put,
    path = "/api/usuarios_has_rol/{id}",
    tag = "Usuarios-Rol",
    request_body = ActualizarUsuarioHasRolPayload,
    responses(
        (status = 200, description = "Asignación actualizada", body = UsuarioHasRol),
        (status = 404, description = "Asignación no encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn actualizar_relacion(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ActualizarUsuarioHasRolPayload>,
) -> Result<impl IntoResponse, AppError> {
    if let Some(rol_id) = payload.rol_id {
        app_state
            .rol_repo
            .buscar_rol(rol_id)
            .await?
            .ok_or(AppError::NotFound("Rol"))?;
    }

    let relacion = app_state
        .rol_repo
        .actualizar_relacion(id, payload.rol_id, payload.estado)
        .await?
        .ok_or(AppError::NotFound("Asignación de rol"))?;

    Ok(Json(DatoResponse::new(relacion)))
}

// DELETE /api/usuarios_has_rol/{id}
#[utoipa::path(
    delete,
    path = "/api/usuarios_has_rol/{id}",
    tag = "Usuarios-Rol",
    responses(
        (status = 200, description = "Asignación eliminada"),
        (status = 404, description = "Asignación no encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn eliminar_relacion(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    if !app_state.rol_repo.eliminar_relacion(id).await? {
        return Err(AppError::NotFound("Asignación de rol"));
    }
    Ok(Json(MensajeResponse::new("Asignación eliminada exitosamente")))
}

// GET /api/usuarios_has_rol/usuario/{usuarioId}
#[utoipa::path(
    get,
    path = "/api/usuarios_has_rol/usuario/{usuarioId}",
    tag = "Usuarios-Rol",
    responses((status = 200, description = "Asignaciones del usuario", body = [UsuarioHasRolDetalle])),
    security(("api_jwt" = []))
)]
pub async fn relaciones_de_usuario(
    State(app_state): State<AppState>,
    Path(usuario_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let relaciones = app_state.rol_repo.relaciones_de_usuario(usuario_id).await?;
    Ok(Json(ListaResponse::new(relaciones)))
}

// DELETE /api/usuarios_has_rol/usuario/{usuarioId}
#[utoipa::path(
    delete,
    path = "/api/usuarios_has_rol/usuario/{usuarioId}",
    tag = "Usuarios-Rol",
    responses((status = 200, description = "Asignaciones del usuario eliminadas")),
    security(("api_jwt" = []))
)]
pub async fn eliminar_relaciones_de_usuario(
    State(app_state): State<AppState>,
    Path(usuario_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let eliminadas = app_state
        .rol_repo
        .eliminar_relaciones_de_usuario(&app_state.db_pool, usuario_id)
        .await?;

    Ok(Json(MensajeResponse::new(format!(
        "{eliminadas} asignación(es) eliminada(s)"
    ))))
}
