// src/handlers/profesores.rs

use axum::{
    extract::{Path, Query, State},
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
    models::profesores::{
        ActualizarProfesorPayload, CambiarEstadoProfesorPayload, CrearProfesorPayload,
        FiltroProfesores, Profesor,
    },
    services::profesor_service::parsear_estado,
};

// GET /api/profesores
#[utoipa::path(
    get,
    path = "/api/profesores",
    tag = "Profesores",
    params(FiltroProfesores),
    responses((status = 200, description = "Listado de profesores", body = [Profesor])),
    security(("api_jwt" = []))
)]
pub async fn listar_profesores(
    State(app_state): State<AppState>,
    Query(filtro): Query<FiltroProfesores>,
) -> Result<impl IntoResponse, AppError> {
    let profesores = match filtro.usuario_id {
        Some(usuario_id) => app_state
            .profesor_repo
            .buscar_por_usuario(usuario_id)
            .await?
            .into_iter()
            .collect(),
        None => app_state.profesor_repo.listar().await?,
    };

    Ok(Json(ListaResponse::new(profesores)))
}

// GET /api/profesores/{id}
#[utoipa::path(
    get,
    path = "/api/profesores/{id}",
    tag = "Profesores",
    responses(
        (status = 200, description = "Profesor encontrado", body = Profesor),
        (status = 404, description = "Profesor no encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn obtener_profesor(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let profesor = app_state
        .profesor_repo
        .buscar_por_id(id)
        .await?
        .ok_or(AppError::NotFound("Profesor"))?;

    Ok(Json(DatoResponse::new(profesor)))
}

// GET /api/profesores/especialidad/{especialidad}
#[utoipa::path(
    get,
    path = "/api/profesores/especialidad/{especialidad}",
    tag = "Profesores",
    responses((status = 200, description = "Profesores activos que dictan la especialidad", body = [Profesor])),
    security(("api_jwt" = []))
)]
pub async fn profesores_por_especialidad(
    State(app_state): State<AppState>,
    Path(especialidad): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let profesores = app_state
        .profesor_repo
        .listar_por_especialidad(&especialidad)
        .await?;

    Ok(Json(ListaResponse::new(profesores)))
}

// GET /api/profesores/estado/{estado}
#[utoipa::path(
    get,
    path = "/api/profesores/estado/{estado}",
    tag = "Profesores",
    responses(
        (status = 200, description = "Profesores en el estado dado", body = [Profesor]),
        (status = 400, description = "Estado fuera del conjunto permitido")
    ),
    security(("api_jwt" = []))
)]
pub async fn profesores_por_estado(
    State(app_state): State<AppState>,
    Path(estado): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let estado = parsear_estado(&estado)?;
    let profesores = app_state.profesor_repo.listar_por_estado(estado).await?;
    Ok(Json(ListaResponse::new(profesores)))
}

// POST /api/profesores
#[utoipa::path(
    post,
    path = "/api/profesores",
    tag = "Profesores",
    request_body = CrearProfesorPayload,
    responses(
        (status = 201, description = "Profesor creado (con su usuario)", body = Profesor),
        (status = 400, description = "Datos inválidos o profesor duplicado")
    ),
    security(("api_jwt" = []))
)]
pub async fn crear_profesor(
    State(app_state): State<AppState>,
    Json(payload): Json<CrearProfesorPayload>,
) -> Result<impl IntoResponse, AppError> {
    let profesor = app_state.profesor_service.crear(payload).await?;
    Ok((StatusCode::CREATED, Json(DatoResponse::new(profesor))))
}

// PUT /api/profesores/{id}
#[utoipa::path(
    put,
    path = "/api/profesores/{id}",
    tag = "Profesores",
    request_body = ActualizarProfesorPayload,
    responses(
        (status = 200, description = "Profesor actualizado", body = Profesor),
        (status = 404, description = "Profesor no encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn actualizar_profesor(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ActualizarProfesorPayload>,
) -> Result<impl IntoResponse, AppError> {
    let profesor = app_state.profesor_service.actualizar(id, &payload).await?;
    Ok(Json(DatoResponse::new(profesor)))
}

// PATCH /api/profesores/{id}/estado
#[utoipa::path(
    patch,
    path = "/api/profesores/{id}/estado",
    tag = "Profesores",
    request_body = CambiarEstadoProfesorPayload,
    responses(
        (status = 200, description = "Estado actualizado", body = Profesor),
        (status = 400, description = "Estado fuera del conjunto permitido"),
        (status = 404, description = "Profesor no encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn cambiar_estado_profesor(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CambiarEstadoProfesorPayload>,
) -> Result<impl IntoResponse, AppError> {
    let profesor = app_state
        .profesor_service
        .cambiar_estado(id, &payload.estado)
        .await?;

    Ok(Json(DatoResponse::new(profesor)))
}

// DELETE /api/profesores/{id}
#[utoipa::path(
    delete,
    path = "/api/profesores/{id}",
    tag = "Profesores",
    responses(
        (status = 200, description = "Profesor eliminado"),
        (status = 400, description = "Programaciones asociadas impiden la eliminación"),
        (status = 404, description = "Profesor no encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn eliminar_profesor(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.profesor_service.eliminar(id).await?;
    Ok(Json(MensajeResponse::new("Profesor eliminado exitosamente")))
}
