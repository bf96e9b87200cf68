// src/handlers/programaciones.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        error::AppError,
        response::{DatoResponse, ListaResponse, MensajeResponse},
    },
    config::AppState,
    models::scheduling::{
        Asistencia, AsistenciaDetalle, CambiarEstadoAsistenciaPayload, CrearAsistenciaPayload,
        CrearProgramacionClasePayload, CrearProgramacionProfesorPayload, ProgramacionClase,
        ProgramacionProfesor,
    },
};

// ----- Programaciones de profesor -----

// GET /api/programaciones_profesor
#[utoipa::path(
    get,
    path = "/api/programaciones_profesor",
    tag = "Programaciones",
    responses((status = 200, description = "Listado de franjas horarias", body = [ProgramacionProfesor])),
    security(("api_jwt" = []))
)]
pub async fn listar_programaciones_profesor(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let programaciones = app_state
        .programacion_repo
        .listar_programaciones_profesor()
        .await?;
    Ok(Json(ListaResponse::new(programaciones)))
}

// GET /api/programaciones_profesor/{id}
#[utoipa::path(
    get,
    path = "/api/programaciones_profesor/{id}",
    tag = "Programaciones",
    params(("id" = Uuid, Path, description = "Id de la franja")),
    responses(
        (status = 200, description = "Franja encontrada", body = ProgramacionProfesor),
        (status = 404, description = "Franja no encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn obtener_programacion_profesor(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let programacion = app_state
        .programacion_repo
        .buscar_programacion_profesor(id)
        .await?
        .ok_or(AppError::NotFound("Programación de profesor"))?;
    Ok(Json(DatoResponse::new(programacion)))
}

// POST /api/programaciones_profesor
#[utoipa::path(
    post,
    path = "/api/programaciones_profesor",
    tag = "Programaciones",
    request_body = CrearProgramacionProfesorPayload,
    responses(
        (status = 201, description = "Franja creada", body = ProgramacionProfesor),
        (status = 400, description = "Datos inválidos"),
        (status = 404, description = "Profesor no encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn crear_programacion_profesor(
    State(app_state): State<AppState>,
    Json(payload): Json<CrearProgramacionProfesorPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    app_state
        .profesor_repo
        .buscar_por_id(payload.profesor_id)
        .await?
        .ok_or(AppError::NotFound("Profesor"))?;

    let programacion = app_state
        .programacion_repo
        .crear_programacion_profesor(&payload)
        .await?;
    Ok((StatusCode::CREATED, Json(DatoResponse::new(programacion))))
}

// DELETE /api/programaciones_profesor/{id}
#[utoipa::path(
    delete,
    path = "/api/programaciones_profesor/{id}",
    tag = "Programaciones",
    params(("id" = Uuid, Path, description = "Id de la franja")),
    responses(
        (status = 200, description = "Franja eliminada"),
        (status = 404, description = "Franja no encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn eliminar_programacion_profesor(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let eliminada = app_state
        .programacion_repo
        .eliminar_programacion_profesor(id)
        .await?;
    if !eliminada {
        return Err(AppError::NotFound("Programación de profesor"));
    }
    Ok(Json(MensajeResponse::new(
        "Programación de profesor eliminada exitosamente",
    )))
}

// ----- Programaciones de clase -----

// GET /api/programaciones_clase
#[utoipa::path(
    get,
    path = "/api/programaciones_clase",
    tag = "Programaciones",
    responses((status = 200, description = "Listado de clases programadas", body = [ProgramacionClase])),
    security(("api_jwt" = []))
)]
pub async fn listar_programaciones_clase(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let clases = app_state
        .programacion_repo
        .listar_programaciones_clase()
        .await?;
    Ok(Json(ListaResponse::new(clases)))
}

// GET /api/programaciones_clase/{id}
#[utoipa::path(
    get,
    path = "/api/programaciones_clase/{id}",
    tag = "Programaciones",
    params(("id" = Uuid, Path, description = "Id de la clase")),
    responses(
        (status = 200, description = "Clase encontrada", body = ProgramacionClase),
        (status = 404, description = "Clase no encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn obtener_programacion_clase(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let clase = app_state
        .programacion_repo
        .buscar_programacion_clase(id)
        .await?
        .ok_or(AppError::NotFound("Programación de clase"))?;
    Ok(Json(DatoResponse::new(clase)))
}

// POST /api/programaciones_clase
#[utoipa::path(
    post,
    path = "/api/programaciones_clase",
    tag = "Programaciones",
    request_body = CrearProgramacionClasePayload,
    responses(
        (status = 201, description = "Clase creada", body = ProgramacionClase),
        (status = 400, description = "Datos inválidos"),
        (status = 404, description = "Franja o venta no encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn crear_programacion_clase(
    State(app_state): State<AppState>,
    Json(payload): Json<CrearProgramacionClasePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    app_state
        .programacion_repo
        .buscar_programacion_profesor(payload.programacion_profesor_id)
        .await?
        .ok_or(AppError::NotFound("Programación de profesor"))?;

    if let Some(venta_id) = payload.venta_id {
        app_state
            .venta_repo
            .buscar_por_id(venta_id)
            .await?
            .ok_or(AppError::NotFound("Venta"))?;
    }

    let clase = app_state
        .programacion_repo
        .crear_programacion_clase(&payload)
        .await?;
    Ok((StatusCode::CREATED, Json(DatoResponse::new(clase))))
}

// DELETE /api/programaciones_clase/{id}
#[utoipa::path(
    delete,
    path = "/api/programaciones_clase/{id}",
    tag = "Programaciones",
    params(("id" = Uuid, Path, description = "Id de la clase")),
    responses(
        (status = 200, description = "Clase eliminada"),
        (status = 404, description = "Clase no encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn eliminar_programacion_clase(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let eliminada = app_state
        .programacion_repo
        .eliminar_programacion_clase(id)
        .await?;
    if !eliminada {
        return Err(AppError::NotFound("Programación de clase"));
    }
    Ok(Json(MensajeResponse::new(
        "Programación de clase eliminada exitosamente",
    )))
}

// ----- Asistencias -----

// GET /api/asistencias
#[utoipa::path(
    get,
    path = "/api/asistencias",
    tag = "Asistencias",
    responses((status = 200, description = "Listado de asistencias con venta y clase", body = [AsistenciaDetalle])),
    security(("api_jwt" = []))
)]
pub async fn listar_asistencias(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let asistencias = app_state
        .programacion_repo
        .listar_asistencias_detalle()
        .await?;
    Ok(Json(ListaResponse::new(asistencias)))
}

// GET /api/asistencias/{id}
#[utoipa::path(
    get,
    path = "/api/asistencias/{id}",
    tag = "Asistencias",
    params(("id" = Uuid, Path, description = "Id de la asistencia")),
    responses(
        (status = 200, description = "Asistencia encontrada", body = AsistenciaDetalle),
        (status = 404, description = "Asistencia no encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn obtener_asistencia(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let asistencia = app_state
        .programacion_repo
        .buscar_asistencia_detalle(id)
        .await?
        .ok_or(AppError::NotFound("Asistencia"))?;
    Ok(Json(DatoResponse::new(asistencia)))
}

// POST /api/asistencias
#[utoipa::path(
    post,
    path = "/api/asistencias",
    tag = "Asistencias",
    request_body = CrearAsistenciaPayload,
    responses(
        (status = 201, description = "Asistencia registrada", body = Asistencia),
        (status = 404, description = "Venta o clase no encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn crear_asistencia(
    State(app_state): State<AppState>,
    Json(payload): Json<CrearAsistenciaPayload>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .venta_repo
        .buscar_por_id(payload.venta_id)
        .await?
        .ok_or(AppError::NotFound("Venta"))?;

    app_state
        .programacion_repo
        .buscar_programacion_clase(payload.programacion_clase_id)
        .await?
        .ok_or(AppError::NotFound("Programación de clase"))?;

    let asistencia = app_state
        .programacion_repo
        .crear_asistencia(&payload)
        .await?;
    Ok((StatusCode::CREATED, Json(DatoResponse::new(asistencia))))
}

// PATCH /api/asistencias/{id}/estado
#[utoipa::path(
    patch,
    path = "/api/asistencias/{id}/estado",
    tag = "Asistencias",
    params(("id" = Uuid, Path, description = "Id de la asistencia")),
    request_body = CambiarEstadoAsistenciaPayload,
    responses(
        (status = 200, description = "Estado actualizado", body = Asistencia),
        (status = 404, description = "Asistencia no encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn cambiar_estado_asistencia(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CambiarEstadoAsistenciaPayload>,
) -> Result<impl IntoResponse, AppError> {
    let asistencia = app_state
        .programacion_repo
        .cambiar_estado_asistencia(id, payload.estado)
        .await?
        .ok_or(AppError::NotFound("Asistencia"))?;
    Ok(Json(DatoResponse::new(asistencia)))
}
