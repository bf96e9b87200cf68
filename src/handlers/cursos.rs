// src/handlers/cursos.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

use crate::{
    common::{
        error::AppError,
        response::{DatoResponse, ListaResponse},
    },
    config::AppState,
    models::commerce::{CrearCursoPayload, Curso},
};

// GET /api/cursos
#[utoipa::path(
    get,
    path = "/api/cursos",
    tag = "Cursos",
    responses((status = 200, description = "Listado de cursos", body = [Curso])),
    security(("api_jwt" = []))
)]
pub async fn listar_cursos(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let cursos = app_state.curso_repo.listar().await?;
    Ok(Json(ListaResponse::new(cursos)))
}

// POST /api/cursos
#[utoipa::path(
    post,
    path = "/api/cursos",
    tag = "Cursos",
    request_body = CrearCursoPayload,
    responses(
        (status = 201, description = "Curso creado", body = Curso),
        (status = 400, description = "Datos inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn crear_curso(
    State(app_state): State<AppState>,
    Json(payload): Json<CrearCursoPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let curso = app_state.curso_repo.crear(&payload).await?;
    Ok((StatusCode::CREATED, Json(DatoResponse::new(curso))))
}
