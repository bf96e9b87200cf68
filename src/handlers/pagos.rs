// src/handlers/pagos.rs

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
        response::{DatoResponse, MensajeResponse},
    },
    config::AppState,
    middleware::auth::UsuarioActual,
    models::commerce::{ActualizarPagoPayload, CrearPagoPayload, FiltroPagos, PagoDetalle},
};

// GET /api/pagos
//
// El plan de consulta depende del rol de la sesión: los roles de
// autoservicio solo ven lo suyo; los administrativos pueden filtrar
// por clienteId o documento.
#[utoipa::path(
    get,
    path = "/api/pagos",
    tag = "Pagos",
    params(FiltroPagos),
    responses((status = 200, description = "Pagos con venta, beneficiario y cliente resueltos", body = [PagoDetalle])),
    security(("api_jwt" = []))
)]
pub async fn listar_pagos(
    State(app_state): State<AppState>,
    actual: UsuarioActual,
    Query(filtro): Query<FiltroPagos>,
) -> Result<impl IntoResponse, AppError> {
    let respuesta = app_state
        .pago_service
        .listar(actual.usuario.id, actual.rol_id, &actual.rol, filtro)
        .await?;

    Ok(Json(respuesta))
}

// GET /api/pagos/{id}
#[utoipa::path(
    get,
    path = "/api/pagos/{id}",
    tag = "Pagos",
    responses(
        (status = 200, description = "Pago encontrado", body = PagoDetalle),
        (status = 404, description = "Pago no encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn obtener_pago(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let pago = app_state.pago_service.buscar_detalle(id).await?;
    Ok(Json(DatoResponse::new(pago)))
}

// POST /api/pagos
#[utoipa::path(
    post,
    path = "/api/pagos",
    tag = "Pagos",
    request_body = CrearPagoPayload,
    responses(
        (status = 201, description = "Pago creado", body = PagoDetalle),
        (status = 404, description = "Venta no encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn crear_pago(
    State(app_state): State<AppState>,
    Json(payload): Json<CrearPagoPayload>,
) -> Result<impl IntoResponse, AppError> {
    let pago = app_state.pago_service.crear(&payload).await?;
    Ok((StatusCode::CREATED, Json(DatoResponse::new(pago))))
}

// PUT /api/pagos/{id}
#[utoipa::path(
    put,
    path = "/api/pagos/{id}",
    tag = "Pagos",
    request_body = ActualizarPagoPayload,
    responses(
        (status = 200, description = "Pago actualizado", body = PagoDetalle),
        (status = 404, description = "Pago no encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn actualizar_pago(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ActualizarPagoPayload>,
) -> Result<impl IntoResponse, AppError> {
    let pago = app_state.pago_service.actualizar(id, &payload).await?;
    Ok(Json(DatoResponse::new(pago)))
}

// DELETE /api/pagos/{id}
#[utoipa::path(
    delete,
    path = "/api/pagos/{id}",
    tag = "Pagos",
    responses(
        (status = 200, description = "Pago eliminado"),
        (status = 404, description = "Pago no encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn eliminar_pago(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.pago_service.eliminar(id).await?;
    Ok(Json(MensajeResponse::new("Pago eliminado exitosamente")))
}
