// src/handlers/ventas.rs

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
        response::{DatoResponse, ListaResponse, MensajeResponse},
    },
    config::AppState,
    models::commerce::{
        ActualizarVentaPayload, AnularVentaPayload, CrearVentaPayload, VentaDetalle,
    },
};

// GET /api/ventas
#[utoipa::path(
    get,
    path = "/api/ventas",
    tag = "Ventas",
    responses((status = 200, description = "Ventas con beneficiario y cliente resueltos", body = [VentaDetalle])),
    security(("api_jwt" = []))
)]
pub async fn listar_ventas(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let ventas = app_state.venta_service.listar().await?;
    Ok(Json(ListaResponse::new(ventas)))
}

// GET /api/ventas/next-consecutivo
#[utoipa::path(
    get,
    path = "/api/ventas/next-consecutivo",
    tag = "Ventas",
    responses((status = 200, description = "Próximo código de venta disponible")),
    security(("api_jwt" = []))
)]
pub async fn proximo_consecutivo(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let codigo = app_state.venta_service.proximo_codigo().await?;
    Ok(Json(json!({ "success": true, "data": codigo })))
}

// GET /api/ventas/{id}
#[utoipa::path(
    get,
    path = "/api/ventas/{id}",
    tag = "Ventas",
    responses(
        (status = 200, description = "Venta encontrada", body = VentaDetalle),
        (status = 404, description = "Venta no encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn obtener_venta(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let venta = app_state.venta_service.buscar_detalle(id).await?;
    Ok(Json(DatoResponse::new(venta)))
}

// POST /api/ventas
#[utoipa::path(
    post,
    path = "/api/ventas",
    tag = "Ventas",
    request_body = CrearVentaPayload,
    responses(
        (status = 201, description = "Venta creada", body = VentaDetalle),
        (status = 400, description = "Datos inválidos"),
        (status = 404, description = "Beneficiario o curso inexistente")
    ),
    security(("api_jwt" = []))
)]
pub async fn crear_venta(
    State(app_state): State<AppState>,
    Json(payload): Json<CrearVentaPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let venta = app_state.venta_service.crear(&payload).await?;
    Ok((StatusCode::CREATED, Json(DatoResponse::new(venta))))
}

// PUT /api/ventas/{id}
#[utoipa::path(
    put,
    path = "/api/ventas/{id}",
    tag = "Ventas",
    request_body = ActualizarVentaPayload,
    responses(
        (status = 200, description = "Venta actualizada", body = VentaDetalle),
        (status = 404, description = "Venta no encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn actualizar_venta(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ActualizarVentaPayload>,
) -> Result<impl IntoResponse, AppError> {
    let venta = app_state.venta_service.actualizar(id, &payload).await?;
    Ok(Json(DatoResponse::new(venta)))
}

// PATCH /api/ventas/{id}/anular
#[utoipa::path(
    patch,
    path = "/api/ventas/{id}/anular",
    tag = "Ventas",
    request_body = AnularVentaPayload,
    responses(
        (status = 200, description = "Venta anulada", body = VentaDetalle),
        (status = 404, description = "Venta no encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn anular_venta(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AnularVentaPayload>,
) -> Result<impl IntoResponse, AppError> {
    let venta = app_state
        .venta_service
        .anular(id, payload.motivo_anulacion.as_deref())
        .await?;
    Ok(Json(DatoResponse::new(venta)))
}

// DELETE /api/ventas/{id}
#[utoipa::path(
    delete,
    path = "/api/ventas/{id}",
    tag = "Ventas",
    responses(
        (status = 200, description = "Venta eliminada"),
        (status = 400, description = "Pagos, clases o asistencias asociadas impiden la eliminación"),
        (status = 404, description = "Venta no encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn eliminar_venta(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.venta_service.eliminar(id).await?;
    Ok(Json(MensajeResponse::new("Venta eliminada exitosamente")))
}
