// src/handlers/clientes.rs

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
        error::{AppError, RegistroAsociado},
        response::{DatoResponse, ListaResponse, MensajeResponse},
    },
    config::AppState,
    models::parties::{ActualizarClientePayload, Cliente, CrearClientePayload},
    services::usuario_service::validar_documento,
};

// GET /api/clientes
#[utoipa::path(
    get,
    path = "/api/clientes",
    tag = "Clientes",
    responses((status = 200, description = "Listado de clientes", body = [Cliente])),
    security(("api_jwt" = []))
)]
pub async fn listar_clientes(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let clientes = app_state.cliente_repo.listar().await?;
    Ok(Json(ListaResponse::new(clientes)))
}

// GET /api/clientes/{id}
#[utoipa::path(
    get,
    path = "/api/clientes/{id}",
    tag = "Clientes",
    responses(
        (status = 200, description = "Cliente encontrado", body = Cliente),
        (status = 404, description = "Cliente no encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn obtener_cliente(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let cliente = app_state
        .cliente_repo
        .buscar_por_id(id)
        .await?
        .ok_or(AppError::NotFound("Cliente"))?;

    Ok(Json(DatoResponse::new(cliente)))
}

// POST /api/clientes
#[utoipa::path(
    post,
    path = "/api/clientes",
    tag = "Clientes",
    request_body = CrearClientePayload,
    responses(
        (status = 201, description = "Cliente creado", body = Cliente),
        (status = 400, description = "Datos inválidos o documento duplicado")
    ),
    security(("api_jwt" = []))
)]
pub async fn crear_cliente(
    State(app_state): State<AppState>,
    Json(payload): Json<CrearClientePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    validar_documento(&payload.numero_documento)?;

    let cliente = app_state
        .cliente_repo
        .crear(
            &payload.nombre,
            &payload.apellido,
            payload.tipo_documento,
            &payload.numero_documento,
            &payload.telefono,
            payload.estado.unwrap_or(true),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(DatoResponse::new(cliente))))
}

// PUT /api/clientes/{id}
#[utoipa::path(
    put,
    path = "/api/clientes/{id}",
    tag = "Clientes",
    request_body = ActualizarClientePayload,
    responses(
        (status = 200, description = "Cliente actualizado", body = Cliente),
        (status = 404, description = "Cliente no encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn actualizar_cliente(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ActualizarClientePayload>,
) -> Result<impl IntoResponse, AppError> {
    if let Some(numero) = payload.numero_documento.as_deref() {
        validar_documento(numero)?;
    }

    let cliente = app_state
        .cliente_repo
        .actualizar(id, &payload)
        .await?
        .ok_or(AppError::NotFound("Cliente"))?;

    Ok(Json(DatoResponse::new(cliente)))
}

// DELETE /api/clientes/{id}
#[utoipa::path(
    delete,
    path = "/api/clientes/{id}",
    tag = "Clientes",
    responses(
        (status = 200, description = "Cliente eliminado"),
        (status = 400, description = "Beneficiarios asociados impiden la eliminación"),
        (status = 404, description = "Cliente no encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn eliminar_cliente(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let asociados = app_state.beneficiario_repo.asociados_a(id).await?;
    if !asociados.is_empty() {
        return Err(AppError::IntegridadReferencial {
            mensaje: "No se puede eliminar el cliente porque tiene beneficiarios asociados".into(),
            detalles: format!("El cliente está asociado a {} beneficiario(s)", asociados.len()),
            registros: asociados
                .into_iter()
                .map(|b| RegistroAsociado {
                    id: b.id,
                    descripcion: format!("{} {} ({})", b.nombre, b.apellido, b.numero_de_documento),
                })
                .collect(),
        });
    }

    if !app_state.cliente_repo.eliminar(id).await? {
        return Err(AppError::NotFound("Cliente"));
    }
    Ok(Json(MensajeResponse::new("Cliente eliminado exitosamente")))
}
