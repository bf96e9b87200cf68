// src/handlers/beneficiarios.rs

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
    models::parties::{
        ActualizarBeneficiarioPayload, Beneficiario, CrearBeneficiarioPayload, ReferenciaCliente,
    },
    services::usuario_service::validar_documento,
};

// La referencia al pagador se normaliza en escritura: si apunta a un
// registro, ese registro tiene que existir.
async fn verificar_referencia(
    app_state: &AppState,
    referencia: ReferenciaCliente,
    propio_id: Option<Uuid>,
) -> Result<(), AppError> {
    match referencia {
        ReferenciaCliente::Propio => Ok(()),

        ReferenciaCliente::Cliente(id) => {
            app_state
                .cliente_repo
                .buscar_por_id(id)
                .await?
                .ok_or_else(|| {
                    AppError::BadRequest("El cliente referenciado no existe".into())
                })?;
            Ok(())
        }

        ReferenciaCliente::Beneficiario(id) => {
            if propio_id == Some(id) {
                return Err(AppError::BadRequest(
                    "Un beneficiario no puede referenciarse a sí mismo; use la referencia propia"
                        .into(),
                ));
            }
            app_state
                .beneficiario_repo
                .buscar_por_id(id)
                .await?
                .ok_or_else(|| {
                    AppError::BadRequest("El beneficiario referenciado no existe".into())
                })?;
            Ok(())
        }
    }
}

// GET /api/beneficiarios
#[utoipa::path(
    get,
    path = "/api/beneficiarios",
    tag = "Beneficiarios",
    responses((status = 200, description = "Listado de beneficiarios", body = [Beneficiario])),
    security(("api_jwt" = []))
)]
pub async fn listar_beneficiarios(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let beneficiarios = app_state.beneficiario_repo.listar().await?;
    Ok(Json(ListaResponse::new(beneficiarios)))
}

// GET /api/beneficiarios/{id}
#[utoipa::path(
    get,
    path = "/api/beneficiarios/{id}",
    tag = "Beneficiarios",
    responses(
        (status = 200, description = "Beneficiario encontrado", body = Beneficiario),
        (status = 404, description = "Beneficiario no encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn obtener_beneficiario(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let beneficiario = app_state
        .beneficiario_repo
        .buscar_por_id(id)
        .await?
        .ok_or(AppError::NotFound("Beneficiario"))?;

    Ok(Json(DatoResponse::new(beneficiario)))
}

// POST /api/beneficiarios
#[utoipa::path(
    post,
    path = "/api/beneficiarios",
    tag = "Beneficiarios",
    request_body = CrearBeneficiarioPayload,
    responses(
        (status = 201, description = "Beneficiario creado", body = Beneficiario),
        (status = 400, description = "Datos inválidos, documento duplicado o referencia rota")
    ),
    security(("api_jwt" = []))
)]
pub async fn crear_beneficiario(
    State(app_state): State<AppState>,
    Json(payload): Json<CrearBeneficiarioPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    validar_documento(&payload.numero_de_documento)?;
    verificar_referencia(&app_state, payload.cliente, None).await?;

    let beneficiario = app_state.beneficiario_repo.crear(&payload).await?;
    Ok((StatusCode::CREATED, Json(DatoResponse::new(beneficiario))))
}

// PUT /api/beneficiarios/{id}
#[utoipa::path(
    put,
    path = "/api/beneficiarios/{id}",
    tag = "Beneficiarios",
    request_body = ActualizarBeneficiarioPayload,
    responses(
        (status = 200, description = "Beneficiario actualizado", body = Beneficiario),
        (status = 404, description = "Beneficiario no encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn actualizar_beneficiario(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ActualizarBeneficiarioPayload>,
) -> Result<impl IntoResponse, AppError> {
    if let Some(numero) = payload.numero_de_documento.as_deref() {
        validar_documento(numero)?;
    }
    if let Some(referencia) = payload.cliente {
        verificar_referencia(&app_state, referencia, Some(id)).await?;
    }

    let beneficiario = app_state
        .beneficiario_repo
        .actualizar(id, &payload)
        .await?
        .ok_or(AppError::NotFound("Beneficiario"))?;

    Ok(Json(DatoResponse::new(beneficiario)))
}

// DELETE /api/beneficiarios/{id}
#[utoipa::path(
    delete,
    path = "/api/beneficiarios/{id}",
    tag = "Beneficiarios",
    responses(
        (status = 200, description = "Beneficiario eliminado"),
        (status = 400, description = "Ventas asociadas impiden la eliminación"),
        (status = 404, description = "Beneficiario no encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn eliminar_beneficiario(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    // Las ventas referencian al beneficiario sin cascada; se enumeran
    // las que bloquean el borrado.
    let ventas = app_state.venta_repo.listar_por_beneficiarios(&[id]).await?;
    if !ventas.is_empty() {
        return Err(AppError::IntegridadReferencial {
            mensaje: "No se puede eliminar el beneficiario porque tiene ventas asociadas".into(),
            detalles: format!("El beneficiario está asociado a {} venta(s)", ventas.len()),
            registros: ventas
                .into_iter()
                .map(|v| RegistroAsociado {
                    id: v.id,
                    descripcion: format!("Venta {}", v.codigo_venta),
                })
                .collect(),
        });
    }

    if !app_state.beneficiario_repo.eliminar(id).await? {
        return Err(AppError::NotFound("Beneficiario"));
    }
    Ok(Json(MensajeResponse::new(
        "Beneficiario eliminado exitosamente",
    )))
}
