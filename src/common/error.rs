use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

// Registro que bloquea una eliminación (se enumera en la respuesta 400).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistroAsociado {
    pub id: Uuid,
    pub descripcion: String,
}

// Nuestro tipo de error, con `thiserror` para mejor ergonomía.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Error de validación")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("{0}")]
    BadRequest(String),

    #[error("{mensaje}")]
    Duplicado {
        mensaje: String,
        detalles: Option<String>,
    },

    // 400 con mensaje y detalle separados (validaciones de negocio).
    #[error("{mensaje}")]
    Invalido { mensaje: String, detalles: String },

    #[error("{0} no encontrado")]
    NotFound(&'static str),

    #[error("Credenciales inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    // Eliminación bloqueada por registros relacionados (verificación previa).
    #[error("{mensaje}")]
    IntegridadReferencial {
        mensaje: String,
        detalles: String,
        registros: Vec<RegistroAsociado>,
    },

    #[error("Error de base de datos")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para cualquier otro error inesperado.
    #[error("Error interno del servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Error de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Error de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            // Retorna todos los detalles de la validación.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "message": "Uno o más campos son inválidos",
                    "details": details,
                }));
                (StatusCode::BAD_REQUEST, body).into_response()
            }

            AppError::BadRequest(mensaje) => {
                let body = Json(json!({ "message": mensaje }));
                (StatusCode::BAD_REQUEST, body).into_response()
            }

            AppError::Duplicado { mensaje, detalles } => {
                let mut body = json!({ "message": mensaje });
                if let Some(detalles) = detalles {
                    body["details"] = json!(detalles);
                }
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }

            AppError::Invalido { mensaje, detalles } => {
                let body = Json(json!({ "message": mensaje, "details": detalles }));
                (StatusCode::BAD_REQUEST, body).into_response()
            }

            AppError::NotFound(recurso) => {
                let body = Json(json!({ "message": format!("{recurso} no encontrado") }));
                (StatusCode::NOT_FOUND, body).into_response()
            }

            AppError::InvalidCredentials => {
                let body = Json(json!({ "message": "Correo o contraseña inválidos" }));
                (StatusCode::UNAUTHORIZED, body).into_response()
            }

            AppError::InvalidToken => {
                let body = Json(json!({
                    "message": "Token de autenticación inválido o ausente"
                }));
                (StatusCode::UNAUTHORIZED, body).into_response()
            }

            AppError::IntegridadReferencial {
                mensaje,
                detalles,
                registros,
            } => {
                let body = Json(json!({
                    "message": mensaje,
                    "details": detalles,
                    "associatedRecords": registros,
                }));
                (StatusCode::BAD_REQUEST, body).into_response()
            }

            // Todos los demás errores se vuelven 500. El detalle queda en el log,
            // el cliente recibe un mensaje genérico.
            ref e => {
                tracing::error!("Error interno del servidor: {}", e);
                let body = Json(json!({ "message": "Ocurrió un error inesperado" }));
                (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn un_borrado_bloqueado_enumera_los_registros_asociados() {
        let registro = RegistroAsociado {
            id: Uuid::new_v4(),
            descripcion: "Venta CI-0001".into(),
        };
        let error = AppError::IntegridadReferencial {
            mensaje: "No se puede eliminar el beneficiario porque tiene ventas asociadas".into(),
            detalles: "El beneficiario está asociado a 1 venta(s)".into(),
            registros: vec![registro.clone()],
        };

        let respuesta = error.into_response();
        assert_eq!(respuesta.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(respuesta.into_body(), usize::MAX)
            .await
            .unwrap();
        let cuerpo: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            cuerpo["message"],
            "No se puede eliminar el beneficiario porque tiene ventas asociadas"
        );
        assert_eq!(cuerpo["associatedRecords"][0]["id"], registro.id.to_string());
        assert_eq!(cuerpo["associatedRecords"][0]["descripcion"], "Venta CI-0001");
    }
}
