// src/middleware/auth.rs

use axum::{
    extract::{FromRequestParts, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::{common::error::AppError, config::AppState, models::auth::Usuario};

// Usuario autenticado de la petición, con el rol activo del token.
#[derive(Debug, Clone)]
pub struct UsuarioActual {
    pub usuario: Usuario,
    pub rol_id: Uuid,
    pub rol: String,
}

// Valida el Bearer token y deja al usuario en las extensions.
pub async fn auth_guard(
    State(app_state): State<AppState>,
    mut request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, AppError> {
    let headers = request.headers();
    let auth_header = headers
        .get("Authorization")
        .and_then(|value| value.to_str().ok());

    if let Some(auth_header) = auth_header {
        if let Some(token) = auth_header.strip_prefix("Bearer ") {
            let claims = app_state.auth_service.validar_token(token)?;

            let usuario = app_state
                .usuario_repo
                .buscar_por_id(claims.sub)
                .await?
                .ok_or(AppError::InvalidToken)?;
            if !usuario.estado {
                return Err(AppError::InvalidToken);
            }

            request.extensions_mut().insert(UsuarioActual {
                usuario,
                rol_id: claims.rol_id,
                rol: claims.rol,
            });
            return Ok(next.run(request).await);
        }
    }

    Err(AppError::InvalidToken)
}

// Extractor para obtener el usuario autenticado directamente en los handlers.
impl<S> FromRequestParts<S> for UsuarioActual
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<UsuarioActual>()
            .cloned()
            .ok_or(AppError::InvalidToken)
    }
}
