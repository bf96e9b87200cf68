// src/models/rbac.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::auth::Usuario;

// Lo que sale de la tabla `roles`.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Rol {
    pub id: Uuid,

    #[schema(example = "administrador")]
    pub nombre: String,

    pub descripcion: Option<String>,
    pub estado: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Asignación activa de un rol a un usuario (única por par usuario/rol).
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UsuarioHasRol {
    pub id: Uuid,
    pub usuario_id: Uuid,
    pub rol_id: Uuid,
    pub estado: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Relación con usuario y rol ya resueltos, como la entrega la API.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UsuarioHasRolDetalle {
    pub id: Uuid,
    pub estado: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub usuario: Usuario,
    pub rol: Rol,
}

impl UsuarioHasRolDetalle {
    pub fn armar(relacion: UsuarioHasRol, usuario: Usuario, rol: Rol) -> Self {
        Self {
            id: relacion.id,
            estado: relacion.estado,
            created_at: relacion.created_at,
            updated_at: relacion.updated_at,
            usuario,
            rol,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CrearUsuarioHasRolPayload {
    pub usuario_id: Uuid,
    pub rol_id: Uuid,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActualizarUsuarioHasRolPayload {
    pub rol_id: Option<Uuid>,
    pub estado: Option<bool>,
}
