// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::rbac::Rol;

// Tipos de documento de identidad aceptados.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "tipo_documento")]
pub enum TipoDocumento {
    TI,
    CC,
    CE,
    PP,
    NIT,
}

// Representa un usuario que viene de la base de datos.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Usuario {
    pub id: Uuid,
    pub nombre: String,
    pub apellido: String,
    pub tipo_de_documento: TipoDocumento,
    pub documento: String,
    pub correo: String,

    #[serde(skip_serializing)] // IMPORTANTE para seguridad
    #[schema(ignore)]
    pub contrasena_hash: String,

    pub estado: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Datos para crear un usuario (las cuentas las crea el administrador).
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CrearUsuarioPayload {
    #[validate(length(min = 1, message = "El nombre es obligatorio"))]
    #[schema(example = "María")]
    pub nombre: String,

    #[validate(length(min = 1, message = "El apellido es obligatorio"))]
    #[schema(example = "García")]
    pub apellido: String,

    pub tipo_de_documento: TipoDocumento,

    #[schema(example = "1012345678")]
    pub documento: String,

    #[schema(example = "maria@correo.com")]
    pub correo: String,

    #[validate(length(min = 6, message = "La contraseña debe tener mínimo 6 caracteres"))]
    pub contrasena: String,

    pub estado: Option<bool>,
}

// Actualización parcial de usuario.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActualizarUsuarioPayload {
    pub nombre: Option<String>,
    pub apellido: Option<String>,
    pub tipo_de_documento: Option<TipoDocumento>,
    pub documento: Option<String>,
    pub correo: Option<String>,
    pub contrasena: Option<String>,
    pub estado: Option<bool>,
}

// Datos para login.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginPayload {
    #[validate(email(message = "El correo proporcionado es inválido"))]
    #[schema(example = "maria@correo.com")]
    pub correo: String,

    #[validate(length(min = 1, message = "La contraseña es obligatoria"))]
    pub contrasena: String,
}

// Datos para cambiar el rol activo de la sesión.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CambiarRolPayload {
    pub nuevo_rol_id: Uuid,
}

// Usuario autenticado tal como lo consume el cliente: rol actual,
// todos los roles activos y el conjunto de permisos ya resuelto.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UsuarioAutenticado {
    pub id: Uuid,
    pub nombre: String,
    pub apellido: String,
    pub correo: String,
    pub documento: String,
    pub tipo_de_documento: TipoDocumento,
    pub rol: Rol,
    pub todos_los_roles: Vec<Rol>,
    pub permisos: Vec<String>,
}

// Respuesta de autenticación.
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub success: bool,
    pub token: String,
    pub usuario: UsuarioAutenticado,
}

// Estructura de datos ("claims") dentro del JWT.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,    // ID del usuario
    pub rol_id: Uuid, // Rol activo de la sesión
    pub rol: String,  // Nombre del rol activo
    pub exp: usize,   // Expiration time
    pub iat: usize,   // Issued at
}
