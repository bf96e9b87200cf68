// src/models/profesores.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::models::auth::TipoDocumento;

// Estados posibles de un profesor. El PATCH de estado valida contra
// este conjunto cerrado y responde 400 si llega otra cosa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "estado_profesor")]
pub enum EstadoProfesor {
    Activo,
    Inactivo,
    Pendiente,
    Suspendido,
}

impl fmt::Display for EstadoProfesor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let nombre = match self {
            EstadoProfesor::Activo => "Activo",
            EstadoProfesor::Inactivo => "Inactivo",
            EstadoProfesor::Pendiente => "Pendiente",
            EstadoProfesor::Suspendido => "Suspendido",
        };
        f.write_str(nombre)
    }
}

impl FromStr for EstadoProfesor {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Activo" => Ok(EstadoProfesor::Activo),
            "Inactivo" => Ok(EstadoProfesor::Inactivo),
            "Pendiente" => Ok(EstadoProfesor::Pendiente),
            "Suspendido" => Ok(EstadoProfesor::Suspendido),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Profesor {
    pub id: Uuid,
    pub usuario_id: Option<Uuid>,
    pub nombres: String,
    pub apellidos: String,
    pub tipo_documento: TipoDocumento,
    pub identificacion: String,
    pub telefono: String,
    pub correo: String,
    pub direccion: Option<String>,

    #[schema(example = json!(["Piano", "Canto"]))]
    pub especialidades: Vec<String>,

    pub estado: EstadoProfesor,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CrearProfesorPayload {
    // Si viene, se reutiliza (y sincroniza) el usuario existente;
    // si no, se crea uno nuevo y la contraseña es obligatoria.
    pub usuario_id: Option<Uuid>,

    pub nombres: String,
    pub apellidos: String,
    pub tipo_documento: TipoDocumento,
    pub identificacion: String,
    pub telefono: String,
    pub correo: String,
    pub direccion: Option<String>,
    pub especialidades: Vec<String>,
    pub estado: Option<EstadoProfesor>,
    pub contrasena: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActualizarProfesorPayload {
    pub usuario_id: Option<Uuid>,
    pub nombres: Option<String>,
    pub apellidos: Option<String>,
    pub tipo_documento: Option<TipoDocumento>,
    pub telefono: Option<String>,
    pub correo: Option<String>,
    pub direccion: Option<String>,
    pub especialidades: Option<Vec<String>>,
    pub estado: Option<EstadoProfesor>,
}

// El estado llega como texto y se valida a mano para responder 400
// (y no 422) ante valores fuera del conjunto.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CambiarEstadoProfesorPayload {
    #[schema(example = "Inactivo")]
    pub estado: String,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct FiltroProfesores {
    pub usuario_id: Option<Uuid>,
}
