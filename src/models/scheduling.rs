// src/models/scheduling.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::commerce::Venta;
use crate::models::parties::Beneficiario;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "estado_programacion_profesor", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EstadoProgramacionProfesor {
    Activo,
    Cancelado,
    Completado,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "estado_programacion_clase", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EstadoProgramacionClase {
    Programada,
    Ejecutada,
    Cancelada,
    Reprogramada,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "estado_asistencia", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EstadoAsistencia {
    Asistio,
    NoAsistio,
}

// Franja horaria recurrente de un profesor.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProgramacionProfesor {
    pub id: Uuid,
    pub profesor_id: Uuid,

    #[schema(example = "14:00")]
    pub hora_inicio: String,

    #[schema(example = "16:00")]
    pub hora_fin: String,

    #[schema(example = json!(["lunes", "miercoles"]))]
    pub dias_seleccionados: Vec<String>,

    pub estado: EstadoProgramacionProfesor,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CrearProgramacionProfesorPayload {
    pub profesor_id: Uuid,

    #[validate(length(min = 1, message = "La hora de inicio es obligatoria"))]
    pub hora_inicio: String,

    #[validate(length(min = 1, message = "La hora de fin es obligatoria"))]
    pub hora_fin: String,

    #[validate(length(min = 1, message = "Debe seleccionar al menos un día"))]
    pub dias_seleccionados: Vec<String>,

    pub estado: Option<EstadoProgramacionProfesor>,
}

// Clase concreta dentro de la franja de un profesor.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProgramacionClase {
    pub id: Uuid,
    pub programacion_profesor_id: Uuid,
    pub venta_id: Option<Uuid>,

    #[schema(example = "lunes")]
    pub dia: String,

    pub hora_inicio: String,
    pub hora_fin: String,
    pub especialidad: String,
    pub estado: EstadoProgramacionClase,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CrearProgramacionClasePayload {
    pub programacion_profesor_id: Uuid,
    pub venta_id: Option<Uuid>,

    #[validate(length(min = 1, message = "El día es obligatorio"))]
    pub dia: String,

    #[validate(length(min = 1, message = "La hora de inicio es obligatoria"))]
    pub hora_inicio: String,

    #[validate(length(min = 1, message = "La hora de fin es obligatoria"))]
    pub hora_fin: String,

    #[validate(length(min = 1, message = "La especialidad es obligatoria"))]
    pub especialidad: String,

    pub estado: Option<EstadoProgramacionClase>,
}

// Registro de asistencia de un beneficiario a una clase.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Asistencia {
    pub id: Uuid,
    pub venta_id: Uuid,
    pub programacion_clase_id: Uuid,
    pub fecha: NaiveDate,
    pub estado: EstadoAsistencia,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CrearAsistenciaPayload {
    pub venta_id: Uuid,
    pub programacion_clase_id: Uuid,
    pub fecha: NaiveDate,
    pub estado: EstadoAsistencia,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CambiarEstadoAsistenciaPayload {
    pub estado: EstadoAsistencia,
}

// Venta con su beneficiario, como la necesita la vista de asistencia.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VentaConBeneficiario {
    #[serde(flatten)]
    pub venta: Venta,
    pub beneficiario: Option<Beneficiario>,
}

// Asistencia con la venta y la programación de clase resueltas.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AsistenciaDetalle {
    #[serde(flatten)]
    pub asistencia: Asistencia,
    pub venta: Option<VentaConBeneficiario>,
    pub programacion_clase: Option<ProgramacionClase>,
}
