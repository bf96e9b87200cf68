// src/models/commerce.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::models::auth::TipoDocumento;
use crate::models::parties::{Beneficiario, InfoCliente};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "tipo_venta", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TipoVenta {
    Curso,
    Matricula,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "estado_venta", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EstadoVenta {
    Vigente,
    Finalizada,
    Anulada,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "metodo_pago", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MetodoPago {
    Efectivo,
    Transferencia,
    Tarjeta,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "estado_pago", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EstadoPago {
    Pendiente,
    Completado,
    Cancelado,
    Anulado,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Curso {
    pub id: Uuid,
    pub nombre: String,
    pub descripcion: Option<String>,
    pub estado: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CrearCursoPayload {
    #[validate(length(min = 2, message = "El nombre debe tener mínimo 2 caracteres"))]
    #[schema(example = "Guitarra clásica")]
    pub nombre: String,

    pub descripcion: Option<String>,
    pub estado: Option<bool>,
}

// Una venta/matrícula que vincula un beneficiario con un curso.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Venta {
    pub id: Uuid,

    #[schema(example = "CI-0007")]
    pub codigo_venta: String,

    pub beneficiario_id: Uuid,
    pub curso_id: Option<Uuid>,
    pub tipo: TipoVenta,
    pub estado: EstadoVenta,

    #[schema(value_type = f64, example = 250000.0)]
    pub valor_total: Decimal,

    pub ciclo: Option<i32>,
    pub numero_de_clases: i32,
    pub fecha_inicio: NaiveDate,
    pub fecha_fin: NaiveDate,
    pub motivo_anulacion: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CrearVentaPayload {
    pub beneficiario_id: Uuid,
    pub curso_id: Option<Uuid>,
    pub tipo: TipoVenta,

    #[schema(value_type = f64, example = 250000.0)]
    pub valor_total: Decimal,

    pub ciclo: Option<i32>,

    #[validate(range(min = 1, message = "El número de clases debe ser mayor a cero"))]
    pub numero_de_clases: i32,

    pub fecha_inicio: NaiveDate,
    pub fecha_fin: NaiveDate,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActualizarVentaPayload {
    pub curso_id: Option<Uuid>,
    pub estado: Option<EstadoVenta>,

    #[schema(value_type = Option<f64>)]
    pub valor_total: Option<Decimal>,

    pub ciclo: Option<i32>,
    pub numero_de_clases: Option<i32>,
    pub fecha_inicio: Option<NaiveDate>,
    pub fecha_fin: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnularVentaPayload {
    pub motivo_anulacion: Option<String>,
}

// Un pago asociado a una venta.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pago {
    pub id: Uuid,
    pub venta_id: Uuid,
    pub metodo_pago: MetodoPago,
    pub fecha_pago: DateTime<Utc>,
    pub estado: EstadoPago,

    #[schema(value_type = f64, example = 125000.0)]
    pub valor_total: Decimal,

    pub descripcion: Option<String>,
    pub numero_transaccion: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CrearPagoPayload {
    pub venta_id: Uuid,
    pub metodo_pago: MetodoPago,

    // Opcionales: la fecha por defecto es "ahora" y el estado nace completado.
    pub fecha_pago: Option<DateTime<Utc>>,
    pub estado: Option<EstadoPago>,

    #[schema(value_type = f64, example = 125000.0)]
    pub valor_total: Decimal,

    pub descripcion: Option<String>,
    pub numero_transaccion: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActualizarPagoPayload {
    pub venta_id: Option<Uuid>,
    pub metodo_pago: Option<MetodoPago>,
    pub fecha_pago: Option<DateTime<Utc>>,
    pub estado: Option<EstadoPago>,

    #[schema(value_type = Option<f64>)]
    pub valor_total: Option<Decimal>,

    pub descripcion: Option<String>,
    pub numero_transaccion: Option<String>,
}

// Filtros explícitos del listado de pagos (solo roles administrativos).
#[derive(Debug, Default, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct FiltroPagos {
    pub cliente_id: Option<Uuid>,
    pub documento: Option<String>,
}

// Beneficiario con el cliente de facturación ya atribuido. La referencia
// cruda (kind, id) se reemplaza por el registro resuelto bajo `cliente`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BeneficiarioConCliente {
    pub id: Uuid,
    pub nombre: String,
    pub apellido: String,
    pub tipo_de_documento: TipoDocumento,
    pub numero_de_documento: String,
    pub telefono: String,
    pub correo: Option<String>,
    pub direccion: Option<String>,
    pub fecha_de_nacimiento: Option<NaiveDate>,
    pub usuario_rol_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub cliente: Option<InfoCliente>,
}

impl BeneficiarioConCliente {
    pub fn nuevo(beneficiario: Beneficiario, cliente: Option<InfoCliente>) -> Self {
        Self {
            id: beneficiario.id,
            nombre: beneficiario.nombre,
            apellido: beneficiario.apellido,
            tipo_de_documento: beneficiario.tipo_de_documento,
            numero_de_documento: beneficiario.numero_de_documento,
            telefono: beneficiario.telefono,
            correo: beneficiario.correo,
            direccion: beneficiario.direccion,
            fecha_de_nacimiento: beneficiario.fecha_de_nacimiento,
            usuario_rol_id: beneficiario.usuario_rol_id,
            created_at: beneficiario.created_at,
            updated_at: beneficiario.updated_at,
            cliente,
        }
    }
}

// Venta con su beneficiario resuelto.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VentaDetalle {
    #[serde(flatten)]
    pub venta: Venta,
    pub beneficiario: BeneficiarioConCliente,
}

// Forma final de un pago en la API: pago → venta → beneficiario → cliente.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PagoDetalle {
    #[serde(flatten)]
    pub pago: Pago,
    pub venta: VentaDetalle,
}
