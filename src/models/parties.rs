// src/models/parties.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::auth::TipoDocumento;

// Parte responsable de la facturación.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Cliente {
    pub id: Uuid,
    pub nombre: String,
    pub apellido: String,
    pub tipo_documento: TipoDocumento,
    pub numero_documento: String,
    pub telefono: String,
    pub estado: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Discriminador persistido de la referencia al pagador.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "referencia_cliente_kind", rename_all = "lowercase")]
pub enum ReferenciaClienteKind {
    Propio,
    Cliente,
    Beneficiario,
}

// Referencia explícita al pagador de un beneficiario, normalizada en
// escritura. Reemplaza al antiguo campo de texto libre que podía apuntar
// a sí mismo, a un cliente o a otro beneficiario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum ReferenciaCliente {
    // El beneficiario paga por sí mismo.
    Propio,
    // Paga un registro de la colección de clientes.
    Cliente(Uuid),
    // Paga otro beneficiario (p. ej. un acudiente ya registrado).
    Beneficiario(Uuid),
}

impl ReferenciaCliente {
    // Descompone la referencia en las columnas (cliente_kind, cliente_ref).
    pub fn a_columnas(self) -> (ReferenciaClienteKind, Option<Uuid>) {
        match self {
            ReferenciaCliente::Propio => (ReferenciaClienteKind::Propio, None),
            ReferenciaCliente::Cliente(id) => (ReferenciaClienteKind::Cliente, Some(id)),
            ReferenciaCliente::Beneficiario(id) => (ReferenciaClienteKind::Beneficiario, Some(id)),
        }
    }

    // Reconstruye la referencia desde las columnas. El CHECK de la tabla
    // garantiza que `cliente_ref` es NULL exactamente cuando kind = propio.
    pub fn desde_columnas(kind: ReferenciaClienteKind, referencia: Option<Uuid>) -> Self {
        match (kind, referencia) {
            (ReferenciaClienteKind::Propio, _) => ReferenciaCliente::Propio,
            (ReferenciaClienteKind::Cliente, Some(id)) => ReferenciaCliente::Cliente(id),
            (ReferenciaClienteKind::Beneficiario, Some(id)) => ReferenciaCliente::Beneficiario(id),
            (kind, None) => {
                tracing::warn!(?kind, "referencia de cliente sin id, se trata como propio");
                ReferenciaCliente::Propio
            }
        }
    }
}

// Fila cruda de la tabla `beneficiarios`.
#[derive(Debug, Clone, FromRow)]
pub struct BeneficiarioRow {
    pub id: Uuid,
    pub nombre: String,
    pub apellido: String,
    pub tipo_de_documento: TipoDocumento,
    pub numero_de_documento: String,
    pub telefono: String,
    pub correo: Option<String>,
    pub direccion: Option<String>,
    pub fecha_de_nacimiento: Option<NaiveDate>,
    pub cliente_kind: ReferenciaClienteKind,
    pub cliente_ref: Option<Uuid>,
    pub usuario_rol_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Receptor del servicio (estudiante).
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Beneficiario {
    pub id: Uuid,
    pub nombre: String,
    pub apellido: String,
    pub tipo_de_documento: TipoDocumento,
    pub numero_de_documento: String,
    pub telefono: String,
    pub correo: Option<String>,
    pub direccion: Option<String>,
    pub fecha_de_nacimiento: Option<NaiveDate>,
    pub cliente: ReferenciaCliente,
    pub usuario_rol_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<BeneficiarioRow> for Beneficiario {
    fn from(fila: BeneficiarioRow) -> Self {
        Self {
            id: fila.id,
            nombre: fila.nombre,
            apellido: fila.apellido,
            tipo_de_documento: fila.tipo_de_documento,
            numero_de_documento: fila.numero_de_documento,
            telefono: fila.telefono,
            correo: fila.correo,
            direccion: fila.direccion,
            fecha_de_nacimiento: fila.fecha_de_nacimiento,
            cliente: ReferenciaCliente::desde_columnas(fila.cliente_kind, fila.cliente_ref),
            usuario_rol_id: fila.usuario_rol_id,
            created_at: fila.created_at,
            updated_at: fila.updated_at,
        }
    }
}

// Registro con forma de cliente que se adjunta a cada pago,
// sea cual sea la colección de la que salió la atribución.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InfoCliente {
    pub id: Uuid,
    pub nombre: String,
    pub apellido: String,
    pub tipo_documento: TipoDocumento,
    pub numero_documento: String,
    pub telefono: String,
    pub correo: Option<String>,
    pub direccion: Option<String>,
    pub fecha_nacimiento: Option<NaiveDate>,
    pub estado: bool,
}

impl InfoCliente {
    pub fn desde_cliente(cliente: &Cliente) -> Self {
        Self {
            id: cliente.id,
            nombre: cliente.nombre.clone(),
            apellido: cliente.apellido.clone(),
            tipo_documento: cliente.tipo_documento,
            numero_documento: cliente.numero_documento.clone(),
            telefono: cliente.telefono.clone(),
            correo: None,
            direccion: None,
            fecha_nacimiento: None,
            estado: cliente.estado,
        }
    }

    pub fn desde_beneficiario(beneficiario: &Beneficiario) -> Self {
        Self {
            id: beneficiario.id,
            nombre: beneficiario.nombre.clone(),
            apellido: beneficiario.apellido.clone(),
            tipo_documento: beneficiario.tipo_de_documento,
            numero_documento: beneficiario.numero_de_documento.clone(),
            telefono: beneficiario.telefono.clone(),
            correo: beneficiario.correo.clone(),
            direccion: beneficiario.direccion.clone(),
            fecha_nacimiento: beneficiario.fecha_de_nacimiento,
            estado: true,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CrearClientePayload {
    #[validate(length(min = 1, message = "El nombre es obligatorio"))]
    pub nombre: String,

    #[validate(length(min = 1, message = "El apellido es obligatorio"))]
    pub apellido: String,

    pub tipo_documento: TipoDocumento,

    #[schema(example = "1012345678")]
    pub numero_documento: String,

    #[validate(length(min = 1, message = "El teléfono es obligatorio"))]
    pub telefono: String,

    pub estado: Option<bool>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActualizarClientePayload {
    pub nombre: Option<String>,
    pub apellido: Option<String>,
    pub tipo_documento: Option<TipoDocumento>,
    pub numero_documento: Option<String>,
    pub telefono: Option<String>,
    pub estado: Option<bool>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CrearBeneficiarioPayload {
    #[validate(length(min = 1, message = "El nombre es obligatorio"))]
    pub nombre: String,

    #[validate(length(min = 1, message = "El apellido es obligatorio"))]
    pub apellido: String,

    pub tipo_de_documento: TipoDocumento,

    #[schema(example = "1012345678")]
    pub numero_de_documento: String,

    #[validate(length(min = 1, message = "El teléfono es obligatorio"))]
    pub telefono: String,

    pub correo: Option<String>,
    pub direccion: Option<String>,
    pub fecha_de_nacimiento: Option<NaiveDate>,

    // Referencia al pagador, ya etiquetada: {"kind": "propio"} |
    // {"kind": "cliente", "id": ...} | {"kind": "beneficiario", "id": ...}
    pub cliente: ReferenciaCliente,

    pub usuario_rol_id: Option<Uuid>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActualizarBeneficiarioPayload {
    pub nombre: Option<String>,
    pub apellido: Option<String>,
    pub tipo_de_documento: Option<TipoDocumento>,
    pub numero_de_documento: Option<String>,
    pub telefono: Option<String>,
    pub correo: Option<String>,
    pub direccion: Option<String>,
    pub fecha_de_nacimiento: Option<NaiveDate>,
    pub cliente: Option<ReferenciaCliente>,
    pub usuario_rol_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn beneficiario_de_prueba(cliente: ReferenciaCliente) -> Beneficiario {
        Beneficiario {
            id: Uuid::new_v4(),
            nombre: "Ana".into(),
            apellido: "Mejía".into(),
            tipo_de_documento: TipoDocumento::CC,
            numero_de_documento: "1012345678".into(),
            telefono: "3001234567".into(),
            correo: Some("ana@correo.com".into()),
            direccion: Some("Calle 10 # 4-20".into()),
            fecha_de_nacimiento: NaiveDate::from_ymd_opt(1999, 4, 12),
            cliente,
            usuario_rol_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn referencia_propio_serializa_solo_kind() {
        let json = serde_json::to_value(ReferenciaCliente::Propio).unwrap();
        assert_eq!(json, serde_json::json!({ "kind": "propio" }));
    }

    #[test]
    fn referencia_cliente_viaja_con_id() {
        let id = Uuid::new_v4();
        let json = serde_json::to_value(ReferenciaCliente::Cliente(id)).unwrap();
        assert_eq!(json, serde_json::json!({ "kind": "cliente", "id": id }));

        let vuelta: ReferenciaCliente = serde_json::from_value(json).unwrap();
        assert_eq!(vuelta, ReferenciaCliente::Cliente(id));
    }

    #[test]
    fn columnas_y_referencia_son_inversas() {
        let id = Uuid::new_v4();
        for referencia in [
            ReferenciaCliente::Propio,
            ReferenciaCliente::Cliente(id),
            ReferenciaCliente::Beneficiario(id),
        ] {
            let (kind, referencia_id) = referencia.a_columnas();
            assert_eq!(
                ReferenciaCliente::desde_columnas(kind, referencia_id),
                referencia
            );
        }
    }

    // Un beneficiario que se paga a sí mismo se atribuye con sus propios datos.
    #[test]
    fn info_cliente_propio_copia_los_campos_del_beneficiario() {
        let beneficiario = beneficiario_de_prueba(ReferenciaCliente::Propio);
        let info = InfoCliente::desde_beneficiario(&beneficiario);

        assert_eq!(info.id, beneficiario.id);
        assert_eq!(info.nombre, beneficiario.nombre);
        assert_eq!(info.apellido, beneficiario.apellido);
        assert_eq!(info.numero_documento, beneficiario.numero_de_documento);
        assert_eq!(info.telefono, beneficiario.telefono);
        assert_eq!(info.correo, beneficiario.correo);
        assert_eq!(info.direccion, beneficiario.direccion);
        assert_eq!(info.fecha_nacimiento, beneficiario.fecha_de_nacimiento);
        assert!(info.estado);
    }
}
