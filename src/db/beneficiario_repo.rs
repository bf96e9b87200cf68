// src/db/beneficiario_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::common::error::AppError;
use crate::models::parties::{
    ActualizarBeneficiarioPayload, Beneficiario, BeneficiarioRow, CrearBeneficiarioPayload,
    ReferenciaCliente,
};

#[derive(Clone)]
pub struct BeneficiarioRepository {
    pool: PgPool,
}

impl BeneficiarioRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn listar(&self) -> Result<Vec<Beneficiario>, AppError> {
        let filas = sqlx::query_as::<_, BeneficiarioRow>(
            "SELECT * FROM beneficiarios ORDER BY nombre, apellido",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(filas.into_iter().map(Beneficiario::from).collect())
    }

    pub async fn buscar_por_id(&self, id: Uuid) -> Result<Option<Beneficiario>, AppError> {
        let fila = sqlx::query_as::<_, BeneficiarioRow>("SELECT * FROM beneficiarios WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(fila.map(Beneficiario::from))
    }

    pub async fn listar_por_ids(&self, ids: &[Uuid]) -> Result<Vec<Beneficiario>, AppError> {
        let filas =
            sqlx::query_as::<_, BeneficiarioRow>("SELECT * FROM beneficiarios WHERE id = ANY($1)")
                .bind(ids)
                .fetch_all(&self.pool)
                .await?;
        Ok(filas.into_iter().map(Beneficiario::from).collect())
    }

    pub async fn buscar_por_documento(
        &self,
        numero_de_documento: &str,
    ) -> Result<Option<Beneficiario>, AppError> {
        let fila = sqlx::query_as::<_, BeneficiarioRow>(
            "SELECT * FROM beneficiarios WHERE numero_de_documento = $1",
        )
        .bind(numero_de_documento)
        .fetch_optional(&self.pool)
        .await?;
        Ok(fila.map(Beneficiario::from))
    }

    pub async fn buscar_por_usuario_rol(
        &self,
        usuario_rol_id: Uuid,
    ) -> Result<Option<Beneficiario>, AppError> {
        let fila = sqlx::query_as::<_, BeneficiarioRow>(
            "SELECT * FROM beneficiarios WHERE usuario_rol_id = $1",
        )
        .bind(usuario_rol_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(fila.map(Beneficiario::from))
    }

    // Beneficiarios cuya referencia de pagador apunta al id dado
    // (cliente o beneficiario-acudiente).
    pub async fn asociados_a(&self, referencia: Uuid) -> Result<Vec<Beneficiario>, AppError> {
        let filas = sqlx::query_as::<_, BeneficiarioRow>(
            "SELECT * FROM beneficiarios WHERE cliente_ref = $1",
        )
        .bind(referencia)
        .fetch_all(&self.pool)
        .await?;
        Ok(filas.into_iter().map(Beneficiario::from).collect())
    }

    pub async fn crear(&self, datos: &CrearBeneficiarioPayload) -> Result<Beneficiario, AppError> {
        let (kind, referencia) = datos.cliente.a_columnas();

        let fila = sqlx::query_as::<_, BeneficiarioRow>(
            r#"
            INSERT INTO beneficiarios
                (nombre, apellido, tipo_de_documento, numero_de_documento, telefono,
                 correo, direccion, fecha_de_nacimiento, cliente_kind, cliente_ref, usuario_rol_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(&datos.nombre)
        .bind(&datos.apellido)
        .bind(datos.tipo_de_documento)
        .bind(&datos.numero_de_documento)
        .bind(&datos.telefono)
        .bind(datos.correo.as_deref())
        .bind(datos.direccion.as_deref())
        .bind(datos.fecha_de_nacimiento)
        .bind(kind)
        .bind(referencia)
        .bind(datos.usuario_rol_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::Duplicado {
                        mensaje: "Ya existe un beneficiario con este documento".into(),
                        detalles: None,
                    };
                }
            }
            e.into()
        })?;

        Ok(Beneficiario::from(fila))
    }

    pub async fn actualizar(
        &self,
        id: Uuid,
        cambios: &ActualizarBeneficiarioPayload,
    ) -> Result<Option<Beneficiario>, AppError> {
        // La referencia al pagador se reescribe completa cuando viene en el
        // payload; COALESCE no sirve para el par (kind, ref).
        let columnas_referencia = cambios.cliente.map(ReferenciaCliente::a_columnas);
        let (kind, referencia) = match columnas_referencia {
            Some((kind, referencia)) => (Some(kind), referencia),
            None => (None, None),
        };

        let fila = sqlx::query_as::<_, BeneficiarioRow>(
            r#"
            UPDATE beneficiarios SET
                nombre = COALESCE($2, nombre),
                apellido = COALESCE($3, apellido),
                tipo_de_documento = COALESCE($4, tipo_de_documento),
                numero_de_documento = COALESCE($5, numero_de_documento),
                telefono = COALESCE($6, telefono),
                correo = COALESCE($7, correo),
                direccion = COALESCE($8, direccion),
                fecha_de_nacimiento = COALESCE($9, fecha_de_nacimiento),
                cliente_kind = COALESCE($10, cliente_kind),
                cliente_ref = CASE WHEN $10::referencia_cliente_kind IS NULL
                                   THEN cliente_ref ELSE $11 END,
                usuario_rol_id = COALESCE($12, usuario_rol_id),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(cambios.nombre.as_deref())
        .bind(cambios.apellido.as_deref())
        .bind(cambios.tipo_de_documento)
        .bind(cambios.numero_de_documento.as_deref())
        .bind(cambios.telefono.as_deref())
        .bind(cambios.correo.as_deref())
        .bind(cambios.direccion.as_deref())
        .bind(cambios.fecha_de_nacimiento)
        .bind(kind)
        .bind(referencia)
        .bind(cambios.usuario_rol_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::Duplicado {
                        mensaje: "Ya existe un beneficiario con este documento".into(),
                        detalles: None,
                    };
                }
            }
            AppError::from(e)
        })?;

        Ok(fila.map(Beneficiario::from))
    }

    pub async fn eliminar(&self, id: Uuid) -> Result<bool, AppError> {
        let resultado = sqlx::query("DELETE FROM beneficiarios WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(resultado.rows_affected() > 0)
    }
}
