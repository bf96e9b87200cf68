// src/db/cliente_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::common::error::AppError;
use crate::models::auth::TipoDocumento;
use crate::models::parties::{ActualizarClientePayload, Cliente};

#[derive(Clone)]
pub struct ClienteRepository {
    pool: PgPool,
}

impl ClienteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn listar(&self) -> Result<Vec<Cliente>, AppError> {
        let clientes =
            sqlx::query_as::<_, Cliente>("SELECT * FROM clientes ORDER BY nombre, apellido")
                .fetch_all(&self.pool)
                .await?;
        Ok(clientes)
    }

    pub async fn buscar_por_id(&self, id: Uuid) -> Result<Option<Cliente>, AppError> {
        let cliente = sqlx::query_as::<_, Cliente>("SELECT * FROM clientes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(cliente)
    }

    pub async fn buscar_por_documento(
        &self,
        numero_documento: &str,
    ) -> Result<Option<Cliente>, AppError> {
        let cliente =
            sqlx::query_as::<_, Cliente>("SELECT * FROM clientes WHERE numero_documento = $1")
                .bind(numero_documento)
                .fetch_optional(&self.pool)
                .await?;
        Ok(cliente)
    }

    pub async fn crear(
        &self,
        nombre: &str,
        apellido: &str,
        tipo_documento: TipoDocumento,
        numero_documento: &str,
        telefono: &str,
        estado: bool,
    ) -> Result<Cliente, AppError> {
        let cliente = sqlx::query_as::<_, Cliente>(
            r#"
            INSERT INTO clientes (nombre, apellido, tipo_documento, numero_documento, telefono, estado)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(nombre)
        .bind(apellido)
        .bind(tipo_documento)
        .bind(numero_documento)
        .bind(telefono)
        .bind(estado)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::Duplicado {
                        mensaje: "Ya existe un cliente con este documento".into(),
                        detalles: None,
                    };
                }
            }
            e.into()
        })?;

        Ok(cliente)
    }

    pub async fn actualizar(
        &self,
        id: Uuid,
        cambios: &ActualizarClientePayload,
    ) -> Result<Option<Cliente>, AppError> {
        let cliente = sqlx::query_as::<_, Cliente>(
            r#"
            UPDATE clientes SET
                nombre = COALESCE($2, nombre),
                apellido = COALESCE($3, apellido),
                tipo_documento = COALESCE($4, tipo_documento),
                numero_documento = COALESCE($5, numero_documento),
                telefono = COALESCE($6, telefono),
                estado = COALESCE($7, estado),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(cambios.nombre.as_deref())
        .bind(cambios.apellido.as_deref())
        .bind(cambios.tipo_documento)
        .bind(cambios.numero_documento.as_deref())
        .bind(cambios.telefono.as_deref())
        .bind(cambios.estado)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::Duplicado {
                        mensaje: "Ya existe un cliente con este documento".into(),
                        detalles: None,
                    };
                }
            }
            AppError::from(e)
        })?;

        Ok(cliente)
    }

    pub async fn eliminar(&self, id: Uuid) -> Result<bool, AppError> {
        let resultado = sqlx::query("DELETE FROM clientes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(resultado.rows_affected() > 0)
    }

    // Borra el registro de cliente espejo de un usuario eliminado
    // (coincidencia por documento, nombre y apellido).
    pub async fn eliminar_por_identidad<'e, E>(
        &self,
        executor: E,
        numero_documento: &str,
        nombre: &str,
        apellido: &str,
    ) -> Result<u64, AppError>
    where
        E: sqlx::Executor<'e, Database = sqlx::Postgres>,
    {
        let resultado = sqlx::query(
            r#"
            DELETE FROM clientes
            WHERE numero_documento = $1 AND nombre = $2 AND apellido = $3
            "#,
        )
        .bind(numero_documento)
        .bind(nombre)
        .bind(apellido)
        .execute(executor)
        .await?;
        Ok(resultado.rows_affected())
    }
}
