// src/db/pago_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::common::error::AppError;
use crate::models::commerce::{ActualizarPagoPayload, CrearPagoPayload, EstadoPago, Pago};

#[derive(Clone)]
pub struct PagoRepository {
    pool: PgPool,
}

impl PagoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn listar(&self) -> Result<Vec<Pago>, AppError> {
        let pagos = sqlx::query_as::<_, Pago>("SELECT * FROM pagos ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;
        Ok(pagos)
    }

    pub async fn buscar_por_id(&self, id: Uuid) -> Result<Option<Pago>, AppError> {
        let pago = sqlx::query_as::<_, Pago>("SELECT * FROM pagos WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(pago)
    }

    pub async fn listar_por_ventas(&self, venta_ids: &[Uuid]) -> Result<Vec<Pago>, AppError> {
        let pagos = sqlx::query_as::<_, Pago>(
            "SELECT * FROM pagos WHERE venta_id = ANY($1) ORDER BY created_at DESC",
        )
        .bind(venta_ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(pagos)
    }

    pub async fn crear(&self, datos: &CrearPagoPayload) -> Result<Pago, AppError> {
        let pago = sqlx::query_as::<_, Pago>(
            r#"
            INSERT INTO pagos
                (venta_id, metodo_pago, fecha_pago, estado, valor_total,
                 descripcion, numero_transaccion)
            VALUES ($1, $2, COALESCE($3, now()), COALESCE($4, $5), $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(datos.venta_id)
        .bind(datos.metodo_pago)
        .bind(datos.fecha_pago)
        .bind(datos.estado)
        .bind(EstadoPago::Completado)
        .bind(datos.valor_total)
        .bind(datos.descripcion.as_deref())
        .bind(datos.numero_transaccion.as_deref())
        .fetch_one(&self.pool)
        .await?;
        Ok(pago)
    }

    pub async fn actualizar(
        &self,
        id: Uuid,
        cambios: &ActualizarPagoPayload,
    ) -> Result<Option<Pago>, AppError> {
        let pago = sqlx::query_as::<_, Pago>(
            r#"
            UPDATE pagos SET
                venta_id = COALESCE($2, venta_id),
                metodo_pago = COALESCE($3, metodo_pago),
                fecha_pago = COALESCE($4, fecha_pago),
                estado = COALESCE($5, estado),
                valor_total = COALESCE($6, valor_total),
                descripcion = COALESCE($7, descripcion),
                numero_transaccion = COALESCE($8, numero_transaccion),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(cambios.venta_id)
        .bind(cambios.metodo_pago)
        .bind(cambios.fecha_pago)
        .bind(cambios.estado)
        .bind(cambios.valor_total)
        .bind(cambios.descripcion.as_deref())
        .bind(cambios.numero_transaccion.as_deref())
        .fetch_optional(&self.pool)
        .await?;
        Ok(pago)
    }

    pub async fn eliminar(&self, id: Uuid) -> Result<bool, AppError> {
        let resultado = sqlx::query("DELETE FROM pagos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(resultado.rows_affected() > 0)
    }
}
