// src/db/venta_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::common::error::AppError;
use crate::models::commerce::{
    ActualizarVentaPayload, CrearVentaPayload, EstadoVenta, Venta,
};

#[derive(Clone)]
pub struct VentaRepository {
    pool: PgPool,
}

impl VentaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn listar(&self) -> Result<Vec<Venta>, AppError> {
        let ventas =
            sqlx::query_as::<_, Venta>("SELECT * FROM ventas ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?;
        Ok(ventas)
    }

    pub async fn buscar_por_id(&self, id: Uuid) -> Result<Option<Venta>, AppError> {
        let venta = sqlx::query_as::<_, Venta>("SELECT * FROM ventas WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(venta)
    }

    pub async fn listar_por_ids(&self, ids: &[Uuid]) -> Result<Vec<Venta>, AppError> {
        let ventas = sqlx::query_as::<_, Venta>("SELECT * FROM ventas WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(ventas)
    }

    pub async fn listar_por_beneficiarios(
        &self,
        beneficiario_ids: &[Uuid],
    ) -> Result<Vec<Venta>, AppError> {
        let ventas = sqlx::query_as::<_, Venta>(
            "SELECT * FROM ventas WHERE beneficiario_id = ANY($1) ORDER BY created_at DESC",
        )
        .bind(beneficiario_ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(ventas)
    }

    pub async fn ids_por_beneficiarios(
        &self,
        beneficiario_ids: &[Uuid],
    ) -> Result<Vec<Uuid>, AppError> {
        let ids = sqlx::query_as::<_, (Uuid,)>(
            "SELECT id FROM ventas WHERE beneficiario_id = ANY($1)",
        )
        .bind(beneficiario_ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(ids.into_iter().map(|(id,)| id).collect())
    }

    // Último consecutivo emitido; el servicio calcula el siguiente código.
    pub async fn ultimo_codigo(&self) -> Result<Option<String>, AppError> {
        let codigo = sqlx::query_as::<_, (String,)>(
            // El orden por longitud evita que CI-10000 quede detrás de CI-9999.
            "SELECT codigo_venta FROM ventas ORDER BY length(codigo_venta) DESC, codigo_venta DESC LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await?;
        Ok(codigo.map(|(c,)| c))
    }

    pub async fn crear(
        &self,
        codigo_venta: &str,
        datos: &CrearVentaPayload,
    ) -> Result<Venta, AppError> {
        let venta = sqlx::query_as::<_, Venta>(
            r#"
            INSERT INTO ventas
                (codigo_venta, beneficiario_id, curso_id, tipo, valor_total,
                 ciclo, numero_de_clases, fecha_inicio, fecha_fin)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(codigo_venta)
        .bind(datos.beneficiario_id)
        .bind(datos.curso_id)
        .bind(datos.tipo)
        .bind(datos.valor_total)
        .bind(datos.ciclo)
        .bind(datos.numero_de_clases)
        .bind(datos.fecha_inicio)
        .bind(datos.fecha_fin)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::Duplicado {
                        mensaje: "Ya existe una venta con este código".into(),
                        detalles: None,
                    };
                }
            }
            e.into()
        })?;
        Ok(venta)
    }

    pub async fn actualizar(
        &self,
        id: Uuid,
        cambios: &ActualizarVentaPayload,
    ) -> Result<Option<Venta>, AppError> {
        let venta = sqlx::query_as::<_, Venta>(
            r#"
            UPDATE ventas SET
                curso_id = COALESCE($2, curso_id),
                estado = COALESCE($3, estado),
                valor_total = COALESCE($4, valor_total),
                ciclo = COALESCE($5, ciclo),
                numero_de_clases = COALESCE($6, numero_de_clases),
                fecha_inicio = COALESCE($7, fecha_inicio),
                fecha_fin = COALESCE($8, fecha_fin),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(cambios.curso_id)
        .bind(cambios.estado)
        .bind(cambios.valor_total)
        .bind(cambios.ciclo)
        .bind(cambios.numero_de_clases)
        .bind(cambios.fecha_inicio)
        .bind(cambios.fecha_fin)
        .fetch_optional(&self.pool)
        .await?;
        Ok(venta)
    }

    pub async fn anular(
        &self,
        id: Uuid,
        motivo: Option<&str>,
    ) -> Result<Option<Venta>, AppError> {
        let venta = sqlx::query_as::<_, Venta>(
            r#"
            UPDATE ventas SET
                estado = $2,
                motivo_anulacion = $3,
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(EstadoVenta::Anulada)
        .bind(motivo)
        .fetch_optional(&self.pool)
        .await?;
        Ok(venta)
    }

    pub async fn eliminar(&self, id: Uuid) -> Result<bool, AppError> {
        let resultado = sqlx::query("DELETE FROM ventas WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(resultado.rows_affected() > 0)
    }
}
