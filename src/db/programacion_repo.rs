// src/db/programacion_repo.rs

use std::collections::HashMap;

use sqlx::PgPool;
use uuid::Uuid;

use crate::common::error::AppError;
use crate::models::commerce::Venta;
use crate::models::parties::{Beneficiario, BeneficiarioRow};
use crate::models::scheduling::{
    Asistencia, AsistenciaDetalle, CrearAsistenciaPayload, CrearProgramacionClasePayload,
    CrearProgramacionProfesorPayload, EstadoAsistencia, EstadoProgramacionProfesor,
    ProgramacionClase, ProgramacionProfesor, VentaConBeneficiario,
};

#[derive(Clone)]
pub struct ProgramacionRepository {
    pool: PgPool,
}

impl ProgramacionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ----- Programaciones de profesor (franjas recurrentes) -----

    pub async fn listar_programaciones_profesor(
        &self,
    ) -> Result<Vec<ProgramacionProfesor>, AppError> {
        let programaciones = sqlx::query_as::<_, ProgramacionProfesor>(
            "SELECT * FROM programaciones_profesor ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(programaciones)
    }

    pub async fn buscar_programacion_profesor(
        &self,
        id: Uuid,
    ) -> Result<Option<ProgramacionProfesor>, AppError> {
        let programacion = sqlx::query_as::<_, ProgramacionProfesor>(
            "SELECT * FROM programaciones_profesor WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(programacion)
    }

    pub async fn programaciones_de_profesor(
        &self,
        profesor_id: Uuid,
    ) -> Result<Vec<ProgramacionProfesor>, AppError> {
        let programaciones = sqlx::query_as::<_, ProgramacionProfesor>(
            "SELECT * FROM programaciones_profesor WHERE profesor_id = $1 ORDER BY created_at DESC",
        )
        .bind(profesor_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(programaciones)
    }

    // Franjas vivas (activas o completadas) que bloquean el borrado del profesor.
    pub async fn programaciones_vivas_de_profesor(
        &self,
        profesor_id: Uuid,
    ) -> Result<Vec<ProgramacionProfesor>, AppError> {
        let programaciones = sqlx::query_as::<_, ProgramacionProfesor>(
            "SELECT * FROM programaciones_profesor WHERE profesor_id = $1 AND estado = ANY($2)",
        )
        .bind(profesor_id)
        .bind(vec![
            EstadoProgramacionProfesor::Activo,
            EstadoProgramacionProfesor::Completado,
        ])
        .fetch_all(&self.pool)
        .await?;
        Ok(programaciones)
    }

    pub async fn crear_programacion_profesor(
        &self,
        datos: &CrearProgramacionProfesorPayload,
    ) -> Result<ProgramacionProfesor, AppError> {
        let programacion = sqlx::query_as::<_, ProgramacionProfesor>(
            r#"
            INSERT INTO programaciones_profesor
                (profesor_id, hora_inicio, hora_fin, dias_seleccionados, estado)
            VALUES ($1, $2, $3, $4, COALESCE($5, 'activo'))
            RETURNING *
            "#,
        )
        .bind(datos.profesor_id)
        .bind(&datos.hora_inicio)
        .bind(&datos.hora_fin)
        .bind(&datos.dias_seleccionados)
        .bind(datos.estado)
        .fetch_one(&self.pool)
        .await?;
        Ok(programacion)
    }

    pub async fn eliminar_programacion_profesor(&self, id: Uuid) -> Result<bool, AppError> {
        let resultado = sqlx::query("DELETE FROM programaciones_profesor WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(resultado.rows_affected() > 0)
    }

    // ----- Programaciones de clase (clases concretas) -----

    pub async fn listar_programaciones_clase(&self) -> Result<Vec<ProgramacionClase>, AppError> {
        let clases = sqlx::query_as::<_, ProgramacionClase>(
            "SELECT * FROM programaciones_clase ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(clases)
    }

    pub async fn buscar_programacion_clase(
        &self,
        id: Uuid,
    ) -> Result<Option<ProgramacionClase>, AppError> {
        let clase = sqlx::query_as::<_, ProgramacionClase>(
            "SELECT * FROM programaciones_clase WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(clase)
    }

    pub async fn clases_de_programaciones(
        &self,
        programacion_ids: &[Uuid],
    ) -> Result<Vec<ProgramacionClase>, AppError> {
        let clases = sqlx::query_as::<_, ProgramacionClase>(
            "SELECT * FROM programaciones_clase WHERE programacion_profesor_id = ANY($1)",
        )
        .bind(programacion_ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(clases)
    }

    pub async fn clases_de_venta(&self, venta_id: Uuid) -> Result<Vec<ProgramacionClase>, AppError> {
        let clases = sqlx::query_as::<_, ProgramacionClase>(
            "SELECT * FROM programaciones_clase WHERE venta_id = $1",
        )
        .bind(venta_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(clases)
    }

    pub async fn crear_programacion_clase(
        &self,
        datos: &CrearProgramacionClasePayload,
    ) -> Result<ProgramacionClase, AppError> {
        let clase = sqlx::query_as::<_, ProgramacionClase>(
            r#"
            INSERT INTO programaciones_clase
                (programacion_profesor_id, venta_id, dia, hora_inicio, hora_fin,
                 especialidad, estado)
            VALUES ($1, $2, $3, $4, $5, $6, COALESCE($7, 'programada'))
            RETURNING *
            "#,
        )
        .bind(datos.programacion_profesor_id)
        .bind(datos.venta_id)
        .bind(&datos.dia)
        .bind(&datos.hora_inicio)
        .bind(&datos.hora_fin)
        .bind(&datos.especialidad)
        .bind(datos.estado)
        .fetch_one(&self.pool)
        .await?;
        Ok(clase)
    }

    pub async fn eliminar_programacion_clase(&self, id: Uuid) -> Result<bool, AppError> {
        let resultado = sqlx::query("DELETE FROM programaciones_clase WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(resultado.rows_affected() > 0)
    }

    // ----- Asistencias -----

    pub async fn listar_asistencias(&self) -> Result<Vec<Asistencia>, AppError> {
        let asistencias = sqlx::query_as::<_, Asistencia>(
            "SELECT * FROM asistencias ORDER BY fecha DESC, created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(asistencias)
    }

    pub async fn buscar_asistencia(&self, id: Uuid) -> Result<Option<Asistencia>, AppError> {
        let asistencia = sqlx::query_as::<_, Asistencia>("SELECT * FROM asistencias WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(asistencia)
    }

    pub async fn asistencias_de_venta(&self, venta_id: Uuid) -> Result<Vec<Asistencia>, AppError> {
        let asistencias = sqlx::query_as::<_, Asistencia>(
            "SELECT * FROM asistencias WHERE venta_id = $1 ORDER BY fecha DESC",
        )
        .bind(venta_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(asistencias)
    }

    // Asistencias con la venta (y su beneficiario) y la clase resueltas,
    // con consultas por lote.
    pub async fn listar_asistencias_detalle(&self) -> Result<Vec<AsistenciaDetalle>, AppError> {
        let asistencias = self.listar_asistencias().await?;
        self.poblar_asistencias(asistencias).await
    }

    pub async fn buscar_asistencia_detalle(
        &self,
        id: Uuid,
    ) -> Result<Option<AsistenciaDetalle>, AppError> {
        let Some(asistencia) = self.buscar_asistencia(id).await? else {
            return Ok(None);
        };
        let mut detalles = self.poblar_asistencias(vec![asistencia]).await?;
        Ok(detalles.pop())
    }

    async fn poblar_asistencias(
        &self,
        asistencias: Vec<Asistencia>,
    ) -> Result<Vec<AsistenciaDetalle>, AppError> {
        if asistencias.is_empty() {
            return Ok(Vec::new());
        }

        let venta_ids: Vec<Uuid> = asistencias.iter().map(|a| a.venta_id).collect();
        let clase_ids: Vec<Uuid> = asistencias.iter().map(|a| a.programacion_clase_id).collect();

        let ventas: HashMap<Uuid, Venta> =
            sqlx::query_as::<_, Venta>("SELECT * FROM ventas WHERE id = ANY($1)")
                .bind(&venta_ids)
                .fetch_all(&self.pool)
                .await?
                .into_iter()
                .map(|v| (v.id, v))
                .collect();

        let beneficiario_ids: Vec<Uuid> = ventas.values().map(|v| v.beneficiario_id).collect();
        let beneficiarios: HashMap<Uuid, Beneficiario> =
            sqlx::query_as::<_, BeneficiarioRow>("SELECT * FROM beneficiarios WHERE id = ANY($1)")
                .bind(&beneficiario_ids)
                .fetch_all(&self.pool)
                .await?
                .into_iter()
                .map(|fila| {
                    let beneficiario = Beneficiario::from(fila);
                    (beneficiario.id, beneficiario)
                })
                .collect();

        let clases: HashMap<Uuid, ProgramacionClase> = sqlx::query_as::<_, ProgramacionClase>(
            "SELECT * FROM programaciones_clase WHERE id = ANY($1)",
        )
        .bind(&clase_ids)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(|c| (c.id, c))
        .collect();

        let detalles = asistencias
            .into_iter()
            .map(|asistencia| {
                let venta = ventas.get(&asistencia.venta_id).cloned().map(|venta| {
                    let beneficiario = beneficiarios.get(&venta.beneficiario_id).cloned();
                    VentaConBeneficiario { venta, beneficiario }
                });
                let programacion_clase = clases.get(&asistencia.programacion_clase_id).cloned();
                AsistenciaDetalle {
                    asistencia,
                    venta,
                    programacion_clase,
                }
            })
            .collect();

        Ok(detalles)
    }

    pub async fn crear_asistencia(
        &self,
        datos: &CrearAsistenciaPayload,
    ) -> Result<Asistencia, AppError> {
        let asistencia = sqlx::query_as::<_, Asistencia>(
            r#"
            INSERT INTO asistencias (venta_id, programacion_clase_id, fecha, estado)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(datos.venta_id)
        .bind(datos.programacion_clase_id)
        .bind(datos.fecha)
        .bind(datos.estado)
        .fetch_one(&self.pool)
        .await?;
        Ok(asistencia)
    }

    pub async fn cambiar_estado_asistencia(
        &self,
        id: Uuid,
        estado: EstadoAsistencia,
    ) -> Result<Option<Asistencia>, AppError> {
        let asistencia = sqlx::query_as::<_, Asistencia>(
            "UPDATE asistencias SET estado = $2, updated_at = now() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(estado)
        .fetch_optional(&self.pool)
        .await?;
        Ok(asistencia)
    }
}
