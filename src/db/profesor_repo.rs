// src/db/profesor_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::common::error::AppError;
use crate::models::profesores::{
    ActualizarProfesorPayload, CrearProfesorPayload, EstadoProfesor, Profesor,
};

#[derive(Clone)]
pub struct ProfesorRepository {
    pool: PgPool,
}

impl ProfesorRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn listar(&self) -> Result<Vec<Profesor>, AppError> {
        let profesores =
            sqlx::query_as::<_, Profesor>("SELECT * FROM profesores ORDER BY nombres, apellidos")
                .fetch_all(&self.pool)
                .await?;
        Ok(profesores)
    }

    pub async fn buscar_por_id(&self, id: Uuid) -> Result<Option<Profesor>, AppError> {
        let profesor = sqlx::query_as::<_, Profesor>("SELECT * FROM profesores WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(profesor)
    }

    pub async fn buscar_por_usuario(&self, usuario_id: Uuid) -> Result<Option<Profesor>, AppError> {
        let profesor =
            sqlx::query_as::<_, Profesor>("SELECT * FROM profesores WHERE usuario_id = $1")
                .bind(usuario_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(profesor)
    }

    // Solo profesores activos que dictan la especialidad, ordenados por nombre.
    pub async fn listar_por_especialidad(
        &self,
        especialidad: &str,
    ) -> Result<Vec<Profesor>, AppError> {
        let profesores = sqlx::query_as::<_, Profesor>(
            r#"
            SELECT * FROM profesores
            WHERE $1 = ANY(especialidades) AND estado = $2
            ORDER BY nombres, apellidos
            "#,
        )
        .bind(especialidad)
        .bind(EstadoProfesor::Activo)
        .fetch_all(&self.pool)
        .await?;
        Ok(profesores)
    }

    pub async fn listar_por_estado(
        &self,
        estado: EstadoProfesor,
    ) -> Result<Vec<Profesor>, AppError> {
        let profesores = sqlx::query_as::<_, Profesor>(
            "SELECT * FROM profesores WHERE estado = $1 ORDER BY created_at DESC",
        )
        .bind(estado)
        .fetch_all(&self.pool)
        .await?;
        Ok(profesores)
    }

    pub async fn existe_identificacion_o_correo(
        &self,
        identificacion: &str,
        correo: &str,
        excluir_id: Option<Uuid>,
    ) -> Result<bool, AppError> {
        let (existe,): (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM profesores
                WHERE (identificacion = $1 OR lower(correo) = lower($2))
                  AND ($3::uuid IS NULL OR id <> $3)
            )
            "#,
        )
        .bind(identificacion)
        .bind(correo)
        .bind(excluir_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(existe)
    }

    pub async fn crear<'e, E>(
        &self,
        ejecutor: E,
        usuario_id: Uuid,
        datos: &CrearProfesorPayload,
    ) -> Result<Profesor, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let profesor = sqlx::query_as::<_, Profesor>(
            r#"
            INSERT INTO profesores
                (usuario_id, nombres, apellidos, tipo_documento, identificacion,
                 telefono, correo, direccion, especialidades, estado)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, COALESCE($10, 'Activo'))
            RETURNING *
            "#,
        )
        .bind(usuario_id)
        .bind(&datos.nombres)
        .bind(&datos.apellidos)
        .bind(datos.tipo_documento)
        .bind(&datos.identificacion)
        .bind(&datos.telefono)
        .bind(&datos.correo)
        .bind(datos.direccion.as_deref())
        .bind(&datos.especialidades)
        .bind(datos.estado)
        .fetch_one(ejecutor)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::Duplicado {
                        mensaje: "Ya existe un profesor con esa identificación o correo".into(),
                        detalles: None,
                    };
                }
            }
            e.into()
        })?;
        Ok(profesor)
    }

    pub async fn actualizar(
        &self,
        id: Uuid,
        cambios: &ActualizarProfesorPayload,
    ) -> Result<Option<Profesor>, AppError> {
        let profesor = sqlx::query_as::<_, Profesor>(
            r#"
            UPDATE profesores SET
                usuario_id = COALESCE($2, usuario_id),
                nombres = COALESCE($3, nombres),
                apellidos = COALESCE($4, apellidos),
                tipo_documento = COALESCE($5, tipo_documento),
                telefono = COALESCE($6, telefono),
                correo = COALESCE($7, correo),
                direccion = COALESCE($8, direccion),
                especialidades = COALESCE($9, especialidades),
                estado = COALESCE($10, estado),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(cambios.usuario_id)
        .bind(cambios.nombres.as_deref())
        .bind(cambios.apellidos.as_deref())
        .bind(cambios.tipo_documento)
        .bind(cambios.telefono.as_deref())
        .bind(cambios.correo.as_deref())
        .bind(cambios.direccion.as_deref())
        .bind(cambios.especialidades.as_deref())
        .bind(cambios.estado)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::Duplicado {
                        mensaje: "Ya existe un profesor con esa identificación o correo".into(),
                        detalles: None,
                    };
                }
            }
            AppError::from(e)
        })?;
        Ok(profesor)
    }

    pub async fn cambiar_estado(
        &self,
        id: Uuid,
        estado: EstadoProfesor,
    ) -> Result<Option<Profesor>, AppError> {
        let profesor = sqlx::query_as::<_, Profesor>(
            "UPDATE profesores SET estado = $2, updated_at = now() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(estado)
        .fetch_optional(&self.pool)
        .await?;
        Ok(profesor)
    }

    pub async fn eliminar(&self, id: Uuid) -> Result<bool, AppError> {
        let resultado = sqlx::query("DELETE FROM profesores WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(resultado.rows_affected() > 0)
    }
}
