// src/db/curso_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::common::error::AppError;
use crate::models::commerce::{CrearCursoPayload, Curso};

#[derive(Clone)]
pub struct CursoRepository {
    pool: PgPool,
}

impl CursoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn listar(&self) -> Result<Vec<Curso>, AppError> {
        let cursos = sqlx::query_as::<_, Curso>("SELECT * FROM cursos ORDER BY nombre")
            .fetch_all(&self.pool)
            .await?;
        Ok(cursos)
    }

    pub async fn buscar_por_id(&self, id: Uuid) -> Result<Option<Curso>, AppError> {
        let curso = sqlx::query_as::<_, Curso>("SELECT * FROM cursos WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(curso)
    }

    pub async fn crear(&self, datos: &CrearCursoPayload) -> Result<Curso, AppError> {
        let curso = sqlx::query_as::<_, Curso>(
            r#"
            INSERT INTO cursos (nombre, descripcion, estado)
            VALUES ($1, $2, COALESCE($3, TRUE))
            RETURNING *
            "#,
        )
        .bind(&datos.nombre)
        .bind(datos.descripcion.as_deref())
        .bind(datos.estado)
        .fetch_one(&self.pool)
        .await?;
        Ok(curso)
    }
}
