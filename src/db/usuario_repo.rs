// src/db/usuario_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::common::error::AppError;
use crate::models::auth::{TipoDocumento, Usuario};

const COLUMNAS: &str = "id, nombre, apellido, tipo_de_documento, documento, correo, \
                        contrasena_hash, estado, created_at, updated_at";

// Repositorio de usuarios: todas las interacciones con la tabla `usuarios`.
#[derive(Clone)]
pub struct UsuarioRepository {
    pool: PgPool,
}

impl UsuarioRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn listar(&self) -> Result<Vec<Usuario>, AppError> {
        let usuarios = sqlx::query_as::<_, Usuario>(&format!(
            "SELECT {COLUMNAS} FROM usuarios ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(usuarios)
    }

    pub async fn buscar_por_id(&self, id: Uuid) -> Result<Option<Usuario>, AppError> {
        let usuario = sqlx::query_as::<_, Usuario>(&format!(
            "SELECT {COLUMNAS} FROM usuarios WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(usuario)
    }

    pub async fn buscar_por_correo(&self, correo: &str) -> Result<Option<Usuario>, AppError> {
        let usuario = sqlx::query_as::<_, Usuario>(&format!(
            "SELECT {COLUMNAS} FROM usuarios WHERE correo = $1"
        ))
        .bind(correo)
        .fetch_optional(&self.pool)
        .await?;
        Ok(usuario)
    }

    // Duplicado de correo o documento, excluyendo opcionalmente un id
    // (para las actualizaciones).
    pub async fn existe_correo_o_documento(
        &self,
        correo: &str,
        documento: &str,
        excluir: Option<Uuid>,
    ) -> Result<bool, AppError> {
        let (existe,): (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM usuarios
                WHERE (correo = $1 OR documento = $2)
                  AND ($3::uuid IS NULL OR id <> $3)
            )
            "#,
        )
        .bind(correo)
        .bind(documento)
        .bind(excluir)
        .fetch_one(&self.pool)
        .await?;
        Ok(existe)
    }

    pub async fn existe_correo(
        &self,
        correo: &str,
        excluir: Option<Uuid>,
    ) -> Result<bool, AppError> {
        let (existe,): (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM usuarios
                WHERE correo = $1 AND ($2::uuid IS NULL OR id <> $2)
            )
            "#,
        )
        .bind(correo)
        .bind(excluir)
        .fetch_one(&self.pool)
        .await?;
        Ok(existe)
    }

    pub async fn existe_documento(
        &self,
        documento: &str,
        excluir: Option<Uuid>,
    ) -> Result<bool, AppError> {
        let (existe,): (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM usuarios
                WHERE documento = $1 AND ($2::uuid IS NULL OR id <> $2)
            )
            "#,
        )
        .bind(documento)
        .bind(excluir)
        .fetch_one(&self.pool)
        .await?;
        Ok(existe)
    }

    // Crea un usuario. Acepta un executor para poder participar en
    // transacciones (p. ej. creación de profesor + usuario).
    pub async fn crear<'e, E>(
        &self,
        executor: E,
        nombre: &str,
        apellido: &str,
        tipo_de_documento: TipoDocumento,
        documento: &str,
        correo: &str,
        contrasena_hash: &str,
        estado: bool,
    ) -> Result<Usuario, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let usuario = sqlx::query_as::<_, Usuario>(&format!(
            r#"
            INSERT INTO usuarios
                (nombre, apellido, tipo_de_documento, documento, correo, contrasena_hash, estado)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {COLUMNAS}
            "#
        ))
        .bind(nombre)
        .bind(apellido)
        .bind(tipo_de_documento)
        .bind(documento)
        .bind(correo)
        .bind(contrasena_hash)
        .bind(estado)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::Duplicado {
                        mensaje: "Ya existe un usuario con este correo o documento".into(),
                        detalles: None,
                    };
                }
            }
            e.into()
        })?;

        Ok(usuario)
    }

    pub async fn actualizar(
        &self,
        id: Uuid,
        nombre: &str,
        apellido: &str,
        tipo_de_documento: TipoDocumento,
        documento: &str,
        correo: &str,
        contrasena_hash: &str,
        estado: bool,
    ) -> Result<Usuario, AppError> {
        let usuario = sqlx::query_as::<_, Usuario>(&format!(
            r#"
            UPDATE usuarios SET
                nombre = $2, apellido = $3, tipo_de_documento = $4, documento = $5,
                correo = $6, contrasena_hash = $7, estado = $8, updated_at = now()
            WHERE id = $1
            RETURNING {COLUMNAS}
            "#
        ))
        .bind(id)
        .bind(nombre)
        .bind(apellido)
        .bind(tipo_de_documento)
        .bind(documento)
        .bind(correo)
        .bind(contrasena_hash)
        .bind(estado)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::NotFound("Usuario"))?;

        Ok(usuario)
    }

    // Sincroniza los datos básicos de un usuario existente (alta de profesor
    // con usuario reutilizado).
    pub async fn sincronizar_datos<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        nombre: &str,
        apellido: &str,
        tipo_de_documento: TipoDocumento,
        documento: &str,
        correo: &str,
        estado: Option<bool>,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            UPDATE usuarios SET
                nombre = $2, apellido = $3, tipo_de_documento = $4, documento = $5,
                correo = $6, estado = COALESCE($7, estado), updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(nombre)
        .bind(apellido)
        .bind(tipo_de_documento)
        .bind(documento)
        .bind(correo)
        .bind(estado)
        .execute(executor)
        .await?;

        Ok(())
    }

    pub async fn eliminar<'e, E>(&self, executor: E, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let resultado = sqlx::query("DELETE FROM usuarios WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(resultado.rows_affected() > 0)
    }
}
