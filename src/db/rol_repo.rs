// src/db/rol_repo.rs

use std::collections::HashMap;

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::common::error::AppError;
use crate::models::auth::Usuario;
use crate::models::rbac::{Rol, UsuarioHasRol, UsuarioHasRolDetalle};

// Repositorio de roles, asignaciones usuario-rol y módulos otorgados.
#[derive(Clone)]
pub struct RolRepository {
    pool: PgPool,
}

impl RolRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // --- Roles ---

    pub async fn listar_roles(&self) -> Result<Vec<Rol>, AppError> {
        let roles = sqlx::query_as::<_, Rol>("SELECT * FROM roles ORDER BY nombre")
            .fetch_all(&self.pool)
            .await?;
        Ok(roles)
    }

    pub async fn buscar_rol(&self, id: Uuid) -> Result<Option<Rol>, AppError> {
        let rol = sqlx::query_as::<_, Rol>("SELECT * FROM roles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(rol)
    }

    pub async fn buscar_rol_por_nombre(&self, nombre: &str) -> Result<Option<Rol>, AppError> {
        let rol = sqlx::query_as::<_, Rol>("SELECT * FROM roles WHERE lower(nombre) = lower($1)")
            .bind(nombre)
            .fetch_optional(&self.pool)
            .await?;
        Ok(rol)
    }

    // Módulos del backend otorgados a un rol (insumo del mapeador de permisos).
    pub async fn modulos_de_rol(&self, rol_id: Uuid) -> Result<Vec<String>, AppError> {
        let filas: Vec<(String,)> =
            sqlx::query_as("SELECT modulo FROM rol_permisos WHERE rol_id = $1 ORDER BY modulo")
                .bind(rol_id)
                .fetch_all(&self.pool)
                .await?;
        Ok(filas.into_iter().map(|(modulo,)| modulo).collect())
    }

    // --- Asignaciones usuario-rol ---

    pub async fn listar_relaciones(&self) -> Result<Vec<UsuarioHasRolDetalle>, AppError> {
        let relaciones = sqlx::query_as::<_, UsuarioHasRol>(
            "SELECT * FROM usuarios_has_rol ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        self.poblar_relaciones(relaciones).await
    }

    pub async fn buscar_relacion(&self, id: Uuid) -> Result<Option<UsuarioHasRol>, AppError> {
        let relacion =
            sqlx::query_as::<_, UsuarioHasRol>("SELECT * FROM usuarios_has_rol WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(relacion)
    }

    pub async fn buscar_relacion_detalle(
        &self,
        id: Uuid,
    ) -> Result<Option<UsuarioHasRolDetalle>, AppError> {
        match self.buscar_relacion(id).await? {
            Some(relacion) => {
                let mut detalle = self.poblar_relaciones(vec![relacion]).await?;
                Ok(detalle.pop())
            }
            None => Ok(None),
        }
    }

    pub async fn relaciones_de_usuario(
        &self,
        usuario_id: Uuid,
    ) -> Result<Vec<UsuarioHasRolDetalle>, AppError> {
        let relaciones = sqlx::query_as::<_, UsuarioHasRol>(
            "SELECT * FROM usuarios_has_rol WHERE usuario_id = $1 ORDER BY created_at",
        )
        .bind(usuario_id)
        .fetch_all(&self.pool)
        .await?;
        self.poblar_relaciones(relaciones).await
    }

    // Roles activos (relación y rol con estado = true) de un usuario.
    pub async fn roles_activos_de_usuario(&self, usuario_id: Uuid) -> Result<Vec<Rol>, AppError> {
        let roles = sqlx::query_as::<_, Rol>(
            r#"
            SELECT r.*
            FROM usuarios_has_rol ur
            JOIN roles r ON r.id = ur.rol_id
            WHERE ur.usuario_id = $1 AND ur.estado = TRUE AND r.estado = TRUE
            ORDER BY ur.created_at
            "#,
        )
        .bind(usuario_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(roles)
    }

    pub async fn buscar_relacion_activa(
        &self,
        usuario_id: Uuid,
        rol_id: Uuid,
    ) -> Result<Option<UsuarioHasRol>, AppError> {
        let relacion = sqlx::query_as::<_, UsuarioHasRol>(
            r#"
            SELECT * FROM usuarios_has_rol
            WHERE usuario_id = $1 AND rol_id = $2 AND estado = TRUE
            "#,
        )
        .bind(usuario_id)
        .bind(rol_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(relacion)
    }

    pub async fn crear_relacion<'e, E>(
        &self,
        executor: E,
        usuario_id: Uuid,
        rol_id: Uuid,
    ) -> Result<UsuarioHasRol, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let relacion = sqlx::query_as::<_, UsuarioHasRol>(
            r#"
            INSERT INTO usuarios_has_rol (usuario_id, rol_id)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(usuario_id)
        .bind(rol_id)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::Duplicado {
                        mensaje: "El usuario ya tiene asignado este rol".into(),
                        detalles: None,
                    };
                }
            }
            e.into()
        })?;

        Ok(relacion)
    }

    pub async fn actualizar_relacion(
        &self,
        id: Uuid,
        rol_id: Option<Uuid>,
        estado: Option<bool>,
    ) -> Result<Option<UsuarioHasRol>, AppError> {
        let relacion = sqlx::query_as::<_, UsuarioHasRol>(
            r#"
            UPDATE usuarios_has_rol SET
                rol_id = COALESCE($2, rol_id),
                estado = COALESCE($3, estado),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(rol_id)
        .bind(estado)
        .fetch_optional(&self.pool)
        .await?;
        Ok(relacion)
    }

    pub async fn eliminar_relacion(&self, id: Uuid) -> Result<bool, AppError> {
        let resultado = sqlx::query("DELETE FROM usuarios_has_rol WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(resultado.rows_affected() > 0)
    }

    // Borrado masivo de las relaciones de un usuario. Devuelve cuántas cayeron.
    pub async fn eliminar_relaciones_de_usuario<'e, E>(
        &self,
        executor: E,
        usuario_id: Uuid,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let resultado = sqlx::query("DELETE FROM usuarios_has_rol WHERE usuario_id = $1")
            .bind(usuario_id)
            .execute(executor)
            .await?;
        Ok(resultado.rows_affected())
    }

    // Resuelve usuario y rol de cada relación (el `populate` de Mongoose,
    // hecho con dos consultas por lote).
    async fn poblar_relaciones(
        &self,
        relaciones: Vec<UsuarioHasRol>,
    ) -> Result<Vec<UsuarioHasRolDetalle>, AppError> {
        if relaciones.is_empty() {
            return Ok(Vec::new());
        }

        let usuario_ids: Vec<Uuid> = relaciones.iter().map(|r| r.usuario_id).collect();
        let rol_ids: Vec<Uuid> = relaciones.iter().map(|r| r.rol_id).collect();

        let usuarios: HashMap<Uuid, Usuario> =
            sqlx::query_as::<_, Usuario>("SELECT * FROM usuarios WHERE id = ANY($1)")
                .bind(&usuario_ids)
                .fetch_all(&self.pool)
                .await?
                .into_iter()
                .map(|u| (u.id, u))
                .collect();

        let roles: HashMap<Uuid, Rol> =
            sqlx::query_as::<_, Rol>("SELECT * FROM roles WHERE id = ANY($1)")
                .bind(&rol_ids)
                .fetch_all(&self.pool)
                .await?
                .into_iter()
                .map(|r| (r.id, r))
                .collect();

        let detalles = relaciones
            .into_iter()
            .filter_map(|relacion| {
                let usuario = usuarios.get(&relacion.usuario_id).cloned()?;
                let rol = roles.get(&relacion.rol_id).cloned()?;
                Some(UsuarioHasRolDetalle::armar(relacion, usuario, rol))
            })
            .collect();

        Ok(detalles)
    }
}
