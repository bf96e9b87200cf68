// src/services/usuario_service.rs

use std::sync::LazyLock;

use bcrypt::hash;
use regex::Regex;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::{AppError, RegistroAsociado},
    db::{
        BeneficiarioRepository, ClienteRepository, ProfesorRepository, ProgramacionRepository,
        RolRepository, UsuarioRepository, VentaRepository,
    },
    models::auth::{ActualizarUsuarioPayload, CrearUsuarioPayload, Usuario},
};

// Solo ASCII: el sistema rechaza correos con caracteres fuera de este
// alfabeto aunque sean direcciones válidas en el estándar.
static RE_CORREO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}$").expect("regex de correo")
});

static RE_DOCUMENTO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{6,15}$").expect("regex de documento"));

pub fn validar_correo(correo: &str) -> Result<(), AppError> {
    if RE_CORREO.is_match(correo) {
        Ok(())
    } else {
        Err(AppError::BadRequest(
            "El formato del correo electrónico no es válido".into(),
        ))
    }
}

pub fn validar_documento(documento: &str) -> Result<(), AppError> {
    if RE_DOCUMENTO.is_match(documento) {
        Ok(())
    } else {
        Err(AppError::BadRequest(
            "El documento debe contener solo números, entre 6 y 15 dígitos".into(),
        ))
    }
}

pub async fn hashear_contrasena(contrasena: &str) -> Result<String, AppError> {
    let contrasena = contrasena.to_owned();
    let hash = tokio::task::spawn_blocking(move || hash(&contrasena, bcrypt::DEFAULT_COST))
        .await
        .map_err(|e| anyhow::anyhow!("Falló la tarea de hashing: {e}"))??;
    Ok(hash)
}

#[derive(Clone)]
pub struct UsuarioService {
    usuario_repo: UsuarioRepository,
    rol_repo: RolRepository,
    cliente_repo: ClienteRepository,
    beneficiario_repo: BeneficiarioRepository,
    venta_repo: VentaRepository,
    profesor_repo: ProfesorRepository,
    programacion_repo: ProgramacionRepository,
    pool: PgPool,
}

impl UsuarioService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        usuario_repo: UsuarioRepository,
        rol_repo: RolRepository,
        cliente_repo: ClienteRepository,
        beneficiario_repo: BeneficiarioRepository,
        venta_repo: VentaRepository,
        profesor_repo: ProfesorRepository,
        programacion_repo: ProgramacionRepository,
        pool: PgPool,
    ) -> Self {
        Self {
            usuario_repo,
            rol_repo,
            cliente_repo,
            beneficiario_repo,
            venta_repo,
            profesor_repo,
            programacion_repo,
            pool,
        }
    }

    pub async fn crear(&self, datos: &CrearUsuarioPayload) -> Result<Usuario, AppError> {
        validar_correo(&datos.correo)?;
        validar_documento(&datos.documento)?;

        let correo = datos.correo.to_lowercase();
        if self
            .usuario_repo
            .existe_correo_o_documento(&correo, &datos.documento, None)
            .await?
        {
            return Err(AppError::Duplicado {
                mensaje: "Ya existe un usuario con este correo o documento".into(),
                detalles: None,
            });
        }

        let hash = hashear_contrasena(&datos.contrasena).await?;

        let usuario = self
            .usuario_repo
            .crear(
                &self.pool,
                &datos.nombre,
                &datos.apellido,
                datos.tipo_de_documento,
                &datos.documento,
                &correo,
                &hash,
                datos.estado.unwrap_or(true),
            )
            .await?;

        Ok(usuario)
    }

    pub async fn actualizar(
        &self,
        id: Uuid,
        cambios: &ActualizarUsuarioPayload,
    ) -> Result<Usuario, AppError> {
        let actual = self
            .usuario_repo
            .buscar_por_id(id)
            .await?
            .ok_or(AppError::NotFound("Usuario"))?;

        if let Some(correo) = cambios.correo.as_deref() {
            validar_correo(correo)?;
            if self
                .usuario_repo
                .existe_correo(&correo.to_lowercase(), Some(id))
                .await?
            {
                return Err(AppError::Duplicado {
                    mensaje: "Ya existe un usuario con este correo".into(),
                    detalles: None,
                });
            }
        }

        if let Some(documento) = cambios.documento.as_deref() {
            validar_documento(documento)?;
            if self.usuario_repo.existe_documento(documento, Some(id)).await? {
                return Err(AppError::Duplicado {
                    mensaje: "Ya existe un usuario con este documento".into(),
                    detalles: None,
                });
            }
        }

        // Solo se re-hashea si llega una contraseña nueva.
        let contrasena_hash = match cambios.contrasena.as_deref() {
            Some(contrasena) => hashear_contrasena(contrasena).await?,
            None => actual.contrasena_hash.clone(),
        };

        let usuario = self
            .usuario_repo
            .actualizar(
                id,
                cambios.nombre.as_deref().unwrap_or(&actual.nombre),
                cambios.apellido.as_deref().unwrap_or(&actual.apellido),
                cambios.tipo_de_documento.unwrap_or(actual.tipo_de_documento),
                cambios.documento.as_deref().unwrap_or(&actual.documento),
                &cambios
                    .correo
                    .as_deref()
                    .map(str::to_lowercase)
                    .unwrap_or_else(|| actual.correo.clone()),
                &contrasena_hash,
                cambios.estado.unwrap_or(actual.estado),
            )
            .await?;

        Ok(usuario)
    }

    // Elimina un usuario tras verificar que ningún registro dependa de él.
    // La verificación cambia según los roles que el usuario tenga.
    pub async fn eliminar(&self, id: Uuid) -> Result<Usuario, AppError> {
        let usuario = self
            .usuario_repo
            .buscar_por_id(id)
            .await?
            .ok_or(AppError::NotFound("Usuario"))?;

        let relaciones = self.rol_repo.relaciones_de_usuario(id).await?;
        let roles: Vec<String> = relaciones
            .iter()
            .map(|r| r.rol.nombre.to_lowercase())
            .collect();

        if roles.iter().any(|r| r == "cliente") {
            self.verificar_cliente(&usuario).await?;
        }
        if roles.iter().any(|r| r == "beneficiario") {
            self.verificar_beneficiario(&usuario, &relaciones).await?;
        }
        if roles.iter().any(|r| r == "profesor") {
            self.verificar_profesor(id).await?;
        }

        let mut tx = self.pool.begin().await?;

        self.rol_repo
            .eliminar_relaciones_de_usuario(&mut *tx, id)
            .await?;
        self.usuario_repo.eliminar(&mut *tx, id).await?;

        // El registro espejo de la colección de clientes se va con el usuario.
        if roles.iter().any(|r| r == "cliente") {
            self.cliente_repo
                .eliminar_por_identidad(&mut *tx, &usuario.documento, &usuario.nombre, &usuario.apellido)
                .await?;
        }

        tx.commit().await?;

        Ok(usuario)
    }

    async fn verificar_cliente(&self, usuario: &Usuario) -> Result<(), AppError> {
        let Some(cliente) = self
            .cliente_repo
            .buscar_por_documento(&usuario.documento)
            .await?
        else {
            return Ok(());
        };

        let asociados = self.beneficiario_repo.asociados_a(cliente.id).await?;
        if asociados.is_empty() {
            return Ok(());
        }

        Err(AppError::IntegridadReferencial {
            mensaje: "No se puede eliminar el usuario porque tiene beneficiarios asociados".into(),
            detalles: format!(
                "El usuario está asociado a {} beneficiario(s)",
                asociados.len()
            ),
            registros: asociados
                .into_iter()
                .map(|b| RegistroAsociado {
                    id: b.id,
                    descripcion: format!("{} {} ({})", b.nombre, b.apellido, b.numero_de_documento),
                })
                .collect(),
        })
    }

    async fn verificar_beneficiario(
        &self,
        usuario: &Usuario,
        relaciones: &[crate::models::rbac::UsuarioHasRolDetalle],
    ) -> Result<(), AppError> {
        // El beneficiario del usuario: por su relación de rol y, en su
        // defecto, por documento.
        let mut beneficiario = None;
        for relacion in relaciones {
            if relacion.rol.nombre.to_lowercase() == "beneficiario" {
                beneficiario = self
                    .beneficiario_repo
                    .buscar_por_usuario_rol(relacion.id)
                    .await?;
                break;
            }
        }
        if beneficiario.is_none() {
            beneficiario = self
                .beneficiario_repo
                .buscar_por_documento(&usuario.documento)
                .await?;
        }
        let Some(beneficiario) = beneficiario else {
            return Ok(());
        };

        let ventas = self
            .venta_repo
            .listar_por_beneficiarios(&[beneficiario.id])
            .await?;
        if !ventas.is_empty() {
            return Err(AppError::IntegridadReferencial {
                mensaje: "No se puede eliminar el usuario porque está asociado a ventas/matrículas"
                    .into(),
                detalles: format!("El usuario está asociado a {} venta(s)", ventas.len()),
                registros: ventas
                    .into_iter()
                    .map(|v| RegistroAsociado {
                        id: v.id,
                        descripcion: format!("Venta {}", v.codigo_venta),
                    })
                    .collect(),
            });
        }

        Ok(())
    }

    async fn verificar_profesor(&self, usuario_id: Uuid) -> Result<(), AppError> {
        let Some(profesor) = self.profesor_repo.buscar_por_usuario(usuario_id).await? else {
            return Ok(());
        };

        let programaciones = self
            .programacion_repo
            .programaciones_vivas_de_profesor(profesor.id)
            .await?;
        if !programaciones.is_empty() {
            return Err(AppError::IntegridadReferencial {
                mensaje:
                    "No se puede eliminar el usuario porque tiene programaciones de profesor asociadas"
                        .into(),
                detalles: format!(
                    "El profesor está asociado a {} programación(es) de profesor",
                    programaciones.len()
                ),
                registros: programaciones
                    .into_iter()
                    .map(|p| RegistroAsociado {
                        id: p.id,
                        descripcion: format!(
                            "{} a {} ({})",
                            p.hora_inicio,
                            p.hora_fin,
                            p.dias_seleccionados.join(", ")
                        ),
                    })
                    .collect(),
            });
        }

        // Clases colgadas de cualquier franja del profesor.
        let todas = self
            .programacion_repo
            .programaciones_de_profesor(profesor.id)
            .await?;
        let ids: Vec<Uuid> = todas.iter().map(|p| p.id).collect();
        if ids.is_empty() {
            return Ok(());
        }

        let clases = self.programacion_repo.clases_de_programaciones(&ids).await?;
        if !clases.is_empty() {
            return Err(AppError::IntegridadReferencial {
                mensaje:
                    "No se puede eliminar el usuario porque tiene programaciones de clase asociadas como profesor"
                        .into(),
                detalles: format!(
                    "El profesor está asociado a {} programación(es) de clase",
                    clases.len()
                ),
                registros: clases
                    .into_iter()
                    .map(|c| RegistroAsociado {
                        id: c.id,
                        descripcion: format!("{} {} - {}", c.dia, c.hora_inicio, c.hora_fin),
                    })
                    .collect(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acepta_correos_ascii_validos() {
        assert!(validar_correo("maria@correo.com").is_ok());
        assert!(validar_correo("juan.perez+1@sub.dominio.co").is_ok());
    }

    #[test]
    fn rechaza_correos_malformados_o_no_ascii() {
        assert!(validar_correo("sin-arroba.com").is_err());
        assert!(validar_correo("a@b").is_err());
        // Direcciones con tildes o eñes quedan fuera del alfabeto aceptado.
        assert!(validar_correo("maría@correo.com").is_err());
        assert!(validar_correo("test@dominio.españa").is_err());
    }

    #[test]
    fn documento_solo_digitos_entre_6_y_15() {
        assert!(validar_documento("123456").is_ok());
        assert!(validar_documento("123456789012345").is_ok());
        assert!(validar_documento("12345").is_err());
        assert!(validar_documento("1234567890123456").is_err());
        assert!(validar_documento("12345A").is_err());
        assert!(validar_documento("").is_err());
    }
}
