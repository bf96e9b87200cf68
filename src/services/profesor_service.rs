// src/services/profesor_service.rs

use std::str::FromStr;

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::{AppError, RegistroAsociado},
    db::{ProfesorRepository, ProgramacionRepository, RolRepository, UsuarioRepository},
    models::profesores::{
        ActualizarProfesorPayload, CrearProfesorPayload, EstadoProfesor, Profesor,
    },
    services::usuario_service::{hashear_contrasena, validar_correo, validar_documento},
};

// Entre 1 y 10 especialidades, cada una de 2 a 100 caracteres.
pub fn validar_especialidades(especialidades: &[String]) -> Result<(), AppError> {
    if especialidades.is_empty() || especialidades.len() > 10 {
        return Err(AppError::Invalido {
            mensaje: "Especialidades inválidas".into(),
            detalles: "Debe proporcionar entre 1 y 10 especialidades en formato array".into(),
        });
    }
    if !especialidades
        .iter()
        .all(|e| (2..=100).contains(&e.trim().chars().count()))
    {
        return Err(AppError::Invalido {
            mensaje: "Especialidades inválidas".into(),
            detalles: "Cada especialidad debe tener entre 2 y 100 caracteres".into(),
        });
    }
    Ok(())
}

pub fn parsear_estado(estado: &str) -> Result<EstadoProfesor, AppError> {
    EstadoProfesor::from_str(estado).map_err(|_| AppError::Invalido {
        mensaje: "Estado inválido".into(),
        detalles: "El estado debe ser: Activo, Inactivo, Pendiente o Suspendido".into(),
    })
}

#[derive(Clone)]
pub struct ProfesorService {
    profesor_repo: ProfesorRepository,
    usuario_repo: UsuarioRepository,
    rol_repo: RolRepository,
    programacion_repo: ProgramacionRepository,
    pool: PgPool,
}

impl ProfesorService {
    pub fn new(
        profesor_repo: ProfesorRepository,
        usuario_repo: UsuarioRepository,
        rol_repo: RolRepository,
        programacion_repo: ProgramacionRepository,
        pool: PgPool,
    ) -> Self {
        Self {
            profesor_repo,
            usuario_repo,
            rol_repo,
            programacion_repo,
            pool,
        }
    }

    // Alta de profesor. Si llega `usuarioId` se reutiliza (y se sincronizan
    // sus datos básicos); si no, se crea el usuario vinculado con rol
    // profesor en la misma transacción.
    pub async fn crear(&self, mut datos: CrearProfesorPayload) -> Result<Profesor, AppError> {
        datos.nombres = datos.nombres.trim().to_owned();
        datos.apellidos = datos.apellidos.trim().to_owned();
        datos.identificacion = datos.identificacion.trim().to_owned();
        datos.telefono = datos.telefono.trim().to_owned();
        datos.correo = datos.correo.trim().to_lowercase();
        datos.direccion = datos
            .direccion
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_owned);
        datos.especialidades = datos
            .especialidades
            .iter()
            .map(|e| e.trim().to_owned())
            .collect();

        validar_correo(&datos.correo)?;
        validar_documento(&datos.identificacion)?;
        validar_especialidades(&datos.especialidades)?;

        if datos.usuario_id.is_none() && datos.contrasena.is_none() {
            return Err(AppError::Invalido {
                mensaje: "Campos obligatorios faltantes".into(),
                detalles: "Si no se proporciona usuarioId, la contraseña es obligatoria".into(),
            });
        }

        if self
            .profesor_repo
            .existe_identificacion_o_correo(&datos.identificacion, &datos.correo, None)
            .await?
        {
            return Err(AppError::Duplicado {
                mensaje: "Profesor duplicado".into(),
                detalles: Some(
                    "Ya existe un profesor con esa identificación o correo".into(),
                ),
            });
        }

        let mut tx = self.pool.begin().await?;

        let usuario_id = match datos.usuario_id {
            Some(usuario_id) => {
                let usuario = self
                    .usuario_repo
                    .buscar_por_id(usuario_id)
                    .await?
                    .ok_or(AppError::NotFound("Usuario"))?;

                if usuario.correo != datos.correo
                    && self
                        .usuario_repo
                        .existe_correo(&datos.correo, Some(usuario_id))
                        .await?
                {
                    return Err(AppError::Duplicado {
                        mensaje: "Correo duplicado".into(),
                        detalles: Some(format!(
                            "Ya existe un usuario con el correo \"{}\"",
                            datos.correo
                        )),
                    });
                }

                self.usuario_repo
                    .sincronizar_datos(
                        &mut *tx,
                        usuario_id,
                        &datos.nombres,
                        &datos.apellidos,
                        datos.tipo_documento,
                        &datos.identificacion,
                        &datos.correo,
                        None,
                    )
                    .await?;

                usuario_id
            }

            None => {
                if self
                    .usuario_repo
                    .existe_correo_o_documento(&datos.correo, &datos.identificacion, None)
                    .await?
                {
                    return Err(AppError::Duplicado {
                        mensaje: "Ya existe un usuario con este correo o documento".into(),
                        detalles: None,
                    });
                }

                let contrasena = datos.contrasena.as_deref().unwrap_or_default();
                let hash = hashear_contrasena(contrasena).await?;

                let usuario = self
                    .usuario_repo
                    .crear(
                        &mut *tx,
                        &datos.nombres,
                        &datos.apellidos,
                        datos.tipo_documento,
                        &datos.identificacion,
                        &datos.correo,
                        &hash,
                        true,
                    )
                    .await?;

                if let Some(rol) = self.rol_repo.buscar_rol_por_nombre("profesor").await? {
                    self.rol_repo
                        .crear_relacion(&mut *tx, usuario.id, rol.id)
                        .await?;
                }

                usuario.id
            }
        };

        let profesor = self.profesor_repo.crear(&mut *tx, usuario_id, &datos).await?;
        tx.commit().await?;

        Ok(profesor)
    }

    pub async fn actualizar(
        &self,
        id: Uuid,
        cambios: &ActualizarProfesorPayload,
    ) -> Result<Profesor, AppError> {
        let actual = self
            .profesor_repo
            .buscar_por_id(id)
            .await?
            .ok_or(AppError::NotFound("Profesor"))?;

        if let Some(especialidades) = cambios.especialidades.as_deref() {
            validar_especialidades(especialidades)?;
        }

        if let Some(correo) = cambios.correo.as_deref() {
            validar_correo(correo)?;
            if self
                .profesor_repo
                .existe_identificacion_o_correo(&actual.identificacion, correo, Some(id))
                .await?
            {
                return Err(AppError::Duplicado {
                    mensaje: "Profesor duplicado".into(),
                    detalles: Some(format!("Ya existe un profesor con el correo \"{correo}\"")),
                });
            }
        }

        if let Some(usuario_id) = cambios.usuario_id {
            self.usuario_repo
                .buscar_por_id(usuario_id)
                .await?
                .ok_or(AppError::NotFound("Usuario"))?;
        }

        let profesor = self
            .profesor_repo
            .actualizar(id, cambios)
            .await?
            .ok_or(AppError::NotFound("Profesor"))?;

        Ok(profesor)
    }

    pub async fn cambiar_estado(&self, id: Uuid, estado: &str) -> Result<Profesor, AppError> {
        let estado = parsear_estado(estado)?;
        self.profesor_repo
            .cambiar_estado(id, estado)
            .await?
            .ok_or(AppError::NotFound("Profesor"))
    }

    // Las franjas vivas del profesor bloquean su eliminación.
    pub async fn eliminar(&self, id: Uuid) -> Result<(), AppError> {
        let profesor = self
            .profesor_repo
            .buscar_por_id(id)
            .await?
            .ok_or(AppError::NotFound("Profesor"))?;

        let programaciones = self
            .programacion_repo
            .programaciones_vivas_de_profesor(profesor.id)
            .await?;
        if !programaciones.is_empty() {
            return Err(AppError::IntegridadReferencial {
                mensaje: "No se puede eliminar el profesor porque tiene programaciones asociadas"
                    .into(),
                detalles: format!(
                    "El profesor está asociado a {} programación(es)",
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

        self.profesor_repo.eliminar(id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn especialidades(valores: &[&str]) -> Vec<String> {
        valores.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn acepta_entre_una_y_diez_especialidades() {
        assert!(validar_especialidades(&especialidades(&["Piano"])).is_ok());
        assert!(validar_especialidades(&especialidades(&["Piano", "Canto", "Guitarra"])).is_ok());
    }

    #[test]
    fn rechaza_listas_vacias_o_demasiado_largas() {
        assert!(validar_especialidades(&[]).is_err());
        let once = vec!["Piano".to_string(); 11];
        assert!(validar_especialidades(&once).is_err());
    }

    #[test]
    fn rechaza_especialidades_fuera_de_rango() {
        assert!(validar_especialidades(&especialidades(&["P"])).is_err());
        let larga = "x".repeat(101);
        assert!(validar_especialidades(&[larga]).is_err());
    }

    #[test]
    fn estado_fuera_del_conjunto_es_rechazado() {
        assert!(parsear_estado("Activo").is_ok());
        assert!(parsear_estado("Suspendido").is_ok());
        assert!(parsear_estado("activo").is_err());
        assert!(parsear_estado("Borrado").is_err());
    }
}
