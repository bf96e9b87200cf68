// src/services/auth.rs

use bcrypt::verify;
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{RolRepository, UsuarioRepository},
    models::auth::{Claims, LoginResponse, Usuario, UsuarioAutenticado},
    models::rbac::Rol,
    services::permisos,
};

#[derive(Clone)]
pub struct AuthService {
    usuario_repo: UsuarioRepository,
    rol_repo: RolRepository,
    jwt_secret: String,
}

impl AuthService {
    pub fn new(usuario_repo: UsuarioRepository, rol_repo: RolRepository, jwt_secret: String) -> Self {
        Self {
            usuario_repo,
            rol_repo,
            jwt_secret,
        }
    }

    // Autentica por correo y contraseña. El rol activo de la sesión es el
    // primero de los roles activos del usuario.
    pub async fn login(&self, correo: &str, contrasena: &str) -> Result<LoginResponse, AppError> {
        let usuario = self
            .usuario_repo
            .buscar_por_correo(correo)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !usuario.estado {
            return Err(AppError::InvalidCredentials);
        }

        // bcrypt es costoso: fuera del executor de tokio.
        let contrasena = contrasena.to_owned();
        let hash_guardado = usuario.contrasena_hash.clone();
        let valido = tokio::task::spawn_blocking(move || verify(&contrasena, &hash_guardado))
            .await
            .map_err(|e| anyhow::anyhow!("Falló la tarea de verificación: {e}"))??;

        if !valido {
            return Err(AppError::InvalidCredentials);
        }

        let roles = self.rol_repo.roles_activos_de_usuario(usuario.id).await?;
        let rol_activo = roles
            .first()
            .cloned()
            .ok_or_else(|| AppError::BadRequest("El usuario no tiene roles activos".into()))?;

        self.armar_respuesta(usuario, rol_activo, roles).await
    }

    // Cambia el rol activo de la sesión. Solo se puede cambiar a un rol
    // que el usuario tenga asignado y activo.
    pub async fn cambiar_rol(
        &self,
        usuario_id: Uuid,
        nuevo_rol_id: Uuid,
    ) -> Result<LoginResponse, AppError> {
        let usuario = self
            .usuario_repo
            .buscar_por_id(usuario_id)
            .await?
            .ok_or(AppError::NotFound("Usuario"))?;

        let roles = self.rol_repo.roles_activos_de_usuario(usuario.id).await?;
        let rol_activo = roles
            .iter()
            .find(|r| r.id == nuevo_rol_id)
            .cloned()
            .ok_or_else(|| {
                AppError::BadRequest("El usuario no tiene asignado ese rol".into())
            })?;

        self.armar_respuesta(usuario, rol_activo, roles).await
    }

    // Perfil del usuario autenticado con el rol activo del token.
    pub async fn perfil(&self, usuario_id: Uuid, rol_id: Uuid) -> Result<UsuarioAutenticado, AppError> {
        let usuario = self
            .usuario_repo
            .buscar_por_id(usuario_id)
            .await?
            .ok_or(AppError::NotFound("Usuario"))?;

        let roles = self.rol_repo.roles_activos_de_usuario(usuario.id).await?;
        let rol_activo = roles
            .iter()
            .find(|r| r.id == rol_id)
            .cloned()
            .ok_or(AppError::InvalidToken)?;

        self.armar_usuario(usuario, rol_activo, roles).await
    }

    async fn armar_respuesta(
        &self,
        usuario: Usuario,
        rol_activo: Rol,
        roles: Vec<Rol>,
    ) -> Result<LoginResponse, AppError> {
        let token = self.crear_token(&usuario, &rol_activo)?;
        let usuario = self.armar_usuario(usuario, rol_activo, roles).await?;
        Ok(LoginResponse {
            success: true,
            token,
            usuario,
        })
    }

    async fn armar_usuario(
        &self,
        usuario: Usuario,
        rol_activo: Rol,
        roles: Vec<Rol>,
    ) -> Result<UsuarioAutenticado, AppError> {
        let modulos = self.rol_repo.modulos_de_rol(rol_activo.id).await?;
        let permisos = permisos::permisos_de_rol(&rol_activo.nombre, &modulos);

        Ok(UsuarioAutenticado {
            id: usuario.id,
            nombre: usuario.nombre,
            apellido: usuario.apellido,
            correo: usuario.correo,
            documento: usuario.documento,
            tipo_de_documento: usuario.tipo_de_documento,
            rol: rol_activo,
            todos_los_roles: roles,
            permisos,
        })
    }

    pub fn crear_token(&self, usuario: &Usuario, rol: &Rol) -> Result<String, AppError> {
        let ahora = Utc::now();
        let expiracion = ahora + chrono::Duration::hours(8);

        let claims = Claims {
            sub: usuario.id,
            rol_id: rol.id,
            rol: rol.nombre.clone(),
            exp: expiracion.timestamp() as usize,
            iat: ahora.timestamp() as usize,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )?;

        Ok(token)
    }

    pub fn validar_token(&self, token: &str) -> Result<Claims, AppError> {
        let datos = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|_| AppError::InvalidToken)?;

        Ok(datos.claims)
    }
}
