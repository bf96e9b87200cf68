// src/config.rs

use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, time::Duration};

use crate::{
    db::{
        BeneficiarioRepository, ClienteRepository, CursoRepository, PagoRepository,
        ProfesorRepository, ProgramacionRepository, RolRepository, UsuarioRepository,
        VentaRepository,
    },
    services::{AuthService, PagoService, ProfesorService, UsuarioService, VentaService},
};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub usuario_repo: UsuarioRepository,
    pub rol_repo: RolRepository,
    pub cliente_repo: ClienteRepository,
    pub beneficiario_repo: BeneficiarioRepository,
    pub curso_repo: CursoRepository,
    pub venta_repo: VentaRepository,
    pub profesor_repo: ProfesorRepository,
    pub programacion_repo: ProgramacionRepository,
    pub auth_service: AuthService,
    pub usuario_service: UsuarioService,
    pub pago_service: PagoService,
    pub venta_service: VentaService,
    pub profesor_service: ProfesorService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")?;
        let jwt_secret = env::var("JWT_SECRET")?;

        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexión con la base de datos establecida");

        let usuario_repo = UsuarioRepository::new(db_pool.clone());
        let rol_repo = RolRepository::new(db_pool.clone());
        let cliente_repo = ClienteRepository::new(db_pool.clone());
        let beneficiario_repo = BeneficiarioRepository::new(db_pool.clone());
        let curso_repo = CursoRepository::new(db_pool.clone());
        let venta_repo = VentaRepository::new(db_pool.clone());
        let pago_repo = PagoRepository::new(db_pool.clone());
        let profesor_repo = ProfesorRepository::new(db_pool.clone());
        let programacion_repo = ProgramacionRepository::new(db_pool.clone());

        let auth_service =
            AuthService::new(usuario_repo.clone(), rol_repo.clone(), jwt_secret);
        let usuario_service = UsuarioService::new(
            usuario_repo.clone(),
            rol_repo.clone(),
            cliente_repo.clone(),
            beneficiario_repo.clone(),
            venta_repo.clone(),
            profesor_repo.clone(),
            programacion_repo.clone(),
            db_pool.clone(),
        );
        let pago_service = PagoService::new(
            pago_repo.clone(),
            venta_repo.clone(),
            beneficiario_repo.clone(),
            cliente_repo.clone(),
            usuario_repo.clone(),
            rol_repo.clone(),
        );
        let venta_service = VentaService::new(
            venta_repo.clone(),
            beneficiario_repo.clone(),
            cliente_repo.clone(),
            curso_repo.clone(),
            pago_repo,
            programacion_repo.clone(),
        );
        let profesor_service = ProfesorService::new(
            profesor_repo.clone(),
            usuario_repo.clone(),
            rol_repo.clone(),
            programacion_repo.clone(),
            db_pool.clone(),
        );

        Ok(Self {
            db_pool,
            usuario_repo,
            rol_repo,
            cliente_repo,
            beneficiario_repo,
            curso_repo,
            venta_repo,
            profesor_repo,
            programacion_repo,
            auth_service,
            usuario_service,
            pago_service,
            venta_service,
            profesor_service,
        })
    }
}
