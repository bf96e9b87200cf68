pub mod beneficiario_repo;
pub mod cliente_repo;
pub mod curso_repo;
pub mod pago_repo;
pub mod profesor_repo;
pub mod programacion_repo;
pub mod rol_repo;
pub mod usuario_repo;
pub mod venta_repo;

pub use beneficiario_repo::BeneficiarioRepository;
pub use cliente_repo::ClienteRepository;
pub use curso_repo::CursoRepository;
pub use pago_repo::PagoRepository;
pub use profesor_repo::ProfesorRepository;
pub use programacion_repo::ProgramacionRepository;
pub use rol_repo::RolRepository;
pub use usuario_repo::UsuarioRepository;
pub use venta_repo::VentaRepository;
