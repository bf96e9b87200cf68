pub mod auth;
pub mod pago_service;
pub mod permisos;
pub mod profesor_service;
pub mod usuario_service;
pub mod venta_service;

pub use auth::AuthService;
pub use pago_service::PagoService;
pub use profesor_service::ProfesorService;
pub use usuario_service::UsuarioService;
pub use venta_service::VentaService;
