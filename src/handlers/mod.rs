// src/handlers/mod.rs

pub mod auth;
pub mod beneficiarios;
pub mod clientes;
pub mod cursos;
pub mod pagos;
pub mod profesores;
pub mod programaciones;
pub mod rbac;
pub mod usuarios;
pub mod ventas;
