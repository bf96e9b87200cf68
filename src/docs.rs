// src/docs.rs

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::login,
        handlers::auth::cambiar_rol,
        handlers::auth::perfil,

        // --- Usuarios ---
        handlers::usuarios::listar_usuarios,
        handlers::usuarios::obtener_usuario,
        handlers::usuarios::crear_usuario,
        handlers::usuarios::actualizar_usuario,
        handlers::usuarios::eliminar_usuario,

        // --- Roles y asignaciones ---
        handlers::rbac::listar_roles,
        handlers::rbac::obtener_rol,
        handlers::rbac::permisos_de_rol,
        handlers::rbac::listar_relaciones,
        handlers::rbac::obtener_relacion,
        handlers::rbac::crear_relacion,
        handlers::rbac::actualizar_relacion,
        handlers::rbac::eliminar_relacion,
        handlers::rbac::relaciones_de_usuario,
        handlers::rbac::eliminar_relaciones_de_usuario,

        // --- Clientes ---
        handlers::clientes::listar_clientes,
        handlers::clientes::obtener_cliente,
        handlers::clientes::crear_cliente,
        handlers::clientes::actualizar_cliente,
        handlers::clientes::eliminar_cliente,

        // --- Beneficiarios ---
        handlers::beneficiarios::listar_beneficiarios,
        handlers::beneficiarios::obtener_beneficiario,
        handlers::beneficiarios::crear_beneficiario,
        handlers::beneficiarios::actualizar_beneficiario,
        handlers::beneficiarios::eliminar_beneficiario,

        // --- Cursos ---
        handlers::cursos::listar_cursos,
        handlers::cursos::crear_curso,

        // --- Ventas ---
        handlers::ventas::listar_ventas,
        handlers::ventas::proximo_consecutivo,
        handlers::ventas::obtener_venta,
        handlers::ventas::crear_venta,
        handlers::ventas::actualizar_venta,
        handlers::ventas::anular_venta,
        handlers::ventas::eliminar_venta,

        // --- Pagos ---
        handlers::pagos::listar_pagos,
        handlers::pagos::obtener_pago,
        handlers::pagos::crear_pago,
        handlers::pagos::actualizar_pago,
        handlers::pagos::eliminar_pago,

        // --- Profesores ---
        handlers::profesores::listar_profesores,
        handlers::profesores::obtener_profesor,
        handlers::profesores::profesores_por_especialidad,
        handlers::profesores::profesores_por_estado,
        handlers::profesores::crear_profesor,
        handlers::profesores::actualizar_profesor,
        handlers::profesores::cambiar_estado_profesor,
        handlers::profesores::eliminar_profesor,

        // --- Programaciones ---
        handlers::programaciones::listar_programaciones_profesor,
        handlers::programaciones::obtener_programacion_profesor,
        handlers::programaciones::crear_programacion_profesor,
        handlers::programaciones::eliminar_programacion_profesor,
        handlers::programaciones::listar_programaciones_clase,
        handlers::programaciones::obtener_programacion_clase,
        handlers::programaciones::crear_programacion_clase,
        handlers::programaciones::eliminar_programacion_clase,

        // --- Asistencias ---
        handlers::programaciones::listar_asistencias,
        handlers::programaciones::obtener_asistencia,
        handlers::programaciones::crear_asistencia,
        handlers::programaciones::cambiar_estado_asistencia,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::TipoDocumento,
            models::auth::Usuario,
            models::auth::CrearUsuarioPayload,
            models::auth::ActualizarUsuarioPayload,
            models::auth::LoginPayload,
            models::auth::CambiarRolPayload,
            models::auth::UsuarioAutenticado,
            models::auth::LoginResponse,

            // --- RBAC ---
            models::rbac::Rol,
            models::rbac::UsuarioHasRol,
            models::rbac::UsuarioHasRolDetalle,
            models::rbac::CrearUsuarioHasRolPayload,
            models::rbac::ActualizarUsuarioHasRolPayload,

            // --- Clientes y beneficiarios ---
            models::parties::Cliente,
            models::parties::ReferenciaCliente,
            models::parties::Beneficiario,
            models::parties::InfoCliente,
            models::parties::CrearClientePayload,
            models::parties::ActualizarClientePayload,
            models::parties::CrearBeneficiarioPayload,
            models::parties::ActualizarBeneficiarioPayload,

            // --- Ventas y pagos ---
            models::commerce::TipoVenta,
            models::commerce::EstadoVenta,
            models::commerce::MetodoPago,
            models::commerce::EstadoPago,
            models::commerce::Curso,
            models::commerce::CrearCursoPayload,
            models::commerce::Venta,
            models::commerce::CrearVentaPayload,
            models::commerce::ActualizarVentaPayload,
            models::commerce::AnularVentaPayload,
            models::commerce::Pago,
            models::commerce::CrearPagoPayload,
            models::commerce::ActualizarPagoPayload,
            models::commerce::BeneficiarioConCliente,
            models::commerce::VentaDetalle,
            models::commerce::PagoDetalle,

            // --- Profesores ---
            models::profesores::EstadoProfesor,
            models::profesores::Profesor,
            models::profesores::CrearProfesorPayload,
            models::profesores::ActualizarProfesorPayload,
            models::profesores::CambiarEstadoProfesorPayload,

            // --- Programaciones y asistencias ---
            models::scheduling::EstadoProgramacionProfesor,
            models::scheduling::EstadoProgramacionClase,
            models::scheduling::EstadoAsistencia,
            models::scheduling::ProgramacionProfesor,
            models::scheduling::CrearProgramacionProfesorPayload,
            models::scheduling::ProgramacionClase,
            models::scheduling::CrearProgramacionClasePayload,
            models::scheduling::Asistencia,
            models::scheduling::CrearAsistenciaPayload,
            models::scheduling::CambiarEstadoAsistenciaPayload,
            models::scheduling::VentaConBeneficiario,
            models::scheduling::AsistenciaDetalle,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticación y sesión"),
        (name = "Usuarios", description = "Gestión de usuarios"),
        (name = "RBAC", description = "Roles y asignaciones de rol"),
        (name = "Clientes", description = "Clientes titulares"),
        (name = "Beneficiarios", description = "Beneficiarios de los servicios"),
        (name = "Cursos", description = "Catálogo de cursos"),
        (name = "Ventas", description = "Ventas y matrículas"),
        (name = "Pagos", description = "Pagos de ventas"),
        (name = "Profesores", description = "Gestión de profesores"),
        (name = "Programaciones", description = "Franjas horarias y clases programadas"),
        (name = "Asistencias", description = "Registro de asistencia a clases")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
