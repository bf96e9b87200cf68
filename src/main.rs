// src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, patch, post},
    Router,
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;
use crate::docs::ApiDoc;
use crate::middleware::auth::auth_guard;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).compact().init();

    let app_state = AppState::new()
        .await
        .expect("Fallo al inicializar el estado de la aplicación");

    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Fallo al ejecutar las migraciones de la base de datos");

    tracing::info!("✅ Migraciones de la base de datos ejecutadas");

    let sesion_routes = Router::new()
        .route("/cambiar-rol", post(handlers::auth::cambiar_rol));

    let usuario_routes = Router::new()
        .route(
            "/",
            get(handlers::usuarios::listar_usuarios).post(handlers::usuarios::crear_usuario),
        )
        .route("/me", get(handlers::auth::perfil))
        .route(
            "/{id}",
            get(handlers::usuarios::obtener_usuario)
                .put(handlers::usuarios::actualizar_usuario)
                .delete(handlers::usuarios::eliminar_usuario),
        );

    let rol_routes = Router::new()
        .route("/", get(handlers::rbac::listar_roles))
        .route("/{id}", get(handlers::rbac::obtener_rol))
        .route("/{id}/permisos", get(handlers::rbac::permisos_de_rol));

    let relacion_routes = Router::new()
        .route(
            "/",
            get(handlers::rbac::listar_relaciones).post(handlers::rbac::crear_relacion),
        )
        .route(
            "/{id}",
            get(handlers::rbac::obtener_relacion)
                .put(handlers::rbac::actualizar_relacion)
                .delete(handlers::rbac::eliminar_relacion),
        )
        .route(
            "/usuario/{usuarioId}",
            get(handlers::rbac::relaciones_de_usuario)
                .delete(handlers::rbac::eliminar_relaciones_de_usuario),
        );

    let cliente_routes = Router::new()
        .route(
            "/",
            get(handlers::clientes::listar_clientes).post(handlers::clientes::crear_cliente),
        )
        .route(
            "/{id}",
            get(handlers::clientes::obtener_cliente)
                .put(handlers::clientes::actualizar_cliente)
                .delete(handlers::clientes::eliminar_cliente),
        );

    let beneficiario_routes = Router::new()
        .route(
            "/",
            get(handlers::beneficiarios::listar_beneficiarios)
                .post(handlers::beneficiarios::crear_beneficiario),
        )
        .route(
            "/{id}",
            get(handlers::beneficiarios::obtener_beneficiario)
                .put(handlers::beneficiarios::actualizar_beneficiario)
                .delete(handlers::beneficiarios::eliminar_beneficiario),
        );

    let curso_routes = Router::new().route(
        "/",
        get(handlers::cursos::listar_cursos).post(handlers::cursos::crear_curso),
    );

    let venta_routes = Router::new()
        .route(
            "/",
            get(handlers::ventas::listar_ventas).post(handlers::ventas::crear_venta),
        )
        .route("/next-consecutivo", get(handlers::ventas::proximo_consecutivo))
        .route(
            "/{id}",
            get(handlers::ventas::obtener_venta)
                .put(handlers::ventas::actualizar_venta)
                .delete(handlers::ventas::eliminar_venta),
        )
        .route("/{id}/anular", patch(handlers::ventas::anular_venta));

    let pago_routes = Router::new()
        .route(
            "/",
            get(handlers::pagos::listar_pagos).post(handlers::pagos::crear_pago),
        )
        .route(
            "/{id}",
            get(handlers::pagos::obtener_pago)
                .put(handlers::pagos::actualizar_pago)
                .delete(handlers::pagos::eliminar_pago),
        );

    let profesor_routes = Router::new()
        .route(
            "/",
            get(handlers::profesores::listar_profesores)
                .post(handlers::profesores::crear_profesor),
        )
        .route(
            "/especialidad/{especialidad}",
            get(handlers::profesores::profesores_por_especialidad),
        )
        .route(
            "/estado/{estado}",
            get(handlers::profesores::profesores_por_estado),
        )
        .route(
            "/{id}",
            get(handlers::profesores::obtener_profesor)
                .put(handlers::profesores::actualizar_profesor)
                .delete(handlers::profesores::eliminar_profesor),
        )
        .route(
            "/{id}/estado",
            patch(handlers::profesores::cambiar_estado_profesor),
        );

    let programacion_profesor_routes = Router::new()
        .route(
            "/",
            get(handlers::programaciones::listar_programaciones_profesor)
                .post(handlers::programaciones::crear_programacion_profesor),
        )
        .route(
            "/{id}",
            get(handlers::programaciones::obtener_programacion_profesor)
                .delete(handlers::programaciones::eliminar_programacion_profesor),
        );

    let programacion_clase_routes = Router::new()
        .route(
            "/",
            get(handlers::programaciones::listar_programaciones_clase)
                .post(handlers::programaciones::crear_programacion_clase),
        )
        .route(
            "/{id}",
            get(handlers::programaciones::obtener_programacion_clase)
                .delete(handlers::programaciones::eliminar_programacion_clase),
        );

    let asistencia_routes = Router::new()
        .route(
            "/",
            get(handlers::programaciones::listar_asistencias)
                .post(handlers::programaciones::crear_asistencia),
        )
        .route("/{id}", get(handlers::programaciones::obtener_asistencia))
        .route(
            "/{id}/estado",
            patch(handlers::programaciones::cambiar_estado_asistencia),
        );

    // Todo lo anterior exige sesión; el login es la única ruta pública.
    let protected_routes = Router::new()
        .nest("/api/login", sesion_routes)
        .nest("/api/usuarios", usuario_routes)
        .nest("/api/roles", rol_routes)
        .nest("/api/usuarios_has_rol", relacion_routes)
        .nest("/api/clientes", cliente_routes)
        .nest("/api/beneficiarios", beneficiario_routes)
        .nest("/api/cursos", curso_routes)
        .nest("/api/ventas", venta_routes)
        .nest("/api/pagos", pago_routes)
        .nest("/api/profesores", profesor_routes)
        .nest("/api/programaciones_profesor", programacion_profesor_routes)
        .nest("/api/programaciones_clase", programacion_clase_routes)
        .nest("/api/asistencias", asistencia_routes)
        .route_layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/login", post(handlers::auth::login))
        .merge(protected_routes)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(app_state);

    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = TcpListener::bind(&addr)
        .await
        .expect("Fallo al iniciar el listener TCP");
    tracing::info!("🚀 Servidor escuchando en {}", listener.local_addr().unwrap());
    axum::serve(listener, app)
        .await
        .expect("Error en el servidor Axum");
}
