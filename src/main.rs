// src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
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
use crate::middleware::auth::admin_guard;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_target(false)
        .compact()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // Si la configuración falla, la aplicación no debe arrancar.
    let app_state = AppState::new()
        .await
        .expect("Falló la inicialización del estado de la aplicación");

    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Fallaron las migraciones de la base de datos");

    tracing::info!("✅ Migraciones ejecutadas");

    // Rutas públicas: el flujo de booking del cliente.
    let public_routes = Router::new()
        .route("/reservas", post(handlers::reservas::crear))
        .route("/disponibilidad", get(handlers::reservas::disponibilidad))
        .route("/barberos", get(handlers::directorio::barberos))
        .route("/servicios", get(handlers::directorio::servicios))
        .route("/wizard", post(handlers::wizard::iniciar))
        .route(
            "/wizard/{id}",
            get(handlers::wizard::ver).delete(handlers::wizard::abandonar),
        )
        .route("/wizard/{id}/identidad", put(handlers::wizard::identidad))
        .route("/wizard/{id}/servicio", put(handlers::wizard::servicio))
        .route("/wizard/{id}/horario", put(handlers::wizard::horario))
        .route("/wizard/{id}/confirmar", post(handlers::wizard::confirmar));

    // Rutas de administración: listado, conciliación y el feed de avisos.
    // Todas las acciones de estado salen de acá y entran al motor.
    let admin_routes = Router::new()
        .route("/reservas", get(handlers::reservas::listar))
        .route(
            "/reservas/{id}",
            axum::routing::patch(handlers::reservas::modificar)
                .delete(handlers::reservas::eliminar),
        )
        .route("/reservas/{id}/aceptar", post(handlers::reservas::aceptar))
        .route("/reservas/{id}/rechazar", post(handlers::reservas::rechazar))
        .route("/reservas/{id}/reagendar", post(handlers::reservas::reagendar))
        .route("/reservas/{id}/cancelar", post(handlers::reservas::cancelar))
        .route("/reservas/{id}/completar", post(handlers::reservas::completar))
        .route("/notificaciones", get(handlers::notificaciones::listar))
        .layer(axum_middleware::from_fn(admin_guard));

    let app = Router::new()
        .route("/api/salud", get(|| async { "OK" }))
        .nest("/api", public_routes.merge(admin_routes))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", docs::ApiDoc::openapi()))
        .with_state(app_state);

    let addr = format!("0.0.0.0:{}", config::puerto());
    let listener = TcpListener::bind(&addr)
        .await
        .expect("Falló el bind del listener TCP");
    tracing::info!("🚀 Servidor escuchando en {}", addr);
    axum::serve(listener, app).await.expect("Error en el servidor Axum");
}
