// src/docs.rs

use utoipa::OpenApi;

use crate::db;
use crate::handlers;
use crate::models;
use crate::services;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Reservas ---
        handlers::reservas::listar,
        handlers::reservas::crear,
        handlers::reservas::modificar,
        handlers::reservas::eliminar,
        handlers::reservas::aceptar,
        handlers::reservas::rechazar,
        handlers::reservas::reagendar,
        handlers::reservas::cancelar,
        handlers::reservas::completar,
        handlers::reservas::disponibilidad,

        // --- Wizard ---
        handlers::wizard::iniciar,
        handlers::wizard::ver,
        handlers::wizard::identidad,
        handlers::wizard::servicio,
        handlers::wizard::horario,
        handlers::wizard::confirmar,
        handlers::wizard::abandonar,

        // --- Directorio ---
        handlers::directorio::barberos,
        handlers::directorio::servicios,

        // --- Notificaciones ---
        handlers::notificaciones::listar,
    ),
    components(
        schemas(
            models::reserva::Reserva,
            models::reserva::SolicitudReserva,
            models::reserva::EstadoReserva,
            models::reserva::BarberiaId,
            models::reserva::Prioridad,
            models::reserva::ServicioPersonalizado,
            models::catalogo::Servicio,
            models::catalogo::Barbero,
            db::NotificacionAdmin,
            services::reserva_service::Disponibilidad,
            services::wizard::BorradorWizard,
            services::wizard::PasoWizard,
            handlers::reservas::ModificarReservaPayload,
            handlers::reservas::ReagendarPayload,
            handlers::wizard::IdentidadPayload,
            handlers::wizard::ServicioPayload,
            handlers::wizard::HorarioPayload,
            handlers::wizard::ConfirmarPayload,
        )
    ),
    tags(
        (name = "Reservas", description = "Ciclo de vida de las reservas"),
        (name = "Wizard", description = "Flujo de reserva paso a paso"),
        (name = "Directorio", description = "Barberos y servicios (solo lectura)"),
        (name = "Notificaciones", description = "Feed de avisos para el panel admin"),
    )
)]
pub struct ApiDoc;
