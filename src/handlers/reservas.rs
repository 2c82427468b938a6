// src/handlers/reservas.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    handlers::{envuelto, parsear_id},
    models::reserva::{
        BarberiaId, EstadoReserva, FiltroReservas, OrdenListado, SolicitudReserva,
    },
    services::reserva_service::ModificarReserva,
};

// =============================================================================
//  LISTADO (panel admin)
// =============================================================================

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListarReservasQuery {
    // "principal" | "norte" | "sur" | "todas" (default)
    pub barberia: Option<String>,
    // un estado puntual o "todas" (default)
    pub estado: Option<String>,
    // texto libre: cliente, servicio o barbero
    pub q: Option<String>,
    // "llegada" (default) | "fecha" para vistas de calendario
    pub orden: Option<String>,
}

impl ListarReservasQuery {
    fn como_filtro(&self) -> FiltroReservas {
        FiltroReservas {
            barberia: self.barberia.as_deref().and_then(BarberiaId::parse),
            estado: self.estado.as_deref().and_then(EstadoReserva::parse),
            q: self
                .q
                .as_deref()
                .map(str::trim)
                .filter(|q| !q.is_empty())
                .map(str::to_string),
            orden: match self.orden.as_deref() {
                Some("fecha") => OrdenListado::Fecha,
                _ => OrdenListado::Llegada,
            },
        }
    }
}

// GET /api/reservas
#[utoipa::path(
    get,
    path = "/api/reservas",
    tag = "Reservas",
    params(ListarReservasQuery),
    responses(
        (status = 200, description = "Listado de reservas"),
        (status = 403, description = "Solo admin")
    )
)]
pub async fn listar(
    State(app_state): State<AppState>,
    Query(query): Query<ListarReservasQuery>,
) -> Result<impl IntoResponse, AppError> {
    let reservas = app_state.reserva_service.list(&query.como_filtro()).await?;
    Ok(envuelto(reservas))
}

// =============================================================================
//  CREACIÓN (booking directo, misma ruta que usa el wizard al confirmar)
// =============================================================================

// POST /api/reservas
#[utoipa::path(
    post,
    path = "/api/reservas",
    tag = "Reservas",
    request_body = SolicitudReserva,
    responses(
        (status = 201, description = "Reserva creada", body = crate::models::reserva::Reserva),
        (status = 400, description = "Campos requeridos ausentes o franja ocupada")
    )
)]
pub async fn crear(
    State(app_state): State<AppState>,
    Json(solicitud): Json<SolicitudReserva>,
) -> Result<impl IntoResponse, AppError> {
    let reserva = app_state.reserva_service.create_reserva(solicitud).await?;
    Ok((StatusCode::CREATED, envuelto(reserva)))
}

// =============================================================================
//  EDICIÓN LIBRE Y BORRADO (admin)
// =============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ModificarReservaPayload {
    #[schema(example = "2024-01-16")]
    pub fecha: Option<String>,
    #[schema(example = "16:00")]
    pub hora: Option<String>,
    #[validate(length(min = 1, message = "required"))]
    pub barbero: Option<String>,
    pub notas: Option<String>,
    // El estado no se parchea: solo se mueve por transiciones.
    #[schema(ignore)]
    pub estado: Option<serde_json::Value>,
}

// PATCH /api/reservas/{id}
#[utoipa::path(
    patch,
    path = "/api/reservas/{id}",
    tag = "Reservas",
    request_body = ModificarReservaPayload,
    params(("id" = String, Path, description = "ID de la reserva")),
    responses(
        (status = 200, description = "Reserva modificada", body = crate::models::reserva::Reserva),
        (status = 404, description = "No existe")
    )
)]
pub async fn modificar(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<ModificarReservaPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::PayloadValidation)?;
    if payload.estado.is_some() {
        return Err(AppError::Validation(
            "El estado no se edita directo; usa las acciones de transición".into(),
        ));
    }

    let id = parsear_id(&id)?;
    let cambios = ModificarReserva {
        fecha: payload.fecha,
        hora: payload.hora,
        barbero: payload.barbero,
        notas: payload.notas,
    };
    let reserva = app_state.reserva_service.modify(id, cambios).await?;
    Ok(envuelto(reserva))
}

// DELETE /api/reservas/{id}
#[utoipa::path(
    delete,
    path = "/api/reservas/{id}",
    tag = "Reservas",
    params(("id" = String, Path, description = "ID de la reserva")),
    responses(
        (status = 200, description = "Reserva eliminada"),
        (status = 404, description = "No existe")
    )
)]
pub async fn eliminar(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parsear_id(&id)?;
    app_state.reserva_service.delete(id).await?;
    Ok(Json(serde_json::json!({ "ok": true })))
}

// =============================================================================
//  TRANSICIONES (admin, todas pasan por el motor)
// =============================================================================

// POST /api/reservas/{id}/aceptar
#[utoipa::path(
    post,
    path = "/api/reservas/{id}/aceptar",
    tag = "Reservas",
    params(("id" = String, Path, description = "ID de la reserva")),
    responses(
        (status = 200, description = "Reserva confirmada", body = crate::models::reserva::Reserva),
        (status = 409, description = "Transición no permitida")
    )
)]
pub async fn aceptar(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let reserva = app_state.reserva_service.accept(parsear_id(&id)?).await?;
    Ok(envuelto(reserva))
}

// POST /api/reservas/{id}/rechazar
#[utoipa::path(
    post,
    path = "/api/reservas/{id}/rechazar",
    tag = "Reservas",
    params(("id" = String, Path, description = "ID de la reserva")),
    responses(
        (status = 200, description = "Reserva rechazada", body = crate::models::reserva::Reserva),
        (status = 409, description = "Transición no permitida")
    )
)]
pub async fn rechazar(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let reserva = app_state.reserva_service.reject(parsear_id(&id)?).await?;
    Ok(envuelto(reserva))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReagendarPayload {
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "2024-01-16")]
    pub fecha: String,
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "16:00")]
    pub hora: String,
}

// POST /api/reservas/{id}/reagendar
#[utoipa::path(
    post,
    path = "/api/reservas/{id}/reagendar",
    tag = "Reservas",
    request_body = ReagendarPayload,
    params(("id" = String, Path, description = "ID de la reserva")),
    responses(
        (status = 200, description = "Reagenda propuesta", body = crate::models::reserva::Reserva),
        (status = 409, description = "Transición no permitida")
    )
)]
pub async fn reagendar(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<ReagendarPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::PayloadValidation)?;
    let reserva = app_state
        .reserva_service
        .propose_reschedule(parsear_id(&id)?, payload.fecha, payload.hora)
        .await?;
    Ok(envuelto(reserva))
}

// POST /api/reservas/{id}/cancelar
#[utoipa::path(
    post,
    path = "/api/reservas/{id}/cancelar",
    tag = "Reservas",
    params(("id" = String, Path, description = "ID de la reserva")),
    responses(
        (status = 200, description = "Reserva cancelada", body = crate::models::reserva::Reserva),
        (status = 409, description = "Transición no permitida")
    )
)]
pub async fn cancelar(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let reserva = app_state.reserva_service.cancel(parsear_id(&id)?).await?;
    Ok(envuelto(reserva))
}

// POST /api/reservas/{id}/completar
#[utoipa::path(
    post,
    path = "/api/reservas/{id}/completar",
    tag = "Reservas",
    params(("id" = String, Path, description = "ID de la reserva")),
    responses(
        (status = 200, description = "Reserva completada", body = crate::models::reserva::Reserva),
        (status = 409, description = "Transición no permitida")
    )
)]
pub async fn completar(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let reserva = app_state.reserva_service.complete(parsear_id(&id)?).await?;
    Ok(envuelto(reserva))
}

// =============================================================================
//  DISPONIBILIDAD (feedback inmediato del paso 3 del wizard)
// =============================================================================

#[derive(Debug, Deserialize, IntoParams)]
pub struct DisponibilidadQuery {
    pub barbero: String,
    pub fecha: String,
    pub hora: String,
    // Si no viene, se toma del catálogo según el servicio.
    pub servicio: Option<String>,
    pub duracion: Option<i32>,
}

// GET /api/disponibilidad
#[utoipa::path(
    get,
    path = "/api/disponibilidad",
    tag = "Reservas",
    params(DisponibilidadQuery),
    responses(
        (status = 200, description = "Resultado del chequeo", body = crate::services::reserva_service::Disponibilidad)
    )
)]
pub async fn disponibilidad(
    State(app_state): State<AppState>,
    Query(query): Query<DisponibilidadQuery>,
) -> Result<impl IntoResponse, AppError> {
    let duracion = match query.duracion {
        Some(d) if d >= 1 => d,
        Some(_) => {
            return Err(AppError::Validation(
                "La duración debe ser de al menos 1 minuto".into(),
            ))
        }
        None => crate::models::catalogo::duracion_de(query.servicio.as_deref().unwrap_or_default()),
    };
    let resultado = app_state
        .reserva_service
        .check_availability(&query.barbero, &query.fecha, &query.hora, duracion)
        .await?;
    Ok(envuelto(resultado))
}
