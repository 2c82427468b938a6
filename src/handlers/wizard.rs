// src/handlers/wizard.rs
//
// La superficie REST del wizard de reserva: un borrador por sesión,
// pasos que se completan con PUT y un confirmar que dispara la creación
// real. Ver services/wizard.rs para las reglas de avance.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    handlers::{envuelto, parsear_id},
    models::reserva::{BarberiaId, ServicioPersonalizado},
};

// POST /api/wizard
#[utoipa::path(
    post,
    path = "/api/wizard",
    tag = "Wizard",
    responses((status = 201, description = "Borrador iniciado", body = crate::services::wizard::BorradorWizard))
)]
pub async fn iniciar(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let borrador = app_state.wizard.start().await;
    Ok((StatusCode::CREATED, envuelto(borrador)))
}

// GET /api/wizard/{id}
#[utoipa::path(
    get,
    path = "/api/wizard/{id}",
    tag = "Wizard",
    params(("id" = String, Path, description = "ID del borrador")),
    responses(
        (status = 200, description = "Estado del borrador", body = crate::services::wizard::BorradorWizard),
        (status = 404, description = "Borrador inexistente o abandonado")
    )
)]
pub async fn ver(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let borrador = app_state.wizard.get(parsear_id(&id)?).await?;
    Ok(envuelto(borrador))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IdentidadPayload {
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Juan Pérez")]
    pub cliente: String,
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "+57 300 123 4567")]
    pub telefono: String,
    #[validate(email(message = "email inválido"))]
    pub email: Option<String>,
    pub barberia: BarberiaId,
}

// PUT /api/wizard/{id}/identidad
#[utoipa::path(
    put,
    path = "/api/wizard/{id}/identidad",
    tag = "Wizard",
    request_body = IdentidadPayload,
    params(("id" = String, Path, description = "ID del borrador")),
    responses(
        (status = 200, description = "Paso de identidad completado", body = crate::services::wizard::BorradorWizard),
        (status = 400, description = "Datos de contacto incompletos")
    )
)]
pub async fn identidad(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<IdentidadPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::PayloadValidation)?;
    let borrador = app_state
        .wizard
        .set_identidad(
            parsear_id(&id)?,
            payload.cliente,
            payload.telefono,
            payload.email,
            payload.barberia,
        )
        .await?;
    Ok(envuelto(borrador))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServicioPayload {
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Corte + Barba")]
    pub servicio: String,
    pub servicio_personalizado: Option<ServicioPersonalizado>,
}

// PUT /api/wizard/{id}/servicio
#[utoipa::path(
    put,
    path = "/api/wizard/{id}/servicio",
    tag = "Wizard",
    request_body = ServicioPayload,
    params(("id" = String, Path, description = "ID del borrador")),
    responses(
        (status = 200, description = "Servicio elegido", body = crate::services::wizard::BorradorWizard),
        (status = 400, description = "Falta completar identidad")
    )
)]
pub async fn servicio(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<ServicioPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::PayloadValidation)?;
    let borrador = app_state
        .wizard
        .set_servicio(parsear_id(&id)?, payload.servicio, payload.servicio_personalizado)
        .await?;
    Ok(envuelto(borrador))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HorarioPayload {
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Carlos Ruiz")]
    pub barbero: String,
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "2024-01-15")]
    pub fecha: String,
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "10:00")]
    pub hora: String,
}

// PUT /api/wizard/{id}/horario
#[utoipa::path(
    put,
    path = "/api/wizard/{id}/horario",
    tag = "Wizard",
    request_body = HorarioPayload,
    params(("id" = String, Path, description = "ID del borrador")),
    responses(
        (status = 200, description = "Franja evaluada; trae alternativas si hubo conflicto"),
        (status = 400, description = "Barbero fuera del plantel o pasos previos incompletos")
    )
)]
pub async fn horario(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<HorarioPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::PayloadValidation)?;
    let (borrador, disponibilidad) = app_state
        .wizard
        .set_horario(parsear_id(&id)?, payload.barbero, payload.fecha, payload.hora)
        .await?;
    Ok(envuelto(json!({
        "borrador": borrador,
        "disponibilidad": disponibilidad,
    })))
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmarPayload {
    pub notas: Option<String>,
}

// POST /api/wizard/{id}/confirmar
#[utoipa::path(
    post,
    path = "/api/wizard/{id}/confirmar",
    tag = "Wizard",
    request_body = ConfirmarPayload,
    params(("id" = String, Path, description = "ID del borrador")),
    responses(
        (status = 201, description = "Reserva creada", body = crate::models::reserva::Reserva),
        (status = 400, description = "El borrador no pasó la validación")
    )
)]
pub async fn confirmar(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    payload: Option<Json<ConfirmarPayload>>,
) -> Result<impl IntoResponse, AppError> {
    let notas = payload.and_then(|Json(p)| p.notas);
    let reserva = app_state.wizard.confirmar(parsear_id(&id)?, notas).await?;
    Ok((StatusCode::CREATED, envuelto(reserva)))
}

// DELETE /api/wizard/{id}
#[utoipa::path(
    delete,
    path = "/api/wizard/{id}",
    tag = "Wizard",
    params(("id" = String, Path, description = "ID del borrador")),
    responses(
        (status = 200, description = "Borrador descartado"),
        (status = 404, description = "Borrador inexistente")
    )
)]
pub async fn abandonar(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    app_state.wizard.abandonar(parsear_id(&id)?).await?;
    Ok(Json(json!({ "ok": true })))
}
