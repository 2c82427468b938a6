// src/handlers/notificaciones.rs

use axum::{extract::State, response::IntoResponse};

use crate::{common::error::AppError, config::AppState, handlers::envuelto};

// GET /api/notificaciones
//
// El feed que el panel admin consulta por polling. Solo las últimas 50:
// es un aviso, no el registro de verdad (eso vive en el historial de
// cada reserva).
#[utoipa::path(
    get,
    path = "/api/notificaciones",
    tag = "Notificaciones",
    responses(
        (status = 200, description = "Últimas notificaciones", body = Vec<crate::db::NotificacionAdmin>),
        (status = 403, description = "Solo admin")
    )
)]
pub async fn listar(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let items = app_state.notificaciones.list_recent().await?;
    Ok(envuelto(items))
}
