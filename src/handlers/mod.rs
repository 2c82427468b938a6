pub mod directorio;
pub mod notificaciones;
pub mod reservas;
pub mod wizard;

use axum::Json;
use serde::Serialize;
use serde_json::json;
use uuid::Uuid;

use crate::common::error::AppError;

// El sobre { ok: true, data } que usan todas las respuestas exitosas.
pub(crate) fn envuelto<T: Serialize>(data: T) -> Json<serde_json::Value> {
    Json(json!({ "ok": true, "data": data }))
}

// Los ids son cadenas opacas hacia afuera. Una cadena que no parsea se
// trata como "no encontrado", nunca como error interno.
pub(crate) fn parsear_id(id: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id).map_err(|_| AppError::NotFound)
}
