use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::models::reserva::EstadoReserva;

// El tipo de error de la aplicación, con `thiserror` para mejor ergonomía.
#[derive(Debug, Error)]
pub enum AppError {
    // Campos requeridos ausentes o con formato inválido
    #[error("Error de validación: {0}")]
    Validation(String),

    // Errores de los derive de `validator` sobre los payloads
    #[error("Error de validación")]
    PayloadValidation(#[from] validator::ValidationErrors),

    #[error("Reserva no encontrada")]
    NotFound,

    #[error("Transición de estado no permitida: {desde} → {hacia}")]
    InvalidTransition {
        desde: EstadoReserva,
        hacia: EstadoReserva,
    },

    #[error("Acceso restringido a administradores")]
    Forbidden,

    // Variante para errores de base de datos (sqlx)
    #[error("Error de base de datos")]
    Database(#[from] sqlx::Error),

    // Variante genérica para cualquier otro error inesperado.
    // `anyhow::Error` captura el contexto completo.
    #[error("Error interno del servidor")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Devolvemos todos los detalles de la validación del payload.
            AppError::PayloadValidation(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "ok": false,
                    "error": "Uno o más campos son inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::Validation(ref msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::NotFound => (StatusCode::NOT_FOUND, "No encontrado".to_string()),
            AppError::InvalidTransition { .. } => (StatusCode::CONFLICT, self.to_string()),
            AppError::Forbidden => (StatusCode::FORBIDDEN, self.to_string()),

            // Todos los demás errores (Database, Internal) se vuelven 500.
            // `tracing` registra el detalle que `thiserror` nos dio.
            ref e => {
                tracing::error!("Error interno del servidor: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Ocurrió un error inesperado.".to_string(),
                )
            }
        };

        // Respuesta estándar: el sobre { ok: false, error } que los
        // clientes verifican antes de confiar en `data`.
        let body = Json(json!({ "ok": false, "error": error_message }));
        (status, body).into_response()
    }
}
