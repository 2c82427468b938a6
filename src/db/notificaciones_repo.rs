// src/db/notificaciones_repo.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::common::error::AppError;

// Una entrada del feed de alertas que el panel admin consulta por
// polling. No es el registro de verdad (eso es el historial de la
// reserva): perder una de estas filas no rompe nada.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificacionAdmin {
    pub id: Uuid,
    pub reserva_id: Option<Uuid>,
    #[schema(example = "Nueva cita solicitada")]
    pub titulo: String,
    #[schema(example = "Juan Pérez solicita cita para Corte + Barba el 2024-01-15 a las 10:00")]
    pub cuerpo: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct NotificacionRepository {
    pool: PgPool,
}

impl NotificacionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(
        &self,
        reserva_id: Option<Uuid>,
        titulo: &str,
        cuerpo: &str,
    ) -> Result<NotificacionAdmin, AppError> {
        let notificacion = sqlx::query_as::<_, NotificacionAdmin>(
            r#"
            INSERT INTO admin_notifications (id, reserva_id, titulo, cuerpo)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(reserva_id)
        .bind(titulo)
        .bind(cuerpo)
        .fetch_one(&self.pool)
        .await?;

        Ok(notificacion)
    }

    // Las últimas 50, más recientes primero.
    pub async fn list_recent(&self) -> Result<Vec<NotificacionAdmin>, AppError> {
        let items = sqlx::query_as::<_, NotificacionAdmin>(
            "SELECT * FROM admin_notifications ORDER BY created_at DESC LIMIT 50",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }
}
