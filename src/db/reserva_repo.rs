// src/db/reserva_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::reserva::{CambiosReserva, FiltroReservas, NuevaReserva, OrdenListado, Reserva},
};

// La frontera CRUD sobre la persistencia. El motor de reservas habla con
// este trait; la implementación real es Postgres y las pruebas usan una
// versión en memoria.
#[async_trait]
pub trait ReservaStore: Send + Sync {
    async fn list(&self, filtro: &FiltroReservas) -> Result<Vec<Reserva>, AppError>;
    async fn get(&self, id: Uuid) -> Result<Reserva, AppError>;
    async fn create(&self, nueva: NuevaReserva) -> Result<Reserva, AppError>;
    async fn patch(&self, id: Uuid, cambios: CambiosReserva) -> Result<Reserva, AppError>;
    async fn remove(&self, id: Uuid) -> Result<(), AppError>;
}

// El repositorio de reservas, responsable de todas las interacciones con
// la tabla 'reservas'.
#[derive(Clone)]
pub struct ReservaRepository {
    pool: PgPool,
}

impl ReservaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// El texto libre se busca como subcadena literal: los comodines de LIKE
// que traiga el usuario se escapan antes de armar el patrón.
fn escapar_like(q: &str) -> String {
    q.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}

#[async_trait]
impl ReservaStore for ReservaRepository {
    async fn list(&self, filtro: &FiltroReservas) -> Result<Vec<Reserva>, AppError> {
        let orden = match filtro.orden {
            OrdenListado::Llegada => "ORDER BY created_at, id",
            OrdenListado::Fecha => "ORDER BY fecha, hora, id",
        };

        let sql = format!(
            r#"
            SELECT * FROM reservas
            WHERE ($1::barberia_id IS NULL OR barberia = $1)
              AND ($2::estado_reserva IS NULL OR estado = $2)
              AND ($3::text IS NULL
                   OR cliente ILIKE '%' || $3 || '%' ESCAPE '\'
                   OR servicio ILIKE '%' || $3 || '%' ESCAPE '\'
                   OR barbero ILIKE '%' || $3 || '%' ESCAPE '\')
            {orden}
            "#
        );

        let reservas = sqlx::query_as::<_, Reserva>(&sql)
            .bind(filtro.barberia)
            .bind(filtro.estado)
            .bind(filtro.q.as_deref().map(escapar_like))
            .fetch_all(&self.pool)
            .await?;

        Ok(reservas)
    }

    async fn get(&self, id: Uuid) -> Result<Reserva, AppError> {
        sqlx::query_as::<_, Reserva>("SELECT * FROM reservas WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppError::NotFound)
    }

    async fn create(&self, nueva: NuevaReserva) -> Result<Reserva, AppError> {
        // El id lo asigna el repositorio; el llamador nunca lo propone.
        let reserva = sqlx::query_as::<_, Reserva>(
            r#"
            INSERT INTO reservas (
                id, cliente, telefono, email, servicio, servicio_personalizado,
                barbero, barberia, fecha, hora, duracion, estado, notas,
                historial, modificable, prioridad
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&nueva.cliente)
        .bind(&nueva.telefono)
        .bind(&nueva.email)
        .bind(&nueva.servicio)
        .bind(sqlx::types::Json(&nueva.servicio_personalizado))
        .bind(&nueva.barbero)
        .bind(nueva.barberia)
        .bind(&nueva.fecha)
        .bind(&nueva.hora)
        .bind(nueva.duracion)
        .bind(nueva.estado)
        .bind(&nueva.notas)
        .bind(&nueva.historial)
        .bind(nueva.modificable)
        .bind(nueva.prioridad)
        .fetch_one(&self.pool)
        .await?;

        Ok(reserva)
    }

    async fn patch(&self, id: Uuid, cambios: CambiosReserva) -> Result<Reserva, AppError> {
        // Merge parcial: los None dejan la columna intacta. El anexo a la
        // bitácora va en el mismo UPDATE que el cambio de estado, así
        // ambos quedan con la atomicidad de un solo registro.
        sqlx::query_as::<_, Reserva>(
            r#"
            UPDATE reservas SET
                fecha = COALESCE($2, fecha),
                hora = COALESCE($3, hora),
                barbero = COALESCE($4, barbero),
                notas = COALESCE($5, notas),
                estado = COALESCE($6, estado),
                historial = historial || $7
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(cambios.fecha.as_deref())
        .bind(cambios.hora.as_deref())
        .bind(cambios.barbero.as_deref())
        .bind(cambios.notas.as_deref())
        .bind(cambios.estado)
        .bind(&cambios.agregar_historial)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::NotFound)
    }

    async fn remove(&self, id: Uuid) -> Result<(), AppError> {
        // Borrado duro, sin tumba ni cascadas: las notificaciones que
        // referencian la reserva quedan huérfanas y eso es aceptable.
        let result = sqlx::query("DELETE FROM reservas WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::escapar_like;

    #[test]
    fn escapa_comodines_de_like() {
        assert_eq!(escapar_like("100%"), "100\\%");
        assert_eq!(escapar_like("juan_perez"), "juan\\_perez");
        assert_eq!(escapar_like("a\\b"), "a\\\\b");
        assert_eq!(escapar_like("juan"), "juan");
    }
}
