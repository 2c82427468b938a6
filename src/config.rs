// src/config.rs

use std::{env, sync::Arc, time::Duration};

use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::{NotificacionRepository, ReservaRepository},
    services::{notificaciones::Notificador, reserva_service::ReservaService, wizard::WizardService},
};

// El estado compartido, accesible en toda la aplicación.
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub reserva_service: ReservaService,
    pub wizard: WizardService,
    pub notificaciones: NotificacionRepository,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL debe estar definida");
        // Webhook opcional: sin URL, las notificaciones solo van al feed.
        let webhook_url = env::var("WEBHOOK_URL").ok().filter(|url| !url.is_empty());

        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexión con la base de datos establecida");

        // --- Arma el grafo de dependencias ---
        let notificaciones = NotificacionRepository::new(db_pool.clone());
        let notificador = Notificador::new(notificaciones.clone(), webhook_url);
        let reserva_repo = Arc::new(ReservaRepository::new(db_pool.clone()));
        let reserva_service = ReservaService::new(reserva_repo, notificador);
        let wizard = WizardService::new(reserva_service.clone());

        Ok(Self {
            db_pool,
            reserva_service,
            wizard,
            notificaciones,
        })
    }
}

pub fn puerto() -> u16 {
    env::var("PORT")
        .ok()
        .and_then(|valor| valor.parse().ok())
        .unwrap_or(3000)
}
