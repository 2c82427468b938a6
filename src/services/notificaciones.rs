// src/services/notificaciones.rs
//
// Despachador de notificaciones de mejor esfuerzo. Nunca bloquea ni hace
// fallar la operación que lo dispara: todo fallo se registra en el log y
// se descarta. El registro durable de lo que pasó es el historial de la
// reserva, no esto.

use serde_json::json;

use crate::{
    db::NotificacionRepository,
    models::reserva::Reserva,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TipoNotificacion {
    Creada,
    Confirmada,
    Rechazada,
    Reagendada,
    Cancelada,
    Completada,
}

impl TipoNotificacion {
    fn as_str(&self) -> &'static str {
        match self {
            TipoNotificacion::Creada => "creada",
            TipoNotificacion::Confirmada => "confirmada",
            TipoNotificacion::Rechazada => "rechazada",
            TipoNotificacion::Reagendada => "reagendada",
            TipoNotificacion::Cancelada => "cancelada",
            TipoNotificacion::Completada => "completada",
        }
    }

    fn titulo(&self) -> &'static str {
        match self {
            TipoNotificacion::Creada => "Nueva cita solicitada",
            TipoNotificacion::Confirmada => "Reserva confirmada",
            TipoNotificacion::Rechazada => "Reserva rechazada",
            TipoNotificacion::Reagendada => "Propuesta de reagenda",
            TipoNotificacion::Cancelada => "Reserva cancelada",
            TipoNotificacion::Completada => "Reserva completada",
        }
    }
}

#[derive(Clone)]
pub struct Notificador {
    repo: Option<NotificacionRepository>,
    webhook_url: Option<String>,
    http: reqwest::Client,
}

impl Notificador {
    pub fn new(repo: NotificacionRepository, webhook_url: Option<String>) -> Self {
        Self {
            repo: Some(repo),
            webhook_url,
            http: reqwest::Client::new(),
        }
    }

    // Sin feed ni webhook: cada dispatch es un no-op. Lo usan las pruebas
    // del motor, que no verifican notificaciones (son advisory).
    pub fn disabled() -> Self {
        Self {
            repo: None,
            webhook_url: None,
            http: reqwest::Client::new(),
        }
    }

    // Encola el aviso y retorna de inmediato. El trabajo real corre en
    // una tarea aparte; si falla, se pierde (no hay cola de reintentos).
    pub fn dispatch(&self, reserva: &Reserva, tipo: TipoNotificacion) {
        if self.repo.is_none() && self.webhook_url.is_none() {
            return;
        }

        let cuerpo = format!(
            "{} solicita cita para {} el {} a las {} ({})",
            reserva.cliente, reserva.servicio, reserva.fecha, reserva.hora, reserva.barbero
        );
        let notificador = self.clone();
        let reserva = reserva.clone();

        tokio::spawn(async move {
            if let Some(repo) = &notificador.repo {
                if let Err(err) = repo.insert(Some(reserva.id), tipo.titulo(), &cuerpo).await {
                    tracing::warn!("No se pudo guardar la notificación admin: {:?}", err);
                }
            }

            if let Some(url) = &notificador.webhook_url {
                let payload = json!({
                    "tipo": tipo.as_str(),
                    "titulo": tipo.titulo(),
                    "cuerpo": cuerpo,
                    "reserva": reserva,
                });
                match notificador.http.post(url).json(&payload).send().await {
                    Ok(resp) if !resp.status().is_success() => {
                        tracing::warn!("Webhook respondió {}", resp.status());
                    }
                    Err(err) => tracing::warn!("Falló el envío del webhook: {err}"),
                    _ => {}
                }
            }
        });
    }
}
