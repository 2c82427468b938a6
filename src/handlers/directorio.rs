// src/handlers/directorio.rs
//
// Datos de referencia de solo lectura: el directorio de barberos y el
// catálogo de servicios. Es lo mismo que ve el admin en el panel "como
// cliente". Nada de acá se escribe desde este backend.

use axum::{extract::Query, response::IntoResponse};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    common::error::AppError,
    handlers::envuelto,
    models::{
        catalogo::{self, Barbero},
        reserva::BarberiaId,
    },
};

#[derive(Debug, Deserialize, IntoParams)]
pub struct BarberosQuery {
    // "principal" | "norte" | "sur"; ausente o "todas" = todos
    pub barberia: Option<String>,
}

// GET /api/barberos
#[utoipa::path(
    get,
    path = "/api/barberos",
    tag = "Directorio",
    params(BarberosQuery),
    responses((status = 200, description = "Directorio de barberos"))
)]
pub async fn barberos(Query(query): Query<BarberosQuery>) -> Result<impl IntoResponse, AppError> {
    let plantel: Vec<Barbero> = match query.barberia.as_deref().and_then(BarberiaId::parse) {
        Some(barberia) => catalogo::barberos_de(barberia).to_vec(),
        None => [BarberiaId::Principal, BarberiaId::Norte, BarberiaId::Sur]
            .iter()
            .flat_map(|b| catalogo::barberos_de(*b).iter().cloned())
            .collect(),
    };
    Ok(envuelto(plantel))
}

// GET /api/servicios
#[utoipa::path(
    get,
    path = "/api/servicios",
    tag = "Directorio",
    responses((status = 200, description = "Catálogo de servicios con duraciones"))
)]
pub async fn servicios() -> Result<impl IntoResponse, AppError> {
    Ok(envuelto(catalogo::SERVICIOS))
}
