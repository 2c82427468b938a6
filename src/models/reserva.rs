// src/models/reserva.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// --- ENUMS ---

// Mapea el CREATE TYPE estado_reserva de la base. Los valores van en
// kebab-case en el wire ("pendiente-barbero").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "estado_reserva", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum EstadoReserva {
    PendienteBarbero,
    PendienteCliente,
    Confirmada,
    Cancelada,
    Completada,
}

impl EstadoReserva {
    pub fn as_str(&self) -> &'static str {
        match self {
            EstadoReserva::PendienteBarbero => "pendiente-barbero",
            EstadoReserva::PendienteCliente => "pendiente-cliente",
            EstadoReserva::Confirmada => "confirmada",
            EstadoReserva::Cancelada => "cancelada",
            EstadoReserva::Completada => "completada",
        }
    }

    // Parseo tolerante para query params: "todas", vacío o basura => None.
    pub fn parse(valor: &str) -> Option<Self> {
        match valor {
            "pendiente-barbero" => Some(EstadoReserva::PendienteBarbero),
            "pendiente-cliente" => Some(EstadoReserva::PendienteCliente),
            "confirmada" => Some(EstadoReserva::Confirmada),
            "cancelada" => Some(EstadoReserva::Cancelada),
            "completada" => Some(EstadoReserva::Completada),
            _ => None,
        }
    }
}

impl std::fmt::Display for EstadoReserva {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// Identificador de barbería. "todas" existe solo como filtro en la UI,
// nunca se guarda en una reserva.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "barberia_id", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BarberiaId {
    Principal,
    Norte,
    Sur,
}

impl BarberiaId {
    pub fn as_str(&self) -> &'static str {
        match self {
            BarberiaId::Principal => "principal",
            BarberiaId::Norte => "norte",
            BarberiaId::Sur => "sur",
        }
    }

    // Parseo tolerante para query params: "todas", vacío o basura => None.
    pub fn parse(valor: &str) -> Option<Self> {
        match valor {
            "principal" => Some(BarberiaId::Principal),
            "norte" => Some(BarberiaId::Norte),
            "sur" => Some(BarberiaId::Sur),
            _ => None,
        }
    }
}

impl std::fmt::Display for BarberiaId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// Cosmética: no afecta la lógica de agenda.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "prioridad_reserva", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Prioridad {
    Normal,
    Vip,
}

// --- SUB-REGISTRO ESTRUCTURADO ---

// Personalización libre del servicio. Va a JSONB pero con forma fija,
// para que las invariantes del modelo sigan siendo verificables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ServicioPersonalizado {
    pub opciones: Vec<String>,
    pub extras: Vec<String>,
}

// --- LA RESERVA (entidad central) ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Reserva {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,

    #[schema(example = "Juan Pérez")]
    pub cliente: String,
    #[schema(example = "+57 300 123 4567")]
    pub telefono: String,
    #[schema(example = "juan@example.com")]
    pub email: String,

    #[schema(example = "Corte + Barba")]
    pub servicio: String,
    #[sqlx(json)]
    pub servicio_personalizado: ServicioPersonalizado,

    #[schema(example = "Carlos Ruiz")]
    pub barbero: String,
    pub barberia: BarberiaId,

    // Fecha y hora como cadenas simples (YYYY-MM-DD / HH:MM): una cita
    // vive dentro de un solo día, nunca cruza medianoche.
    #[schema(example = "2024-01-15")]
    pub fecha: String,
    #[schema(example = "10:00")]
    pub hora: String,
    #[schema(example = 45)]
    pub duracion: i32,

    pub estado: EstadoReserva,
    pub notas: String,

    // Bitácora de eventos, solo-agregar. Cada transición suma
    // exactamente una entrada; nunca se recorta ni se reordena.
    pub historial: Vec<String>,

    // Pista para la UI; el motor no bloquea ediciones por este flag.
    pub modificable: bool,
    pub prioridad: Prioridad,

    pub created_at: DateTime<Utc>,
}

// --- SOLICITUD DE CREACIÓN (lo que manda el cliente) ---

// Todos los campos vienen opcionales en el wire: la presencia de los
// requeridos la verifica el motor, que es quien decide si la solicitud
// llega o no al repositorio.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SolicitudReserva {
    #[schema(example = "Juan Pérez")]
    pub cliente: Option<String>,
    pub telefono: Option<String>,
    pub email: Option<String>,
    #[schema(example = "Corte + Barba")]
    pub servicio: Option<String>,
    pub servicio_personalizado: Option<ServicioPersonalizado>,
    #[schema(example = "Carlos Ruiz")]
    pub barbero: Option<String>,
    pub barberia: Option<BarberiaId>,
    #[schema(example = "2024-01-15")]
    pub fecha: Option<String>,
    #[schema(example = "10:00")]
    pub hora: Option<String>,
    pub duracion: Option<i32>,
    pub notas: Option<String>,
    pub prioridad: Option<Prioridad>,
}

// --- BORRADOR VALIDADO (lo que recibe el repositorio) ---

// Construido únicamente por el motor de reservas, con los campos
// requeridos ya verificados y los defaults aplicados.
#[derive(Debug, Clone)]
pub struct NuevaReserva {
    pub cliente: String,
    pub telefono: String,
    pub email: String,
    pub servicio: String,
    pub servicio_personalizado: ServicioPersonalizado,
    pub barbero: String,
    pub barberia: BarberiaId,
    pub fecha: String,
    pub hora: String,
    pub duracion: i32,
    pub estado: EstadoReserva,
    pub notas: String,
    pub historial: Vec<String>,
    pub modificable: bool,
    pub prioridad: Prioridad,
}

// --- PARCHE (merge parcial sobre un registro existente) ---

// Los campos None se dejan como están. `agregar_historial` se anexa en
// el mismo UPDATE que el cambio de estado, para que la bitácora y el
// estado avancen juntos.
#[derive(Debug, Clone, Default)]
pub struct CambiosReserva {
    pub fecha: Option<String>,
    pub hora: Option<String>,
    pub barbero: Option<String>,
    pub notas: Option<String>,
    pub estado: Option<EstadoReserva>,
    pub agregar_historial: Vec<String>,
}

// --- FILTRO DE LISTADO ---

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OrdenListado {
    // Orden de llegada (created_at), el default del panel admin.
    #[default]
    Llegada,
    // Por fecha + hora, para las vistas de calendario.
    Fecha,
}

#[derive(Debug, Clone, Default)]
pub struct FiltroReservas {
    pub barberia: Option<BarberiaId>,
    pub estado: Option<EstadoReserva>,
    // Texto libre: matchea cliente, servicio o barbero.
    pub q: Option<String>,
    pub orden: OrdenListado,
}
