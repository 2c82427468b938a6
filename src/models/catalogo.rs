// src/models/catalogo.rs
//
// Datos de referencia de solo lectura: el catálogo de servicios y el
// directorio de barberos por barbería. Son propiedad de otro componente
// (la administración de barberos/servicios); este backend solo los
// consulta para disponibilidad y para mostrarlos.

use serde::Serialize;
use utoipa::ToSchema;

use crate::models::reserva::BarberiaId;

pub const DURACION_DEFAULT: i32 = 30;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Servicio {
    #[schema(example = "Corte + Barba")]
    pub nombre: &'static str,
    // En minutos, siempre >= 1.
    #[schema(example = 45)]
    pub duracion: i32,
}

pub const SERVICIOS: &[Servicio] = &[
    Servicio { nombre: "Corte Clásico Hombre", duracion: 30 },
    Servicio { nombre: "Corte Cabello Dama", duracion: 60 },
    Servicio { nombre: "Corte + Barba", duracion: 45 },
    Servicio { nombre: "Barba Completa", duracion: 20 },
    Servicio { nombre: "Afeitado Clásico", duracion: 25 },
    Servicio { nombre: "Tratamiento Capilar", duracion: 40 },
];

// Duración por defecto según el servicio elegido; 30 si no está en el
// catálogo (el nombre del servicio es texto libre, no una clave foránea).
pub fn duracion_de(servicio: &str) -> i32 {
    SERVICIOS
        .iter()
        .find(|s| s.nombre == servicio)
        .map(|s| s.duracion)
        .unwrap_or(DURACION_DEFAULT)
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Barbero {
    #[schema(example = "carlos")]
    pub id: &'static str,
    #[schema(example = "Carlos Ruiz")]
    pub nombre: &'static str,
    #[schema(example = "Cortes clásicos")]
    pub especialidad: &'static str,
    #[schema(example = 4.8)]
    pub rating: f64,
    pub disponible: bool,
    // Canal de contacto para notificaciones.
    pub whatsapp: &'static str,
}

const BARBEROS_PRINCIPAL: &[Barbero] = &[
    Barbero { id: "carlos", nombre: "Carlos Ruiz", especialidad: "Cortes clásicos", rating: 4.8, disponible: true, whatsapp: "+57 300 111 2222" },
    Barbero { id: "ana", nombre: "Ana López", especialidad: "Cortes modernos", rating: 4.9, disponible: true, whatsapp: "+57 300 333 4444" },
    Barbero { id: "miguel", nombre: "Miguel Torres", especialidad: "Barbas y bigotes", rating: 4.7, disponible: false, whatsapp: "+57 300 555 6666" },
];

const BARBEROS_NORTE: &[Barbero] = &[
    Barbero { id: "pedro", nombre: "Pedro Sánchez", especialidad: "Degradados", rating: 4.6, disponible: true, whatsapp: "+57 300 777 8888" },
    Barbero { id: "lucia", nombre: "Lucía Martín", especialidad: "Cortes femeninos", rating: 4.8, disponible: true, whatsapp: "+57 300 999 0000" },
];

const BARBEROS_SUR: &[Barbero] = &[
    Barbero { id: "david", nombre: "David García", especialidad: "Estilos urbanos", rating: 4.5, disponible: true, whatsapp: "+57 300 111 3333" },
    Barbero { id: "sofia", nombre: "Sofía Ruiz", especialidad: "Tratamientos", rating: 4.9, disponible: true, whatsapp: "+57 300 555 7777" },
];

pub fn barberos_de(barberia: BarberiaId) -> &'static [Barbero] {
    match barberia {
        BarberiaId::Principal => BARBEROS_PRINCIPAL,
        BarberiaId::Norte => BARBEROS_NORTE,
        BarberiaId::Sur => BARBEROS_SUR,
    }
}
