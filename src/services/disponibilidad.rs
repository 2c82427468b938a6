// src/services/disponibilidad.rs
//
// Chequeo de disponibilidad de franjas horarias. Funciones puras y
// deterministas sobre la lista de reservas que se les pasa: nada de
// estado oculto ni aleatoriedad.

use crate::models::reserva::{EstadoReserva, Reserva};

// Franjas candidatas para sugerir cuando la hora pedida choca. Lista
// fija, no una búsqueda exhaustiva.
pub const FRANJAS_ALTERNATIVAS: [&str; 5] = ["09:00", "11:00", "14:00", "16:00", "17:30"];

// Una cita vive dentro de un solo día: ninguna franja pasa de aquí.
pub const MINUTOS_DIA: i32 = 24 * 60;

const MAX_SUGERENCIAS: usize = 3;

// "HH:MM" -> minutos desde medianoche. Estricto: cualquier otra forma
// devuelve None.
pub fn hora_a_minutos(hora: &str) -> Option<i32> {
    let (h, m) = hora.split_once(':')?;
    if h.len() != 2 || m.len() != 2 {
        return None;
    }
    let h: i32 = h.parse().ok()?;
    let m: i32 = m.parse().ok()?;
    if !(0..24).contains(&h) || !(0..60).contains(&m) {
        return None;
    }
    Some(h * 60 + m)
}

// ¿Está libre el barbero para [hora, hora + duracion) en esa fecha?
// Las reservas canceladas no ocupan agenda. Intervalos semiabiertos:
// una cita que termina 10:45 no choca con otra que empieza 10:45.
pub fn esta_disponible(
    barbero: &str,
    fecha: &str,
    hora: &str,
    duracion: i32,
    reservas: &[Reserva],
) -> bool {
    let Some(inicio) = hora_a_minutos(hora) else {
        return false;
    };
    // Suma saturante: una duración fuera de rango ocupa el resto del día
    // en vez de desbordar y reportar la franja como libre.
    let fin = inicio.saturating_add(duracion);

    for reserva in reservas {
        if reserva.barbero != barbero
            || reserva.fecha != fecha
            || reserva.estado == EstadoReserva::Cancelada
        {
            continue;
        }
        let Some(existente_inicio) = hora_a_minutos(&reserva.hora) else {
            continue;
        };
        let existente_fin = existente_inicio.saturating_add(reserva.duracion);

        if inicio < existente_fin && fin > existente_inicio {
            return false;
        }
    }
    true
}

// Las franjas candidatas que sí están libres, hasta 3.
pub fn sugerir_alternativas(
    barbero: &str,
    fecha: &str,
    duracion: i32,
    reservas: &[Reserva],
) -> Vec<String> {
    FRANJAS_ALTERNATIVAS
        .iter()
        .filter(|franja| esta_disponible(barbero, fecha, franja, duracion, reservas))
        .take(MAX_SUGERENCIAS)
        .map(|franja| franja.to_string())
        .collect()
}
