pub mod disponibilidad;
pub mod notificaciones;
pub mod reserva_service;
pub mod wizard;
