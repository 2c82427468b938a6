pub mod reserva_repo;
pub use reserva_repo::{ReservaRepository, ReservaStore};
pub mod notificaciones_repo;
pub use notificaciones_repo::{NotificacionAdmin, NotificacionRepository};
