pub mod catalogo;
pub mod reserva;
