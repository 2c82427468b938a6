// src/middleware/auth.rs
//
// La resolución de identidad y rol es un colaborador externo (el gateway
// del deployment); acá se confía en el valor que llega en el header
// `x-rol`. Este módulo solo cierra las rutas de administración a quien
// no venga marcado como admin.

use axum::{
    body::Body,
    http::Request,
    middleware::Next,
    response::Response,
};

use crate::common::error::AppError;

pub const HEADER_ROL: &str = "x-rol";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rol {
    Admin,
    Cliente,
}

impl Rol {
    pub fn parse(valor: &str) -> Self {
        if valor.eq_ignore_ascii_case("admin") {
            Rol::Admin
        } else {
            Rol::Cliente
        }
    }
}

// Middleware para el nest de rutas admin.
pub async fn admin_guard(request: Request<Body>, next: Next) -> Result<Response, AppError> {
    let rol = request
        .headers()
        .get(HEADER_ROL)
        .and_then(|valor| valor.to_str().ok())
        .map(Rol::parse)
        .unwrap_or(Rol::Cliente);

    if rol != Rol::Admin {
        return Err(AppError::Forbidden);
    }
    Ok(next.run(request).await)
}
