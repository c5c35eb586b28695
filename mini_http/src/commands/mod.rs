//! # Comandos del Servidor
//!
//! Handlers de demostración que registra el binario. Cada comando es una
//! función que recibe el `Request` y modifica la `Response` por defecto.

pub mod basic;

// Re-exportar funciones útiles
pub use basic::*;

use crate::server::Server;

/// Registra las rutas de demo (`GET /`, `GET /hello`, `POST /echo`)
pub fn register_demo_routes(server: &mut Server) {
    server
        .register("GET", "/", index_handler)
        .register("GET", "/hello", hello_handler)
        .register("POST", "/echo", echo_handler);
}
